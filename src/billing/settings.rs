// region:    --- Imports
use super::numbering::DEFAULT_PREFIX;
use crate::store::{self, KvStore, StoreError, VENDOR_BILLING_SETTINGS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// endregion: --- Imports

/// Per-vendor billing preferences and receipt header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorBillingSettings {
    pub bill_prefix: String,
    pub shop_name: String,
    pub address: String,
    pub phone: String,
    pub gstin: String,
    pub default_gst_enabled: bool,
    pub default_round_off: bool,
}

impl Default for VendorBillingSettings {
    fn default() -> Self {
        Self {
            bill_prefix: DEFAULT_PREFIX.to_string(),
            shop_name: String::new(),
            address: String::new(),
            phone: String::new(),
            gstin: String::new(),
            default_gst_enabled: true,
            default_round_off: true,
        }
    }
}

type SettingsByVendor = HashMap<String, VendorBillingSettings>;

pub async fn load_settings(
    store: &dyn KvStore,
    vendor_id: &str,
) -> Result<VendorBillingSettings, StoreError> {
    let all: SettingsByVendor = store::load(store, VENDOR_BILLING_SETTINGS).await?;
    Ok(all.get(vendor_id).cloned().unwrap_or_default())
}

pub async fn save_settings(
    store: &dyn KvStore,
    vendor_id: &str,
    settings: VendorBillingSettings,
) -> Result<(), StoreError> {
    let mut all: SettingsByVendor = store::load(store, VENDOR_BILLING_SETTINGS).await?;
    all.insert(vendor_id.to_string(), settings);
    store::save(store, VENDOR_BILLING_SETTINGS, &all).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn unknown_vendor_gets_defaults() {
        let store = MemoryStore::new();
        let settings = load_settings(&store, "v1").await.unwrap();
        assert_eq!(settings, VendorBillingSettings::default());
        assert_eq!(settings.bill_prefix, "INV");
    }

    #[tokio::test]
    async fn vendors_are_stored_side_by_side() {
        let store = MemoryStore::new();
        let a = VendorBillingSettings {
            bill_prefix: "AJ".into(),
            shop_name: "Aurum Jewels".into(),
            ..Default::default()
        };
        let b = VendorBillingSettings {
            default_gst_enabled: false,
            ..Default::default()
        };
        save_settings(&store, "a", a.clone()).await.unwrap();
        save_settings(&store, "b", b.clone()).await.unwrap();
        assert_eq!(load_settings(&store, "a").await.unwrap(), a);
        assert_eq!(load_settings(&store, "b").await.unwrap(), b);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let settings: VendorBillingSettings =
            serde_json::from_str(r#"{"shopName": "Kanak"}"#).unwrap();
        assert_eq!(settings.shop_name, "Kanak");
        assert!(settings.default_round_off);
        assert_eq!(settings.bill_prefix, "INV");
    }
}
