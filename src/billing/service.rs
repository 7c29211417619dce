// region:    --- Imports
use super::model::{Bill, BillDraft, BillItem, ItemEdit};
use super::receipt::bill_text;
use super::session::BillingSession;
use super::settings::{load_settings, save_settings, VendorBillingSettings};
use super::BillingError;
use crate::clock::Clock;
use crate::error::AppError;
use crate::pricing::PriceBoard;
use crate::store::KvStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

// endregion: --- Imports

// region:    --- Billing Service
/// Per-vendor billing sessions over the shared settings store
pub struct BillingService {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    prices: PriceBoard,
    sessions: Mutex<HashMap<String, BillingSession>>,
}

impl BillingService {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, prices: PriceBoard) -> Self {
        Self {
            store,
            clock,
            prices,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn settings(&self, vendor_id: &str) -> Result<VendorBillingSettings, AppError> {
        Ok(load_settings(self.store.as_ref(), vendor_id).await?)
    }

    pub async fn update_settings(
        &self,
        vendor_id: &str,
        settings: VendorBillingSettings,
    ) -> Result<VendorBillingSettings, AppError> {
        info!("{:<12} --> billing settings updated vendor: {}", "Command", vendor_id);
        save_settings(self.store.as_ref(), vendor_id, settings.clone()).await?;
        Ok(settings)
    }

    /// Runs `f` against the vendor's session, creating it on first use.
    async fn with_session<R>(
        &self,
        vendor_id: &str,
        f: impl FnOnce(&mut BillingSession, &VendorBillingSettings) -> Result<R, BillingError>,
    ) -> Result<R, AppError> {
        let settings = self.settings(vendor_id).await?;
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(vendor_id.to_string())
            .or_insert_with(|| BillingSession::new(&settings));
        Ok(f(session, &settings)?)
    }

    pub async fn draft(&self, vendor_id: &str) -> Result<BillDraft, AppError> {
        self.with_session(vendor_id, |session, _| Ok(session.draft().clone()))
            .await
    }

    pub async fn replace_draft(
        &self,
        vendor_id: &str,
        draft: BillDraft,
    ) -> Result<BillDraft, AppError> {
        self.with_session(vendor_id, |session, _| {
            session.replace_draft(draft);
            Ok(session.draft().clone())
        })
        .await
    }

    /// New line priced at the current gold rate, GST per vendor default
    pub async fn add_item(&self, vendor_id: &str) -> Result<BillItem, AppError> {
        let gold_rate = self.prices.latest().await.gold_per_gram;
        self.with_session(vendor_id, |session, settings| {
            Ok(session
                .add_item(gold_rate, settings.default_gst_enabled)
                .clone())
        })
        .await
    }

    pub async fn edit_item(
        &self,
        vendor_id: &str,
        item_id: &str,
        edit: ItemEdit,
    ) -> Result<BillItem, AppError> {
        self.with_session(vendor_id, |session, _| {
            session.edit_item(item_id, edit).cloned()
        })
        .await
    }

    pub async fn remove_item(&self, vendor_id: &str, item_id: &str) -> Result<BillItem, AppError> {
        self.with_session(vendor_id, |session, _| session.remove_item(item_id))
            .await
    }

    pub async fn save_bill(&self, vendor_id: &str) -> Result<Bill, AppError> {
        let now = self.clock.now();
        let bill = self
            .with_session(vendor_id, |session, settings| session.save(settings, now))
            .await?;
        info!(
            "{:<12} --> bill saved vendor: {}, number: {}, total: {:.2}",
            "Command", vendor_id, bill.bill_number, bill.grand_total
        );
        Ok(bill)
    }

    pub async fn history(&self, vendor_id: &str) -> Result<Vec<Bill>, AppError> {
        self.with_session(vendor_id, |session, _| Ok(session.history().to_vec()))
            .await
    }

    pub async fn load_bill(&self, vendor_id: &str, bill_number: &str) -> Result<BillDraft, AppError> {
        self.with_session(vendor_id, |session, _| session.load(bill_number).cloned())
            .await
    }

    pub async fn bill_text(&self, vendor_id: &str, bill_number: &str) -> Result<String, AppError> {
        self.with_session(vendor_id, |session, settings| {
            session
                .find(bill_number)
                .map(|bill| bill_text(bill, settings))
                .ok_or_else(|| BillingError::BillNotFound(bill_number.to_string()))
        })
        .await
    }
}
// endregion: --- Billing Service
