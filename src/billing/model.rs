//! Bill and bill-line models.
// region:    --- Imports
use super::calc;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Lenient Numbers
/// Form fields arrive as whatever the user typed. Anything that is not a
/// finite number becomes 0 so totals stay computable while typing.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn coerce(value: &Value) -> f64 {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value))
    }

    /// `null` and blank strings stay empty; anything else is coerced.
    pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            other => Some(coerce(other)),
        })
    }
}
// endregion: --- Lenient Numbers

// region:    --- Bill Item
const OTHER: &str = "Other";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// One jewelry line on a bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub custom_item_name: String,
    #[serde(default)]
    pub purity: String,
    #[serde(default)]
    pub custom_purity: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub gross_weight: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub net_weight: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub gold_rate: f64,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub making_charge_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub making_charge_value: f64,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub wastage_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub wastage_value: f64,
    #[serde(default)]
    pub gst_enabled: bool,
}

/// A single form-field edit on a bill line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ItemEdit {
    ItemName(String),
    CustomItemName(String),
    Purity(String),
    CustomPurity(String),
    GrossWeight(#[serde(deserialize_with = "lenient::number")] f64),
    NetWeight(#[serde(deserialize_with = "lenient::number")] f64),
    GoldRate(#[serde(deserialize_with = "lenient::number")] f64),
    MakingChargePercent(#[serde(deserialize_with = "lenient::number")] f64),
    MakingChargeValue(#[serde(deserialize_with = "lenient::number")] f64),
    WastagePercent(#[serde(deserialize_with = "lenient::number")] f64),
    WastageValue(#[serde(deserialize_with = "lenient::number")] f64),
    GstEnabled(bool),
}

impl BillItem {
    /// Blank line pre-filled with the current gold rate
    pub fn new(gold_rate: f64, gst_enabled: bool) -> Self {
        Self {
            id: new_id(),
            item_name: String::new(),
            custom_item_name: String::new(),
            purity: "22K".to_string(),
            custom_purity: String::new(),
            gross_weight: 0.0,
            net_weight: 0.0,
            gold_rate,
            making_charge_percent: Some(0.0),
            making_charge_value: 0.0,
            wastage_percent: Some(0.0),
            wastage_value: 0.0,
            gst_enabled,
        }
    }

    pub fn gold_value(&self) -> f64 {
        calc::gold_value(self.net_weight, self.gold_rate)
    }

    /// Applies one edit, deriving the paired percent/flat field.
    ///
    /// Editing a percent recomputes the flat charge and vice versa. When the
    /// gold value moves, flat charges follow their percents.
    pub fn apply(&mut self, edit: ItemEdit) {
        match edit {
            ItemEdit::ItemName(v) => self.item_name = v,
            ItemEdit::CustomItemName(v) => self.custom_item_name = v,
            ItemEdit::Purity(v) => self.purity = v,
            ItemEdit::CustomPurity(v) => self.custom_purity = v,
            ItemEdit::GrossWeight(v) => self.gross_weight = v,
            ItemEdit::NetWeight(v) => {
                self.net_weight = v;
                self.resync_charges();
            }
            ItemEdit::GoldRate(v) => {
                self.gold_rate = v;
                self.resync_charges();
            }
            ItemEdit::MakingChargePercent(p) => {
                self.making_charge_percent = Some(p);
                self.making_charge_value = calc::percent_to_charge(self.gold_value(), p);
            }
            ItemEdit::MakingChargeValue(v) => {
                self.making_charge_value = v;
                self.making_charge_percent = calc::charge_to_percent(self.gold_value(), v);
            }
            ItemEdit::WastagePercent(p) => {
                self.wastage_percent = Some(p);
                self.wastage_value = calc::percent_to_charge(self.gold_value(), p);
            }
            ItemEdit::WastageValue(v) => {
                self.wastage_value = v;
                self.wastage_percent = calc::charge_to_percent(self.gold_value(), v);
            }
            ItemEdit::GstEnabled(v) => self.gst_enabled = v,
        }
    }

    fn resync_charges(&mut self) {
        let base = self.gold_value();
        if let Some(p) = self.making_charge_percent {
            self.making_charge_value = calc::percent_to_charge(base, p);
        }
        if let Some(p) = self.wastage_percent {
            self.wastage_value = calc::percent_to_charge(base, p);
        }
    }

    /// Name shown on receipts; "Other" defers to the custom name.
    pub fn display_name(&self) -> &str {
        resolve_other(&self.item_name, &self.custom_item_name)
    }

    pub fn display_purity(&self) -> &str {
        resolve_other(&self.purity, &self.custom_purity)
    }
}

fn resolve_other<'a>(value: &'a str, custom: &'a str) -> &'a str {
    if value.eq_ignore_ascii_case(OTHER) && !custom.trim().is_empty() {
        custom.trim()
    } else {
        value.trim()
    }
}
// endregion: --- Bill Item

// region:    --- Bill
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Partial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentMode {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::Card => "Card",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Live, editable bill state. Totals are always derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    /// Set when a saved bill was reloaded for editing
    #[serde(default)]
    pub bill_number: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub items: Vec<BillItem>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default = "default_round_off")]
    pub round_off: bool,
}

fn default_round_off() -> bool {
    true
}

impl BillDraft {
    pub fn new(round_off: bool) -> Self {
        Self {
            bill_number: None,
            date: None,
            customer: Customer::default(),
            items: Vec::new(),
            payment_status: PaymentStatus::default(),
            payment_mode: PaymentMode::default(),
            round_off,
        }
    }

    pub fn totals(&self) -> calc::BillTotals {
        calc::bill_totals(&self.items, self.round_off)
    }
}

/// Saved snapshot; `grand_total` is frozen at save time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_number: String,
    pub date: NaiveDate,
    pub customer: Customer,
    pub items: Vec<BillItem>,
    pub payment_status: PaymentStatus,
    pub payment_mode: PaymentMode,
    pub round_off: bool,
    pub grand_total: f64,
    pub saved_at: DateTime<Utc>,
}

impl Bill {
    /// Recomputed breakdown for display; the stored `grand_total` stays authoritative.
    pub fn totals(&self) -> calc::BillTotals {
        calc::bill_totals(&self.items, self.round_off)
    }

    pub fn to_draft(&self) -> BillDraft {
        BillDraft {
            bill_number: Some(self.bill_number.clone()),
            date: Some(self.date),
            customer: self.customer.clone(),
            items: self.items.clone(),
            payment_status: self.payment_status,
            payment_mode: self.payment_mode,
            round_off: self.round_off,
        }
    }
}
// endregion: --- Bill
