//! Jewelry billing
//! 1. line arithmetic (gold value, making, wastage, GST)
//! 2. bill totals and round-off
//! 3. numbering, receipt text, pre-save validation
//! 4. per-vendor draft and session history
use thiserror::Error;

pub mod calc;
pub mod model;
pub mod numbering;
pub mod receipt;
pub mod service;
pub mod session;
pub mod settings;
pub mod validation;

pub use model::{Bill, BillDraft, BillItem, Customer, ItemEdit, PaymentMode, PaymentStatus};
pub use service::BillingService;
pub use settings::VendorBillingSettings;
pub use validation::ValidationIssue;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("bill is not ready to save ({} issue(s))", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("bill `{0}` not found in this session")]
    BillNotFound(String),

    #[error("bill line `{0}` not found")]
    ItemNotFound(String),

    #[error("no unused bill number left for {0}")]
    NumbersExhausted(String),
}
