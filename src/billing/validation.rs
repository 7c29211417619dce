//! Pre-save checks.
//!
//! The arithmetic accepts anything; these checks decide whether a draft is
//! fit to become a saved bill.
use super::model::{BillDraft, BillItem};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_item(index: usize, item: &BillItem) -> Vec<ValidationIssue> {
    let field = |name: &str| format!("items[{}].{}", index, name);
    let mut issues = Vec::new();

    if item.display_name().is_empty() {
        issues.push(ValidationIssue::new(field("itemName"), "item name is required"));
    }
    if item.gross_weight < 0.0 {
        issues.push(ValidationIssue::new(field("grossWeight"), "must not be negative"));
    }
    if item.net_weight <= 0.0 {
        issues.push(ValidationIssue::new(field("netWeight"), "must be greater than zero"));
    }
    if item.gross_weight > 0.0 && item.net_weight > item.gross_weight {
        issues.push(ValidationIssue::new(
            field("netWeight"),
            "must not exceed gross weight",
        ));
    }
    if item.gold_rate <= 0.0 {
        issues.push(ValidationIssue::new(field("goldRate"), "must be greater than zero"));
    }
    if item.making_charge_value < 0.0 {
        issues.push(ValidationIssue::new(
            field("makingChargeValue"),
            "must not be negative",
        ));
    }
    if item.wastage_value < 0.0 {
        issues.push(ValidationIssue::new(field("wastageValue"), "must not be negative"));
    }
    issues
}

pub fn validate_draft(draft: &BillDraft) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if draft.customer.name.trim().is_empty() {
        issues.push(ValidationIssue::new("customer.name", "customer name is required"));
    }
    if draft.items.is_empty() {
        issues.push(ValidationIssue::new("items", "bill has no items"));
    }
    for (index, item) in draft.items.iter().enumerate() {
        issues.extend(validate_item(index, item));
    }
    issues
}
