//! Live bill draft plus the bills saved during this session.
//! History is held in memory only.
// region:    --- Imports
use super::model::{Bill, BillDraft, BillItem, ItemEdit};
use super::numbering::unused_bill_number;
use super::settings::VendorBillingSettings;
use super::validation::validate_draft;
use super::BillingError;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

// endregion: --- Imports

#[derive(Debug, Clone)]
pub struct BillingSession {
    draft: BillDraft,
    history: Vec<Bill>,
    rng: StdRng,
}

impl BillingSession {
    pub fn new(settings: &VendorBillingSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Session drawing bill-number suffixes from `rng`
    pub fn with_rng(settings: &VendorBillingSettings, rng: StdRng) -> Self {
        Self {
            draft: BillDraft::new(settings.default_round_off),
            history: Vec::new(),
            rng,
        }
    }

    pub fn draft(&self) -> &BillDraft {
        &self.draft
    }

    pub fn replace_draft(&mut self, draft: BillDraft) {
        self.draft = draft;
    }

    /// Appends a blank line and returns it
    pub fn add_item(&mut self, gold_rate: f64, gst_enabled: bool) -> &BillItem {
        self.draft.items.push(BillItem::new(gold_rate, gst_enabled));
        &self.draft.items[self.draft.items.len() - 1]
    }

    pub fn edit_item(&mut self, item_id: &str, edit: ItemEdit) -> Result<&BillItem, BillingError> {
        let item = self
            .draft
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| BillingError::ItemNotFound(item_id.to_string()))?;
        item.apply(edit);
        Ok(item)
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<BillItem, BillingError> {
        let index = self
            .draft
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| BillingError::ItemNotFound(item_id.to_string()))?;
        Ok(self.draft.items.remove(index))
    }

    /// 1. validate  2. freeze totals into a snapshot  3. record it  4. start a fresh draft
    ///
    /// A draft reloaded from history keeps its bill number and replaces the
    /// earlier snapshot in place. A fresh draft always gets a number not yet
    /// in history and is appended.
    pub fn save(
        &mut self,
        settings: &VendorBillingSettings,
        now: DateTime<Utc>,
    ) -> Result<Bill, BillingError> {
        let issues = validate_draft(&self.draft);
        if !issues.is_empty() {
            return Err(BillingError::Validation(issues));
        }

        let date = self.draft.date.unwrap_or_else(|| now.date_naive());
        let reloaded = self.draft.bill_number.clone();
        let number = match &reloaded {
            Some(number) => number.clone(),
            None => {
                let history = &self.history;
                unused_bill_number(&mut self.rng, &settings.bill_prefix, date, |candidate| {
                    history.iter().any(|saved| saved.bill_number == candidate)
                })
                .ok_or_else(|| BillingError::NumbersExhausted(date.to_string()))?
            }
        };

        let bill = Bill {
            bill_number: number,
            date,
            customer: self.draft.customer.clone(),
            items: self.draft.items.clone(),
            payment_status: self.draft.payment_status,
            payment_mode: self.draft.payment_mode,
            round_off: self.draft.round_off,
            grand_total: self.draft.totals().grand_total,
            saved_at: now,
        };

        match reloaded.and_then(|number| {
            self.history
                .iter()
                .position(|saved| saved.bill_number == number)
        }) {
            Some(index) => self.history[index] = bill.clone(),
            None => self.history.push(bill.clone()),
        }
        self.draft = BillDraft::new(settings.default_round_off);
        Ok(bill)
    }

    pub fn history(&self) -> &[Bill] {
        &self.history
    }

    pub fn find(&self, bill_number: &str) -> Option<&Bill> {
        self.history
            .iter()
            .find(|bill| bill.bill_number == bill_number)
    }

    /// Replaces the live draft with a saved bill
    pub fn load(&mut self, bill_number: &str) -> Result<&BillDraft, BillingError> {
        let bill = self
            .find(bill_number)
            .ok_or_else(|| BillingError::BillNotFound(bill_number.to_string()))?;
        self.draft = bill.to_draft();
        Ok(&self.draft)
    }
}
