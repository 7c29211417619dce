//! Pricing arithmetic for jewelry bills.
//!
//! Every function here is pure and total: inputs that are not finite numbers
//! are read as 0 and nothing returns an error.
use super::model::BillItem;
use serde::Serialize;

/// Fixed GST on jewelry, in percent
pub const GST_PERCENT: f64 = 3.0;
pub const GST_RATE: f64 = GST_PERCENT / 100.0;

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Rounds to 2 decimal places (paise).
pub fn round2(v: f64) -> f64 {
    (finite(v) * 100.0).round() / 100.0
}

pub fn gold_value(net_weight: f64, gold_rate: f64) -> f64 {
    round2(finite(net_weight) * finite(gold_rate))
}

pub fn percent_to_charge(base: f64, percent: f64) -> f64 {
    round2(finite(base) * finite(percent) / 100.0)
}

/// `None` when there is no base to express the charge against.
pub fn charge_to_percent(base: f64, flat_value: f64) -> Option<f64> {
    let base = finite(base);
    if base == 0.0 {
        return None;
    }
    Some(round2(finite(flat_value) / base * 100.0))
}

pub fn gst(subtotal: f64, enabled: bool) -> f64 {
    if enabled {
        round2(finite(subtotal) * GST_RATE)
    } else {
        0.0
    }
}

// region:    --- Breakdowns
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemBreakdown {
    pub gold_value: f64,
    pub making_charge: f64,
    pub wastage_charge: f64,
    pub subtotal: f64,
    pub gst: f64,
    pub total: f64,
}

pub fn item_breakdown(item: &BillItem) -> ItemBreakdown {
    let gold_value = gold_value(item.net_weight, item.gold_rate);
    let making_charge = round2(item.making_charge_value);
    let wastage_charge = round2(item.wastage_value);
    let subtotal = round2(gold_value + making_charge + wastage_charge);
    let gst = gst(subtotal, item.gst_enabled);
    ItemBreakdown {
        gold_value,
        making_charge,
        wastage_charge,
        subtotal,
        gst,
        total: round2(subtotal + gst),
    }
}

pub fn item_total(item: &BillItem) -> f64 {
    item_breakdown(item).total
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillTotals {
    pub items: Vec<ItemBreakdown>,
    pub subtotal: f64,
    pub gst: f64,
    /// Sum of item totals before round-off
    pub exact_total: f64,
    /// `grand_total - exact_total`
    pub round_off: f64,
    pub grand_total: f64,
}

pub fn bill_totals(items: &[BillItem], round_off: bool) -> BillTotals {
    let breakdowns: Vec<ItemBreakdown> = items.iter().map(item_breakdown).collect();
    let subtotal = round2(breakdowns.iter().map(|b| b.subtotal).sum());
    let gst = round2(breakdowns.iter().map(|b| b.gst).sum());
    let exact_total = round2(breakdowns.iter().map(|b| b.total).sum());
    let grand_total = if round_off {
        exact_total.round()
    } else {
        exact_total
    };
    BillTotals {
        items: breakdowns,
        subtotal,
        gst,
        exact_total,
        round_off: round2(grand_total - exact_total),
        grand_total,
    }
}

pub fn bill_total(items: &[BillItem], round_off: bool) -> f64 {
    bill_totals(items, round_off).grand_total
}
// endregion: --- Breakdowns
