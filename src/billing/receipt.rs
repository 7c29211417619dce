//! Plain-text receipt for sharing over chat or clipboard. Output only; there
//! is no parser for it.
use super::calc::{self, GST_PERCENT};
use super::model::Bill;
use super::settings::VendorBillingSettings;
use std::fmt::Write;

const RULE: &str = "--------------------------------";

fn money(v: f64) -> String {
    format!("₹{:.2}", v)
}

pub fn bill_text(bill: &Bill, vendor: &VendorBillingSettings) -> String {
    let mut out = String::new();
    let totals = bill.totals();

    // header lines are skipped when the vendor left them blank
    let shop = vendor.shop_name.trim();
    if !shop.is_empty() {
        let _ = writeln!(out, "*{}*", shop);
    }
    for (label, value) in [("", &vendor.address), ("Ph: ", &vendor.phone), ("GSTIN: ", &vendor.gstin)] {
        if !value.trim().is_empty() {
            let _ = writeln!(out, "{}{}", label, value.trim());
        }
    }
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "Bill No: {}", bill.bill_number);
    let _ = writeln!(out, "Date: {}", bill.date.format("%d-%m-%Y"));
    let _ = writeln!(out, "Customer: {}", bill.customer.name.trim());
    if !bill.customer.phone.trim().is_empty() {
        let _ = writeln!(out, "Phone: {}", bill.customer.phone.trim());
    }
    let _ = writeln!(out, "{}", RULE);

    for (index, (item, b)) in bill.items.iter().zip(totals.items.iter()).enumerate() {
        let purity = item.display_purity();
        if purity.is_empty() {
            let _ = writeln!(out, "{}. {}", index + 1, item.display_name());
        } else {
            let _ = writeln!(out, "{}. {} ({})", index + 1, item.display_name(), purity);
        }
        let _ = writeln!(
            out,
            "   Net Wt: {:.3} g @ {}/g",
            item.net_weight,
            money(item.gold_rate)
        );
        let _ = writeln!(out, "   Gold Value: {}", money(b.gold_value));
        if b.making_charge != 0.0 {
            let _ = writeln!(out, "   Making: {}", money(b.making_charge));
        }
        if b.wastage_charge != 0.0 {
            let _ = writeln!(out, "   Wastage: {}", money(b.wastage_charge));
        }
        if item.gst_enabled {
            let _ = writeln!(out, "   GST ({}%): {}", GST_PERCENT, money(b.gst));
        }
        let _ = writeln!(out, "   Item Total: {}", money(b.total));
    }
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "Subtotal: {}", money(totals.subtotal));
    if totals.gst != 0.0 {
        let _ = writeln!(out, "GST: {}", money(totals.gst));
    }
    if bill.round_off && totals.round_off != 0.0 {
        let sign = if totals.round_off > 0.0 { "+" } else { "-" };
        let _ = writeln!(
            out,
            "Round Off: {}{}",
            sign,
            money(calc::round2(totals.round_off.abs()))
        );
    }
    let _ = writeln!(out, "*Grand Total: {}*", money(bill.grand_total));
    let _ = writeln!(
        out,
        "Payment: {} ({})",
        bill.payment_status, bill.payment_mode
    );
    out.push_str("Thank you for shopping with us!");
    out
}
