//! # Terminal Formatting
//!
//! Plain-text rendering of drafts, bills and the daily summary.
//!
//! ```text
//!   1. Rice  2 × ₹50.00 = ₹100.00
//!   ───────────────────────────────
//!   Subtotal             ₹100.00
//!   Discount (10%)       -₹10.00
//!   Manual discount       -₹5.00
//!   Total                 ₹85.00
//! ```

use std::fmt::Write;

use billing_core::{BillRecord, BillTotals, DailySummary, LineItem, Money};

const RULE: &str = "───────────────────────────────";

fn row(out: &mut String, label: &str, amount: Money) {
    let _ = writeln!(out, "  {:<18}{:>12}", label, amount.to_string());
}

fn discount_row(out: &mut String, label: &str, amount: Money) {
    let _ = writeln!(out, "  {:<18}{:>12}", label, format!("-{}", amount));
}

pub fn render_items(items: &[LineItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, item);
    }
    out
}

pub fn render_totals(totals: &BillTotals) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", RULE);
    row(&mut out, "Subtotal", totals.subtotal);
    discount_row(&mut out, "Discount (10%)", totals.fixed_discount);
    if !totals.manual_discount_amount.is_zero() {
        discount_row(&mut out, "Manual discount", totals.manual_discount_amount);
    }
    row(&mut out, "Total", totals.total);
    out
}

/// One line per bill for the today's-bills listing.
pub fn render_bill_row(bill: &BillRecord) -> String {
    let time = bill
        .created_at
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let customer = bill.customer_name.as_deref().unwrap_or("Walk-in");

    format!(
        "{}  {:<20} {:<16} {:>6} {:>12}",
        time,
        bill.bill_number,
        customer,
        bill.payment_method.as_str(),
        bill.total_amount.to_string()
    )
}

pub fn render_bill(bill: &BillRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bill {}", bill.bill_number);
    if let Some(created) = bill.created_at {
        let _ = writeln!(out, "  {}", created.format("%d %b %Y %H:%M"));
    }
    if let Some(name) = &bill.customer_name {
        let _ = writeln!(out, "  Customer: {}", name);
    }
    if let Some(phone) = &bill.customer_phone {
        let _ = writeln!(out, "  Phone:    {}", phone);
    }
    let _ = writeln!(out, "  Payment:  {}", bill.payment_method);
    let _ = writeln!(out, "  {}", RULE);

    for (i, item) in bill.items.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}  {} × {} = {}",
            i + 1,
            item.product_name,
            item.quantity,
            item.unit_price,
            item.total_price
        );
    }

    let _ = writeln!(out, "  {}", RULE);
    row(&mut out, "Subtotal", bill.subtotal);
    discount_row(&mut out, "Discount", bill.discount_amount);
    row(&mut out, "Total", bill.total_amount);
    out
}

pub fn render_summary(summary: &DailySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Today");
    let _ = writeln!(out, "  {:<18}{:>12}", "Bills", summary.total_bills);
    row(&mut out, "Sales", summary.total_sales);
    row(&mut out, "Discounts given", summary.total_discounts);
    out
}
