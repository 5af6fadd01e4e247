//! # Domain Types
//!
//! Core domain and wire types used throughout the billing client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Client-owned (draft)                 Server-assigned (read-only)       │
//! │  ┌─────────────────┐                  ┌─────────────────┐              │
//! │  │    LineItem     │ ──── submit ───► │   BillRecord    │              │
//! │  │  product_name   │                  │  bill_id        │              │
//! │  │  quantity       │                  │  bill_number    │              │
//! │  │  unit_price     │                  │  total_amount   │              │
//! │  └─────────────────┘                  └─────────────────┘              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │   BillTotals    │   │  DailySummary   │       │
//! │  │  CASH  UPI      │   │  subtotal       │   │  total_bills    │       │
//! │  │  CARD  ONLINE   │   │  discounts      │   │  total_sales    │       │
//! │  └─────────────────┘   │  total          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Every type serializes with camelCase keys, which is what the backend's
//! JSON mapping expects.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash at the counter (the default selection).
    #[default]
    Cash,
    /// UPI transfer.
    Upi,
    /// Card terminal.
    Card,
    /// Any other online payment.
    Online,
}

impl PaymentMethod {
    /// All selectable methods, in the order the payment buttons show them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Online,
    ];

    /// Returns the wire name (`"CASH"`, `"UPI"`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Online => "ONLINE",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "UPI" => Ok(PaymentMethod::Upi),
            "CARD" => Ok(PaymentMethod::Card),
            "ONLINE" => Ok(PaymentMethod::Online),
            _ => Err(ValidationError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a draft bill.
///
/// ## Invariants
/// - `product_name` is non-empty and trimmed
/// - `quantity` is at least 1
/// - `total_price == unit_price × quantity`
///
/// Fields are private so that a constructed item cannot drift out of those
/// invariants; a line is replaced by removing it and adding a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    product_name: String,
    quantity: u32,
    unit_price: Money,
    total_price: Money,
}

impl LineItem {
    /// Builds a line item from already-validated parts.
    ///
    /// Returns `None` if `unit_price × quantity` overflows.
    pub(crate) fn new(product_name: String, quantity: u32, unit_price: Money) -> Option<Self> {
        let total_price = unit_price.checked_mul_quantity(quantity)?;
        Some(LineItem {
            product_name,
            quantity,
            unit_price,
            total_price,
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Line total (unit price × quantity).
    pub fn total_price(&self) -> Money {
        self.total_price
    }
}

impl fmt::Display for LineItem {
    /// `Rice  2 × ₹50.00 = ₹100.00`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {} × {} = {}",
            self.product_name, self.quantity, self.unit_price, self.total_price
        )
    }
}

// =============================================================================
// Bill Totals
// =============================================================================

/// Totals derived from a draft bill.
///
/// Never stored: the composer recomputes them from its current state on
/// every read.
///
/// ## Invariants
/// - `fixed_discount == 10% × subtotal`
/// - `total_discount == fixed_discount + manual_discount_amount`
/// - `total == max(0, subtotal − total_discount)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillTotals {
    pub subtotal: Money,
    pub fixed_discount: Money,
    pub manual_discount_amount: Money,
    pub total_discount: Money,
    pub total: Money,
}

// =============================================================================
// Submission Payload
// =============================================================================

/// The request body sent to persist a bill.
///
/// An immutable snapshot of the draft at the moment of submission. Blank
/// customer fields are `None` and serialize as an explicit `null`, never as
/// an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[ts(type = "number")]
    pub user_id: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub items: Vec<LineItem>,
    pub manual_discount_amount: Money,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Session User
// =============================================================================

/// The authenticated user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Server-side user id.
    #[serde(rename = "userId")]
    #[ts(type = "number")]
    pub id: i64,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    pub full_name: String,

    /// OWNER, CASHIER or MANAGER. Only displayed; the client does not
    /// authorize on it.
    pub role: String,
}

// =============================================================================
// Server-Assigned Bill
// =============================================================================

/// Lifecycle status of a persisted bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Draft,
    Completed,
    Cancelled,
}

/// One line of a persisted bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillItemRecord {
    #[serde(default)]
    #[ts(type = "number | null")]
    pub item_id: Option<i64>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
}

/// A bill as persisted by the backend.
///
/// Read-only to the client: returned by bill creation (as confirmation) and
/// by the today's-bills listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    #[ts(type = "number")]
    pub bill_id: i64,
    pub bill_number: String,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub discount_amount: Money,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub bill_status: Option<BillStatus>,
    /// Shop-local time of creation (the backend sends no offset).
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<BillItemRecord>,
}

/// Confirmation returned after a successful submission.
pub type SubmittedBill = BillRecord;

// =============================================================================
// Daily Summary
// =============================================================================

/// Today's pre-aggregated sales figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    #[ts(type = "number")]
    pub total_bills: u64,
    #[serde(default)]
    pub total_sales: Money,
    #[serde(default)]
    pub total_discounts: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("CASH".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert_eq!(" upi ".parse::<PaymentMethod>(), Ok(PaymentMethod::Upi));
        assert_eq!("Card".parse::<PaymentMethod>(), Ok(PaymentMethod::Card));
        assert_eq!("online".parse::<PaymentMethod>(), Ok(PaymentMethod::Online));
        assert_eq!(
            "CHEQUE".parse::<PaymentMethod>(),
            Err(ValidationError::UnknownPaymentMethod("CHEQUE".to_string()))
        );
    }

    #[test]
    fn test_payment_method_wire_names() {
        for method in PaymentMethod::ALL {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, json!(method.as_str()));
        }
    }

    #[test]
    fn test_line_item_serialization() {
        let item = LineItem::new("Pen".to_string(), 10, Money::from_cents(250)).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "productName": "Pen",
                "quantity": 10,
                "unitPrice": 2.5,
                "totalPrice": 25.0,
            })
        );
    }

    #[test]
    fn test_session_user_reads_login_response_fields() {
        let user: SessionUser = serde_json::from_value(json!({
            "userId": 7,
            "username": "asha",
            "email": "asha@example.com",
            "fullName": "Asha Verma",
            "role": "CASHIER",
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.full_name, "Asha Verma");
        assert_eq!(user.role, "CASHIER");
    }

    #[test]
    fn test_bill_record_from_backend_json() {
        let bill: BillRecord = serde_json::from_value(json!({
            "billId": 42,
            "billNumber": "VNDB-20250101-0001",
            "userId": 7,
            "customerName": null,
            "customerPhone": null,
            "subtotal": 25.00,
            "discountPercent": 10.00,
            "discountAmount": 2.50,
            "totalAmount": 22.50,
            "paymentMethod": "CASH",
            "billStatus": "COMPLETED",
            "createdAt": "2025-01-01T10:15:30.123",
            "items": [{
                "itemId": 1,
                "productId": null,
                "productName": "Pen",
                "quantity": 10,
                "unitPrice": 2.50,
                "totalPrice": 25.00
            }]
        }))
        .unwrap();

        assert_eq!(bill.bill_number, "VNDB-20250101-0001");
        assert_eq!(bill.total_amount.cents(), 2_250);
        assert_eq!(bill.discount_amount.cents(), 250);
        assert_eq!(bill.bill_status, Some(BillStatus::Completed));
        assert_eq!(bill.items.len(), 1);
        assert!(bill.created_at.is_some());
    }
}
