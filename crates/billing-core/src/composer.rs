//! # Bill Composer
//!
//! Holds the draft bill while the cashier builds it and derives its totals.
//!
//! ## Composer Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Bill Operations                                │
//! │                                                                         │
//! │  Cashier Action            Composer Call             Draft Change       │
//! │  ──────────────            ─────────────             ────────────       │
//! │                                                                         │
//! │  Type customer ──────────► set_customer_info() ────► name/phone         │
//! │                                                                         │
//! │  "+ Add Item" ───────────► add_item() ─────────────► items.push(item)   │
//! │                                                                         │
//! │  Tap ✕ on a line ────────► remove_item(i) ─────────► items.remove(i)    │
//! │                                                                         │
//! │  Type discount ──────────► set_manual_discount() ──► discount text      │
//! │                                                                         │
//! │  Tap payment button ─────► set_payment_method() ───► payment method     │
//! │                                                                         │
//! │  View summary ───────────► compute_totals() ───────► (read only)        │
//! │                                                                         │
//! │  Create Bill ────────────► to_submission_payload() ► (read only)        │
//! │                                                                         │
//! │  Bill saved ─────────────► reset() ────────────────► empty draft        │
//! │                                                                         │
//! │  NOTE: Every mutation validates first. A failed call leaves the        │
//! │        draft exactly as it was.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{BillTotals, LineItem, PaymentMethod, SubmissionPayload};
use crate::validation::{
    normalize_optional, parse_manual_discount, parse_quantity, parse_unit_price,
    validate_product_name,
};
use crate::FIXED_DISCOUNT_BPS;

/// Text the manual discount field holds on a fresh draft.
const INITIAL_DISCOUNT_TEXT: &str = "0";

/// Raw item fields as typed by the cashier, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCandidate {
    pub product_name: String,
    pub quantity: String,
    pub unit_price: String,
}

impl ItemCandidate {
    pub fn new(
        product_name: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        ItemCandidate {
            product_name: product_name.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }
}

/// The draft bill plus the suggestion list shown under the product field.
///
/// ## Invariants
/// - Items keep insertion order
/// - Every item satisfies the `LineItem` invariants
/// - The manual discount is kept as typed; it is parsed on every read, so
///   a half-typed value never surfaces as an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillComposer {
    customer_name: String,
    customer_phone: String,
    items: Vec<LineItem>,
    manual_discount: String,
    payment_method: PaymentMethod,
    suggestions: Vec<String>,
}

impl Default for BillComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl BillComposer {
    /// Creates an empty draft.
    pub fn new() -> Self {
        BillComposer {
            customer_name: String::new(),
            customer_phone: String::new(),
            items: Vec::new(),
            manual_discount: INITIAL_DISCOUNT_TEXT.to_string(),
            payment_method: PaymentMethod::default(),
            suggestions: Vec::new(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Sets the optional customer fields. Always succeeds.
    pub fn set_customer_info(&mut self, name: Option<&str>, phone: Option<&str>) {
        self.customer_name = name.map(str::trim).unwrap_or_default().to_string();
        self.customer_phone = phone.map(str::trim).unwrap_or_default().to_string();
    }

    /// Validates a candidate and appends it as a new line.
    ///
    /// ## Validation Order
    /// 1. product name non-empty after trim → `EmptyProductName`
    /// 2. quantity positive → `InvalidQuantity`
    /// 3. unit price non-negative → `InvalidPrice`
    ///
    /// A line whose total, or whose addition to the subtotal, does not fit
    /// in `Money` is rejected as `InvalidPrice`.
    ///
    /// On success the suggestion list is cleared and the updated items are
    /// returned.
    pub fn add_item(&mut self, candidate: ItemCandidate) -> ValidationResult<&[LineItem]> {
        let product_name = validate_product_name(&candidate.product_name)?;
        let quantity = parse_quantity(&candidate.quantity)?;
        let unit_price = parse_unit_price(&candidate.unit_price)?;

        // Only reachable with absurd prices; the subtotal must stay exact
        let item = LineItem::new(product_name, quantity, unit_price)
            .filter(|item| self.subtotal().checked_add(item.total_price()).is_some())
            .ok_or(ValidationError::InvalidPrice)?;

        self.items.push(item);
        self.suggestions.clear();
        Ok(&self.items)
    }

    /// Removes the line at `index`.
    pub fn remove_item(&mut self, index: usize) -> ValidationResult<LineItem> {
        if index >= self.items.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Stores the manual discount text. Non-numeric input counts as zero.
    pub fn set_manual_discount(&mut self, amount: &str) {
        self.manual_discount = amount.to_string();
    }

    /// Selects the payment method by its name.
    pub fn set_payment_method(&mut self, method: &str) -> ValidationResult<PaymentMethod> {
        let parsed: PaymentMethod = method.parse()?;
        self.payment_method = parsed;
        Ok(parsed)
    }

    /// Returns the draft to its initial empty state.
    pub fn reset(&mut self) {
        *self = BillComposer::new();
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Replaces the suggestion list shown under the product name field.
    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Picks a suggestion and clears the list.
    pub fn select_suggestion(&mut self, index: usize) -> Option<String> {
        if index >= self.suggestions.len() {
            return None;
        }
        let chosen = self.suggestions.swap_remove(index);
        self.suggestions.clear();
        Some(chosen)
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Customer name as it will be submitted (`None` when blank).
    pub fn customer_name(&self) -> Option<String> {
        normalize_optional(Some(&self.customer_name))
    }

    /// Customer phone as it will be submitted (`None` when blank).
    pub fn customer_phone(&self) -> Option<String> {
        normalize_optional(Some(&self.customer_phone))
    }

    /// The effective manual discount.
    pub fn manual_discount(&self) -> Money {
        parse_manual_discount(&self.manual_discount)
    }

    fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::total_price).sum()
    }

    /// Derives the bill totals from the current draft.
    ///
    /// ## Calculation
    /// ```text
    /// subtotal        = Σ item.total_price
    /// fixed_discount  = 10% × subtotal        (half-up to the paisa)
    /// total_discount  = fixed_discount + manual discount
    /// total           = max(0, subtotal − total_discount)
    /// ```
    ///
    /// `add_item` keeps the subtotal in range. A manual discount too large
    /// to add saturates `total_discount`, which still yields a zero total.
    pub fn compute_totals(&self) -> BillTotals {
        let subtotal = self.subtotal();
        let fixed_discount = subtotal.percentage(FIXED_DISCOUNT_BPS);
        let manual_discount_amount = self.manual_discount();
        let total_discount = fixed_discount + manual_discount_amount;
        let total = (subtotal - total_discount).clamp_non_negative();

        BillTotals {
            subtotal,
            fixed_discount,
            manual_discount_amount,
            total_discount,
            total,
        }
    }

    /// Snapshots the draft as a request body.
    pub fn to_submission_payload(&self, user_id: i64) -> ValidationResult<SubmissionPayload> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptyBill);
        }

        Ok(SubmissionPayload {
            user_id,
            customer_name: self.customer_name(),
            customer_phone: self.customer_phone(),
            items: self.items.clone(),
            manual_discount_amount: self.manual_discount(),
            payment_method: self.payment_method,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
