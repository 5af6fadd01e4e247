//! # Validation Module
//!
//! Parsing and validation of the free-text fields a cashier fills in.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Rendering layer                                              │
//! │  └── Numeric keyboards, placeholders                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any mutation)                            │
//! │  ├── Text → typed values (quantity, Money)                             │
//! │  └── Business rules (non-empty name, positive quantity)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Bean validation on the request, recomputed totals                 │
//! │                                                                         │
//! │  A failure in layer 2 never reaches the network.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ```rust
/// use billing_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Rice ").unwrap(), "Rice");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyProductName);
    }

    Ok(name.to_string())
}

/// Validates that a required field is not blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Trims an optional free-text field, collapsing blank input to `None`.
///
/// ```rust
/// use billing_core::validation::normalize_optional;
///
/// assert_eq!(normalize_optional(Some("  Asha ")), Some("Asha".to_string()));
/// assert_eq!(normalize_optional(Some("   ")), None);
/// assert_eq!(normalize_optional(None), None);
/// ```
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a quantity typed by the cashier.
///
/// ## Rules
/// - Must parse as a finite number greater than zero
/// - Fractional quantities are truncated toward zero ("2.7" → 2)
/// - A quantity that truncates to zero ("0.5") is rejected: a line item
///   always carries at least one unit
/// - Must not exceed `MAX_ITEM_QUANTITY`
///
/// ## User Workflow
/// ```text
/// Quantity field: "2"
///      │
///      ▼
/// parse_quantity("2") ← THIS FUNCTION
///      │
///      ├── not a number / <= 0? → "Please enter valid quantity"
///      │
///      └── OK(2) → line total = 2 × unit price
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<u32> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity)?;

    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidQuantity);
    }

    let whole = value.trunc();
    if whole < 1.0 || whole > MAX_ITEM_QUANTITY as f64 {
        return Err(ValidationError::InvalidQuantity);
    }

    Ok(whole as u32)
}

/// Parses a unit price typed by the cashier.
///
/// ## Rules
/// - Must parse as a decimal amount
/// - Zero is allowed (free items), negative is not
///
/// ```rust
/// use billing_core::validation::parse_unit_price;
///
/// assert_eq!(parse_unit_price("2.5").unwrap().cents(), 250);
/// assert!(parse_unit_price("0").is_ok());
/// assert!(parse_unit_price("-1").is_err());
/// assert!(parse_unit_price("").is_err());
/// ```
pub fn parse_unit_price(input: &str) -> ValidationResult<Money> {
    match Money::parse_decimal(input) {
        Some(price) if !price.is_negative() => Ok(price),
        _ => Err(ValidationError::InvalidPrice),
    }
}

/// Parses the manual discount field.
///
/// This never fails: the field is free text and a half-typed value must
/// not block the cashier. Anything that is not a non-negative decimal
/// counts as no discount.
///
/// ```rust
/// use billing_core::validation::parse_manual_discount;
///
/// assert_eq!(parse_manual_discount("5").cents(), 500);
/// assert_eq!(parse_manual_discount("abc").cents(), 0);
/// assert_eq!(parse_manual_discount("").cents(), 0);
/// assert_eq!(parse_manual_discount("-5").cents(), 0);
/// ```
pub fn parse_manual_discount(input: &str) -> Money {
    Money::parse_decimal(input)
        .map(Money::clamp_non_negative)
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================
