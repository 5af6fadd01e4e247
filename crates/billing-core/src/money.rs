//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A bill of 3 × 0.10 would not equal 0.30 and the 10% discount would     │
//! │  drift by fractions of a paisa across the line items.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    Cashier types "2.5" → parsed once into 250                           │
//! │    Every sum, product and discount is integer math                      │
//! │    Only the wire format and the display convert back to "2.5"          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billing_core::money::Money;
//!
//! let price = Money::parse_decimal("2.5").unwrap();
//! assert_eq!(price.cents(), 250);
//!
//! let line_total = price.checked_mul_quantity(10).unwrap();
//! assert_eq!(line_total.cents(), 2_500);
//! assert_eq!(line_total.to_string(), "₹25.00");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction results can be inspected before clamping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Wire format**: serialized as a decimal number of major units
///   (`250` paise ↔ `2.5`), which is what the backend's decimal columns take
///
/// ## Where Money is Used
/// ```text
/// "50" typed ──► LineItem.unit_price ──► LineItem.total_price
///                                              │
///                          Σ over items ──► BillTotals.subtotal
///                                              │
///                       10% fixed + manual ──► BillTotals.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative amounts to zero.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-300).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(300).clamp_non_negative().cents(), 300);
    /// ```
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    /// Calculates a percentage of this amount, rounded half-up to the paisa.
    ///
    /// ## Arguments
    /// * `bps` - Percentage in basis points (1000 = 10%)
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 is the
    /// half-up rounding term, which is what the backend applies when it
    /// recomputes the discount with two decimal places.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(2_500);           // 25.00
    /// assert_eq!(subtotal.percentage(1000).cents(), 250); // 2.50
    ///
    /// let odd = Money::from_cents(1_005);                 // 10.05
    /// assert_eq!(odd.percentage(1000).cents(), 101);      // 1.005 → 1.01
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 so that large bills cannot overflow the intermediate product
        let amount = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(amount as i64)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(5_000);
    /// assert_eq!(unit_price.checked_mul_quantity(2).unwrap().cents(), 10_000);
    /// assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: u32) -> Option<Money> {
        self.0.checked_mul(qty as i64).map(Money)
    }

    /// Parses decimal text typed by the cashier into Money.
    ///
    /// ## Accepted Forms
    /// ```text
    /// "50"     → 5000
    /// "2.5"    → 250
    /// ".75"    → 75
    /// "3."     → 300
    /// "1.005"  → 101   (half-up past the second decimal)
    /// "-4"     → -400  (sign is kept; callers decide what negative means)
    /// " 12 "   → 1200  (surrounding whitespace ignored)
    ///
    /// "", ".", "abc", "1,5", "1e3", "12abc" → None
    /// ```
    pub fn parse_decimal(input: &str) -> Option<Money> {
        let text = input.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().ok()?.checked_mul(100)?
        };

        let mut digits = fraction.bytes().map(|b| (b - b'0') as i64);
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let cents = whole_cents.checked_add(tenths * 10 + hundredths + i64::from(round_up))?;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value as a floating point number of major units.
    ///
    /// Only for the wire format and display; never compute with it.
    #[inline]
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Converts a decimal major-unit amount received on the wire.
    #[inline]
    pub fn from_major_f64(value: f64) -> Self {
        Money((value * 100.0).round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way the bill summary does: `₹12.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, (self.0 / 100).unsigned_abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the i64 bounds instead of wrapping. Use `checked_add` where
/// an exact result is required.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Saturates at the i64 bounds instead of wrapping.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Wire Format
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Ok(Money::from_major_f64(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        value
            .checked_mul(100)
            .map(Money::from_cents)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        i64::try_from(value)
            .map_err(|_| E::custom("amount out of range"))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        Money::parse_decimal(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
