//! # Error Types
//!
//! Domain-specific error types for billing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billing-core errors (this file)                                       │
//! │  └── ValidationError  - Cashier input violates a precondition          │
//! │                                                                         │
//! │  billing-client errors (separate crate)                                │
//! │  ├── ApiError         - Transport / HTTP failures                      │
//! │  └── ClientError      - Everything a client operation can return       │
//! │                                                                         │
//! │  Flow: ValidationError → ClientError → display message                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Validation errors never reach the network
//! 2. Every variant is recoverable by correcting the input
//! 3. The `Display` text is the message shown to the cashier

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// A failed validation blocks the attempted mutation; the draft bill is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Product name is empty after trimming.
    #[error("Please enter product name")]
    EmptyProductName,

    /// Quantity is missing, non-numeric or not positive.
    ///
    /// ## When This Occurs
    /// ```text
    /// Quantity field: "0"   → InvalidQuantity
    /// Quantity field: "-3"  → InvalidQuantity
    /// Quantity field: "abc" → InvalidQuantity
    /// ```
    #[error("Please enter valid quantity")]
    InvalidQuantity,

    /// Unit price is missing, non-numeric or negative.
    #[error("Please enter valid price")]
    InvalidPrice,

    /// Item index does not exist in the draft bill.
    #[error("No item at position {index} (bill has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Payment method is not one of CASH, UPI, CARD, ONLINE.
    #[error("Unknown payment method '{0}'. Valid options: CASH, UPI, CARD, ONLINE")]
    UnknownPaymentMethod(String),

    /// Bill has no items and cannot be submitted.
    #[error("Please add at least one item")]
    EmptyBill,

    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
