//! # billing-core: Pure Business Logic for the Billing Client
//!
//! This crate is the **heart** of the billing client. It holds the bill
//! composition state machine and every monetary rule as pure code with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Retail Billing Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Rendering layer (external)                   │   │
//! │  │    Home ──► Create Bill ──► Today's Bills                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    billing-client                               │   │
//! │  │    session, gateway, lookup, submission workflow                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billing-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ composer  │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Money   │  │ DraftBill │  │   rules   │  │   │
//! │  │   │ Payload   │  │ discounts │  │  totals   │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain and wire types (LineItem, SubmissionPayload, BillRecord, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error type
//! - [`validation`] - Parsing and validation of cashier input
//! - [`composer`] - The Bill Composer (draft bill state + totals)
//!
//! ## Example Usage
//!
//! ```rust
//! use billing_core::composer::{BillComposer, ItemCandidate};
//!
//! let mut composer = BillComposer::new();
//! composer.add_item(ItemCandidate::new("Rice", "2", "50")).unwrap();
//! composer.set_manual_discount("5");
//!
//! let totals = composer.compute_totals();
//! assert_eq!(totals.subtotal.cents(), 10_000);      // 100.00
//! assert_eq!(totals.fixed_discount.cents(), 1_000); // 10.00
//! assert_eq!(totals.total.cents(), 8_500);          // 85.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod composer;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use composer::{BillComposer, ItemCandidate};
pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The fixed discount applied to every bill, in basis points (1000 = 10%).
///
/// ## Business Reason
/// The shop gives every customer 10% off the subtotal. It is a policy
/// constant and is not configurable by the cashier; any additional
/// reduction goes through the manual discount.
pub const FIXED_DISCOUNT_BPS: u32 = 1000;

/// Largest quantity a single line item can carry.
///
/// The backend stores quantities as a signed 32-bit integer.
pub const MAX_ITEM_QUANTITY: u32 = i32::MAX as u32;
