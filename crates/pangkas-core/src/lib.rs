//! # pangkas-core: Pure Business Logic for Pangkas POS
//!
//! This crate is the heart of the barbershop back office. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Admin SPA / POS client                      │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                │ JSON over HTTP
//! ┌──────────────────────────────▼──────────────────────────────────┐
//! │                     apps/api (axum handlers)                    │
//! └──────────────────────────────┬──────────────────────────────────┘
//! ┌──────────────────────────────▼──────────────────────────────────┐
//! │               ★ pangkas-core (THIS CRATE) ★                     │
//! │                                                                 │
//! │   types    money    cart    payroll    receipt    validation    │
//! │                                                                 │
//! │   NO I/O - NO DATABASE - NO NETWORK - PURE FUNCTIONS            │
//! └──────────────────────────────┬──────────────────────────────────┘
//! ┌──────────────────────────────▼──────────────────────────────────┐
//! │                  pangkas-db (MySQL repositories)                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: database, network and file access are forbidden here
//! 3. **Integer Money**: all amounts are whole rupiah (i64), never floats
//! 4. **Explicit Errors**: typed errors, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod payroll;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
///
/// Prevents runaway carts and keeps receipts printable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single product line.
///
/// Guards against typos like 1000 instead of 10.
pub const MAX_LINE_QUANTITY: i64 = 999;
