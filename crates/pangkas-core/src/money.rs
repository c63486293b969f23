//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Rupiah?
//! ```text
//! In floating point:
//!   0.1 + 0.2 = 0.30000000000000004   WRONG
//!
//! Our solution: whole rupiah as i64. The Indonesian rupiah has no usable
//! minor unit at the till, so Rp20.000 is simply 20000. The database, all
//! calculations and the API use this integer form; only receipts format it.
//! ```
//!
//! ## Usage
//! ```rust
//! use pangkas_core::money::Money;
//!
//! let price = Money::from_rupiah(20_000);
//! let line = price * 2;
//! assert_eq!(line.rupiah(), 40_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for corrections and net-pay math
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use pangkas_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(20_000);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.rupiah(), 60_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a whole percentage and returns the resulting amount,
    /// truncated toward zero.
    ///
    /// This is the commission formula: `price * pct / 100`. Commission
    /// percentages are whole percents (40 means 40%), so a Rp50.000 service
    /// at 40% yields exactly Rp20.000. When the division is inexact the
    /// fraction is dropped; the lost rupiah stays with the house.
    ///
    /// ## Example
    /// ```rust
    /// use pangkas_core::money::Money;
    ///
    /// let price = Money::from_rupiah(50_000);
    /// assert_eq!(price.apply_percent(40).rupiah(), 20_000);
    /// ```
    pub fn apply_percent(&self, pct: i64) -> Money {
        // i128 to prevent overflow on large amounts
        let amount = (self.0 as i128 * pct as i128) / 100;
        Money(amount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in the receipt format, e.g. `Rp20.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp{}", sign, group_thousands(self.0.unsigned_abs()))
    }
}

/// Groups digits with dots, Indonesian style: 1234567 -> "1.234.567".
fn group_thousands(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut groups: Vec<String> = Vec::new();
    while value > 0 {
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    let mut out = groups.pop().unwrap_or_default();
    // Strip the leading zeros from the most significant group
    out = out.trim_start_matches('0').to_string();
    for g in groups.into_iter().rev() {
        out.push('.');
        out.push_str(&g);
    }
    out
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Money::from_rupiah(20_000);
        assert_eq!(money.rupiah(), 20_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_rupiah(20_000)), "Rp20.000");
        assert_eq!(format!("{}", Money::from_rupiah(1_234_567)), "Rp1.234.567");
        assert_eq!(format!("{}", Money::from_rupiah(500)), "Rp500");
        assert_eq!(format!("{}", Money::from_rupiah(-5_500)), "-Rp5.500");
        assert_eq!(format!("{}", Money::from_rupiah(0)), "Rp0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(10_000);
        let b = Money::from_rupiah(5_000);

        assert_eq!((a + b).rupiah(), 15_000);
        assert_eq!((a - b).rupiah(), 5_000);
        let result: Money = a * 3;
        assert_eq!(result.rupiah(), 30_000);
    }

    #[test]
    fn test_commission_exact() {
        // Rp50.000 at 40% = Rp20.000
        let price = Money::from_rupiah(50_000);
        assert_eq!(price.apply_percent(40).rupiah(), 20_000);
    }

    #[test]
    fn test_commission_truncates() {
        // Rp33.333 at 10% = Rp3.333,3 -> Rp3.333
        let price = Money::from_rupiah(33_333);
        assert_eq!(price.apply_percent(10).rupiah(), 3_333);
    }

    #[test]
    fn test_zero_percent() {
        let price = Money::from_rupiah(50_000);
        assert_eq!(price.apply_percent(0).rupiah(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_rupiah(100);
        assert!(positive.is_positive());

        let negative = Money::from_rupiah(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().rupiah(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_rupiah(20_000);
        assert_eq!(unit_price.multiply_quantity(2).rupiah(), 40_000);
    }
}
