//! # Payroll Arithmetic
//!
//! Pure payroll math: payroll periods (calendar months), kasbon installment
//! schedules, the lapse rule, and net pay.
//!
//! ## Installment schedule
//! ```text
//! principal Rp500.000, tenor 3
//!
//! installment = ceil(500000 / 3) = 166667
//! month 1: 166667
//! month 2: 166667
//! month 3: 166666   (final installment absorbs the remainder)
//! sum:     500000   (always exactly the principal)
//! ```
//!
//! A kasbon lapses when the current period is strictly after its last
//! scheduled installment period while the advance is still active.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Period
// =============================================================================

/// A payroll period: one calendar month, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Creates a period, month must be 1-12.
    pub fn new(year: i32, month: u32) -> Option<Period> {
        if (1..=12).contains(&month) {
            Some(Period { year, month })
        } else {
            None
        }
    }

    /// Parses the `YYYY-MM` wire/database form.
    pub fn parse(s: &str) -> Result<Period, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: "must be YYYY-MM".to_string(),
        };

        let (year_part, month_part) = s.split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;

        Period::new(year, month).ok_or_else(invalid)
    }

    /// Returns the `YYYY-MM` string form.
    pub fn to_string_form(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Returns this period shifted forward by `months`.
    pub fn add_months(&self, months: u32) -> Period {
        let zero_based = (self.month - 1) + months;
        Period {
            year: self.year + (zero_based / 12) as i32,
            month: zero_based % 12 + 1,
        }
    }

    /// Months from `self` to `other` (negative when `other` is earlier).
    pub fn months_until(&self, other: Period) -> i64 {
        (other.year as i64 - self.year as i64) * 12 + (other.month as i64 - self.month as i64)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_form())
    }
}

// =============================================================================
// Kasbon installments
// =============================================================================

/// The regular installment amount: ceil(principal / tenor).
///
/// Rounding up means the advance never under-collects; the final
/// installment gives the difference back.
pub fn installment_amount(principal: i64, tenor: i32) -> i64 {
    debug_assert!(principal >= 0 && tenor > 0);
    (principal + tenor as i64 - 1) / tenor as i64
}

/// The installment due at `index` (0-based). Early installments take the
/// ceiling amount and the tail takes the floor, so the schedule sums
/// exactly to the principal and no installment is ever negative.
pub fn installment_for(principal: i64, tenor: i32, index: i32) -> i64 {
    debug_assert!(index >= 0 && index < tenor);
    (principal + tenor as i64 - 1 - index as i64) / tenor as i64
}

/// Which installment (0-based) falls in `period`, if any.
pub fn installment_index(start_period: Period, tenor: i32, period: Period) -> Option<i32> {
    let offset = start_period.months_until(period);
    if offset >= 0 && offset < tenor as i64 {
        Some(offset as i32)
    } else {
        None
    }
}

/// The lapse rule: true when `current` is strictly after the last
/// scheduled installment period.
pub fn has_lapsed(start_period: Period, tenor: i32, current: Period) -> bool {
    start_period.months_until(current) >= tenor as i64
}

// =============================================================================
// Net pay
// =============================================================================

/// Payslip components for one staff member and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    pub base_salary: i64,
    pub total_bonuses: i64,
    pub total_deductions: i64,
    pub net_pay: i64,
}

/// net = base + bonuses - deductions. Deductions can push net below zero;
/// the report shows the negative number rather than silently clamping.
pub fn compute_payslip(base_salary: i64, total_bonuses: i64, total_deductions: i64) -> Payslip {
    Payslip {
        base_salary,
        total_bonuses,
        total_deductions,
        net_pay: base_salary + total_bonuses - total_deductions,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(year: i32, month: u32) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn test_period_parse_and_format() {
        let period = Period::parse("2026-08").unwrap();
        assert_eq!(period, p(2026, 8));
        assert_eq!(period.to_string_form(), "2026-08");

        assert!(Period::parse("2026-13").is_err());
        assert!(Period::parse("2026-0").is_err());
        assert!(Period::parse("26-08").is_err());
        assert!(Period::parse("garbage").is_err());
    }

    #[test]
    fn test_period_add_months_wraps_year() {
        assert_eq!(p(2026, 11).add_months(3), p(2027, 2));
        assert_eq!(p(2026, 1).add_months(0), p(2026, 1));
        assert_eq!(p(2026, 12).add_months(1), p(2027, 1));
    }

    #[test]
    fn test_months_until() {
        assert_eq!(p(2026, 8).months_until(p(2026, 10)), 2);
        assert_eq!(p(2026, 8).months_until(p(2027, 1)), 5);
        assert_eq!(p(2026, 8).months_until(p(2026, 6)), -2);
    }

    #[test]
    fn test_installments_sum_to_principal() {
        for (principal, tenor) in [(500_000i64, 3), (100_000, 4), (99_999, 7), (1, 5)] {
            let sum: i64 = (0..tenor).map(|i| installment_for(principal, tenor, i)).sum();
            assert_eq!(sum, principal, "principal {} tenor {}", principal, tenor);
        }
    }

    #[test]
    fn test_installment_schedule() {
        // Rp500.000 over 3 months: 166667 + 166667 + 166666
        assert_eq!(installment_amount(500_000, 3), 166_667);
        assert_eq!(installment_for(500_000, 3, 0), 166_667);
        assert_eq!(installment_for(500_000, 3, 1), 166_667);
        assert_eq!(installment_for(500_000, 3, 2), 166_666);
    }

    #[test]
    fn test_installment_index() {
        let start = p(2026, 8);
        assert_eq!(installment_index(start, 3, p(2026, 8)), Some(0));
        assert_eq!(installment_index(start, 3, p(2026, 10)), Some(2));
        assert_eq!(installment_index(start, 3, p(2026, 11)), None);
        assert_eq!(installment_index(start, 3, p(2026, 7)), None);
    }

    #[test]
    fn test_lapse_boundary() {
        let start = p(2026, 8);
        // Last scheduled installment is 2026-10; 2026-11 lapses.
        assert!(!has_lapsed(start, 3, p(2026, 10)));
        assert!(has_lapsed(start, 3, p(2026, 11)));
        assert!(!has_lapsed(start, 3, p(2026, 8)));
    }

    #[test]
    fn test_compute_payslip() {
        let slip = compute_payslip(2_000_000, 150_000, 166_667);
        assert_eq!(slip.net_pay, 1_983_333);

        // Deductions may exceed earnings; report the negative honestly.
        let slip = compute_payslip(0, 0, 50_000);
        assert_eq!(slip.net_pay, -50_000);
    }
}
