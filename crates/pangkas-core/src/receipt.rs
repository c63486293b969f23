//! # Receipt Numbers
//!
//! Formatting for the human-readable receipt number printed on every struk:
//! `{2-digit store code}/{YYMMDD}/{4-digit daily sequence}`.
//!
//! The sequence itself comes from the per-store-per-day counter row that
//! the sale transaction bumps atomically (see the transaction repository in
//! pangkas-db); this module only turns the parts into a string.

use chrono::NaiveDate;

/// Formats a receipt number from its parts.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use pangkas_core::receipt::format_receipt_number;
///
/// let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
/// assert_eq!(format_receipt_number("02", date, 1), "02/260805/0001");
/// ```
pub fn format_receipt_number(store_code: &str, date: NaiveDate, seq: u32) -> String {
    format!("{}/{}/{:04}", store_code, date.format("%y%m%d"), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn test_format() {
        assert_eq!(format_receipt_number("02", date(), 1), "02/260805/0001");
        assert_eq!(format_receipt_number("02", date(), 42), "02/260805/0042");
    }

    #[test]
    fn test_sequence_strictly_increasing() {
        // Sequential sales at one store on one day differ only in the
        // sequence, which increases by exactly 1 per sale.
        let numbers: Vec<String> = (1..=5)
            .map(|seq| format_receipt_number("07", date(), seq))
            .collect();
        for pair in numbers.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(numbers[4], "07/260805/0005");
    }

    #[test]
    fn test_sequence_overflows_width_gracefully() {
        // A 10,000th sale in one day widens the field instead of wrapping.
        assert_eq!(format_receipt_number("02", date(), 10_000), "02/260805/10000");
    }
}
