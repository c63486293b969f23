//! # Sale Line Items
//!
//! Request-side line types for the sale-creation path plus the pure pieces
//! of its algorithm: merging duplicate product lines and the per-line
//! revenue/cost/profit arithmetic. Everything here is deterministic; the
//! repository supplies the locked stock reads around it.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Request line types
// =============================================================================

/// A product line as submitted by the cashier.
///
/// `unit_price_override` lets the till discount a single sale without
/// touching the catalog; cost basis always comes from the product record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_override: Option<i64>,
}

/// A service line as submitted by the cashier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLine {
    pub pricelist_id: String,
    pub capster_id: String,
    pub price_override: Option<i64>,
}

// =============================================================================
// Merging
// =============================================================================

/// Merges duplicate product lines (same product id) by summing quantities.
///
/// Order of first appearance is preserved. When duplicates disagree on the
/// price override, the first line's override wins; the till sends one
/// override per product so this only matters for malformed input.
pub fn merge_product_lines(lines: &[ProductLine]) -> Vec<ProductLine> {
    let mut merged: Vec<ProductLine> = Vec::with_capacity(lines.len());

    for line in lines {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => existing.quantity += line.quantity,
            None => merged.push(line.clone()),
        }
    }

    merged
}

// =============================================================================
// Line arithmetic
// =============================================================================

/// Revenue, cost basis and profit for one product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductLineTotals {
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
}

/// Computes a product line's totals from its frozen unit prices.
///
/// profit = revenue - cost, both scaled by quantity.
pub fn product_line_totals(unit_price: Money, unit_cost: Money, qty: i64) -> ProductLineTotals {
    let revenue = unit_price.multiply_quantity(qty);
    let cost = unit_cost.multiply_quantity(qty);
    ProductLineTotals {
        revenue,
        cost,
        profit: revenue - cost,
    }
}

/// Computes the commission owed on a service line.
///
/// commission = price * pct / 100, truncated (see [`Money::apply_percent`]).
#[inline]
pub fn commission_amount(price: Money, pct: i64) -> Money {
    price.apply_percent(pct)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, qty: i64) -> ProductLine {
        ProductLine {
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price_override: None,
        }
    }

    #[test]
    fn test_merge_sums_duplicate_quantities() {
        let lines = vec![line("shampoo", 1), line("pomade", 2), line("shampoo", 1)];
        let merged = merge_product_lines(&lines);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].product_id, "shampoo");
        assert_eq!(merged[0].quantity, 2);
        assert_eq!(merged[1].product_id, "pomade");
        assert_eq!(merged[1].quantity, 2);
    }

    #[test]
    fn test_merge_keeps_first_override() {
        let mut a = line("shampoo", 1);
        a.unit_price_override = Some(18_000);
        let b = line("shampoo", 1);

        let merged = merge_product_lines(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 2);
        assert_eq!(merged[0].unit_price_override, Some(18_000));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_product_lines(&[]).is_empty());
    }

    #[test]
    fn test_product_line_totals() {
        // 2x Shampoo @ Rp20.000, cost Rp12.000
        let totals = product_line_totals(
            Money::from_rupiah(20_000),
            Money::from_rupiah(12_000),
            2,
        );
        assert_eq!(totals.revenue.rupiah(), 40_000);
        assert_eq!(totals.cost.rupiah(), 24_000);
        assert_eq!(totals.profit.rupiah(), 16_000);
    }

    #[test]
    fn test_commission_amount() {
        // Rp50.000 service at 40% commission
        let commission = commission_amount(Money::from_rupiah(50_000), 40);
        assert_eq!(commission.rupiah(), 20_000);
    }
}
