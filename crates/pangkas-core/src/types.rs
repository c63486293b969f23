//! # Domain Types
//!
//! Core domain types used throughout Pangkas POS.
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4, immutable, used for database relations
//! - Business ID where one exists (sku, store code, receipt_number)
//!
//! Line items use the snapshot pattern: product and service details are
//! copied onto the line at sale time so the sale history survives later
//! edits to master data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Enums
// =============================================================================

/// Access role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator, full access.
    Admin,
    /// Cashier operating the point of sale.
    Kasir,
    /// Barber/stylist earning service commission.
    Capster,
}

impl Role {
    /// Stable string form, matching the database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Kasir => "kasir",
            Role::Capster => "capster",
        }
    }

    /// Parses the database/claim string form.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "kasir" => Some(Role::Kasir),
            "capster" => Some(Role::Capster),
            _ => None,
        }
    }
}

/// Discriminator for the shared staff table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum StaffKind {
    Capster,
    Kasir,
}

impl StaffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffKind::Capster => "capster",
            StaffKind::Kasir => "kasir",
        }
    }
}

/// What a transaction sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Product,
    Service,
    Mixed,
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Qris,
}

/// Lifecycle of a cash advance (kasbon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum KasbonStatus {
    /// Installments are still being deducted.
    Active,
    /// Fully repaid (or written off by an admin).
    Settled,
    /// Repayment window elapsed with the advance still open.
    Lapsed,
}

/// Kind of payroll deduction (potongan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    General,
    CashAdvanceInstallment,
}

// =============================================================================
// Accounts & master data
// =============================================================================

/// A login account. `staff_id` links kasir/capster accounts to their
/// staff record for self-service lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub staff_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A barbershop branch. `code` is the 2-digit prefix of receipt numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub id: String,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A retail product (pomade, shampoo, ...). Prices in whole rupiah.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub cost_price: i64,
    pub sale_price: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_rupiah(self.cost_price)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_rupiah(self.sale_price)
    }
}

/// Quantity on hand for one product at one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Stock {
    pub store_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

/// Audit row for a stock mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    pub delta: i64,
    pub reason: String,
    pub reference_id: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A billable service on the pricelist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PricelistItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub price: i64,
    pub duration_minutes: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A capster or kasir staff record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: String,
    pub kind: StaffKind,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub store_id: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-capster commission percentage (whole percent, 0-100).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CommissionSetting {
    pub staff_id: String,
    pub percentage: i64,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sales
// =============================================================================

/// A sale header. Immutable after creation except for `payment_proof`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub store_id: String,
    pub user_id: String,
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    pub subtotal: i64,
    pub amount_paid: i64,
    pub change_due: i64,
    pub payment_proof: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One-to-one companion of a transaction holding the receipt number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Receipt {
    pub id: String,
    pub transaction_id: String,
    pub receipt_number: String,
    pub issued_at: DateTime<Utc>,
}

/// A product line. Cost and price are frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionProduct {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub name_snapshot: String,
    pub quantity: i64,
    pub unit_cost: i64,
    pub unit_price: i64,
    pub line_cost: i64,
    pub line_total: i64,
    pub profit: i64,
    pub created_at: DateTime<Utc>,
}

/// A service line with its commission snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionService {
    pub id: String,
    pub transaction_id: String,
    pub pricelist_id: String,
    pub name_snapshot: String,
    pub price: i64,
    pub capster_id: String,
    pub commission_pct: i64,
    pub commission_amount: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payroll
// =============================================================================

/// Base monthly salary for one staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalarySetting {
    pub staff_id: String,
    pub base_salary: i64,
    pub updated_at: DateTime<Utc>,
}

/// A one-off bonus for a payroll period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bonus {
    pub id: String,
    pub staff_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub period: String,
    pub created_at: DateTime<Utc>,
}

/// A payroll deduction, general or a kasbon installment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Deduction {
    pub id: String,
    pub staff_id: String,
    pub amount: i64,
    pub kind: DeductionKind,
    pub note: Option<String>,
    pub period: String,
    pub cash_advance_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An employee cash advance repaid via monthly installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashAdvance {
    pub id: String,
    pub staff_id: String,
    pub principal: i64,
    pub tenor: i32,
    pub start_period: String,
    pub status: KasbonStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Expenses & profile
// =============================================================================

/// An operating expense at one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub store_id: String,
    pub description: String,
    pub amount: i64,
    pub spent_on: NaiveDate,
    pub proof_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The shop profile singleton printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShopProfile {
    pub id: i8,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_path: Option<String>,
    pub receipt_footer: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Kasir, Role::Capster] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("manager"), None);
    }

    #[test]
    fn test_product_money_accessors() {
        let now = Utc::now();
        let product = Product {
            id: "p1".to_string(),
            sku: "SHP-01".to_string(),
            name: "Shampoo".to_string(),
            cost_price: 12_000,
            sale_price: 20_000,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.cost().rupiah(), 12_000);
        assert_eq!(product.price().rupiah(), 20_000);
    }
}
