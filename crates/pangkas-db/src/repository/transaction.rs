//! # Transaction Repository
//!
//! The sale-creation path and its read side. This is the one multi-step
//! transactional operation in the system.
//!
//! ## Sale Creation
//! ```text
//! BEGIN
//!   1. load the store (receipt prefix comes from its 2-digit code)
//!   2. bump the per-store-per-day receipt counter atomically
//!        INSERT .. ON DUPLICATE KEY UPDATE last_seq = LAST_INSERT_ID(last_seq + 1)
//!      The upsert takes the counter row lock, so two concurrent sales at
//!      one store serialize here and can never share a sequence number.
//!   3. merge duplicate product lines (same product id)
//!   4. per product line: SELECT .. FOR UPDATE on the stock row;
//!      insufficient quantity aborts the whole sale
//!   5. per service line: snapshot the capster's commission percentage,
//!      commission = price * pct / 100
//!   6. insert header + receipt, batch-insert both line tables,
//!      decrement each stock row, write a stock_movements audit row
//! COMMIT          any error before this point rolls everything back
//! ```

use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::{MySqlPool, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::cart::{
    commission_amount, merge_product_lines, product_line_totals, ProductLine, ServiceLine,
};
use pangkas_core::receipt::format_receipt_number;
use pangkas_core::{
    Money, PaymentMethod, PricelistItem, Product, Receipt, Staff, Store, Transaction,
    TransactionKind, TransactionProduct, TransactionService,
};

/// Stock-movement reason written for every sale decrement.
const MOVEMENT_REASON_SALE: &str = "sale";

// =============================================================================
// Inputs & outputs
// =============================================================================

/// A validated sale request, ready for the database transaction.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub store_id: String,
    pub user_id: String,
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    pub amount_paid: i64,
    pub products: Vec<ProductLine>,
    pub services: Vec<ServiceLine>,
}

/// Everything written by a successful sale.
#[derive(Debug, Clone, Serialize)]
pub struct SaleOutcome {
    pub transaction: Transaction,
    pub receipt: Receipt,
    pub products: Vec<TransactionProduct>,
    pub services: Vec<TransactionService>,
}

/// Listing filters for the back office.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub store_id: Option<String>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub limit: i64,
    pub offset: i64,
}

/// One row of the transaction listing (header joined with receipt,
/// store and cashier names).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TransactionSummary {
    pub id: String,
    pub receipt_number: String,
    pub store_id: String,
    pub store_name: String,
    pub cashier_name: String,
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    pub subtotal: i64,
    pub amount_paid: i64,
    pub change_due: i64,
    pub created_at: chrono::DateTime<Utc>,
}

/// A full transaction with both line tables, for detail views and receipts.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub receipt: Receipt,
    pub products: Vec<TransactionProduct>,
    pub services: Vec<TransactionService>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: MySqlPool,
}

impl TransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        TransactionRepository { pool }
    }

    /// Creates a sale. All-or-nothing: any failure rolls back every row
    /// and every stock decrement.
    pub async fn create(&self, input: NewSale) -> DbResult<SaleOutcome> {
        debug!(store_id = %input.store_id, user_id = %input.user_id, "Creating sale");

        let mut tx = self.pool.begin().await?;

        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, code, name, address, phone, is_active, created_at, updated_at
            FROM stores
            WHERE id = ? AND is_active = TRUE
            "#,
        )
        .bind(&input.store_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Store", &input.store_id))?;

        let now = Utc::now();
        let today = now.date_naive();

        // Atomic daily sequence. LAST_INSERT_ID(expr) stores expr in the
        // session so the follow-up SELECT reads the bumped value on both
        // the fresh-insert and the update path.
        sqlx::query(
            r#"
            INSERT INTO receipt_counters (store_id, counter_date, last_seq)
            VALUES (?, ?, LAST_INSERT_ID(1))
            ON DUPLICATE KEY UPDATE last_seq = LAST_INSERT_ID(last_seq + 1)
            "#,
        )
        .bind(&input.store_id)
        .bind(today)
        .execute(&mut *tx)
        .await?;

        let seq: u64 = sqlx::query_scalar("SELECT LAST_INSERT_ID()")
            .fetch_one(&mut *tx)
            .await?;

        let receipt_number = format_receipt_number(&store.code, today, seq as u32);

        let transaction_id = Uuid::new_v4().to_string();
        let mut subtotal = Money::zero();

        // Product lines: lock, check, snapshot.
        let merged = merge_product_lines(&input.products);
        let mut product_rows: Vec<TransactionProduct> = Vec::with_capacity(merged.len());

        for line in &merged {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, sku, name, cost_price, sale_price, is_active, created_at, updated_at
                FROM products
                WHERE id = ? AND is_active = TRUE
                "#,
            )
            .bind(&line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &line.product_id))?;

            // Row lock held until commit or rollback. A missing stock row
            // counts as zero on hand.
            let available: Option<i64> = sqlx::query_scalar(
                "SELECT quantity FROM stocks WHERE store_id = ? AND product_id = ? FOR UPDATE",
            )
            .bind(&input.store_id)
            .bind(&line.product_id)
            .fetch_optional(&mut *tx)
            .await?;
            let available = available.unwrap_or(0);

            if available < line.quantity {
                return Err(DbError::InsufficientStock {
                    sku: product.sku,
                    available,
                    requested: line.quantity,
                });
            }

            let unit_price =
                Money::from_rupiah(line.unit_price_override.unwrap_or(product.sale_price));
            let totals = product_line_totals(unit_price, product.cost(), line.quantity);
            subtotal += totals.revenue;

            product_rows.push(TransactionProduct {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction_id.clone(),
                product_id: product.id,
                name_snapshot: product.name,
                quantity: line.quantity,
                unit_cost: product.cost_price,
                unit_price: unit_price.rupiah(),
                line_cost: totals.cost.rupiah(),
                line_total: totals.revenue.rupiah(),
                profit: totals.profit.rupiah(),
                created_at: now,
            });
        }

        // Service lines: snapshot price and commission percentage.
        let mut service_rows: Vec<TransactionService> = Vec::with_capacity(input.services.len());

        for line in &input.services {
            let item = sqlx::query_as::<_, PricelistItem>(
                r#"
                SELECT id, code, name, price, duration_minutes, is_active, created_at, updated_at
                FROM pricelist
                WHERE id = ? AND is_active = TRUE
                "#,
            )
            .bind(&line.pricelist_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Pricelist item", &line.pricelist_id))?;

            let capster = sqlx::query_as::<_, Staff>(
                r#"
                SELECT id, kind, name, phone, address, store_id, joined_on, is_active,
                       created_at, updated_at
                FROM staff
                WHERE id = ? AND is_active = TRUE
                "#,
            )
            .bind(&line.capster_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Capster", &line.capster_id))?;

            // A capster without a commission-settings row earns 0%.
            let pct: Option<i64> =
                sqlx::query_scalar("SELECT percentage FROM commission_settings WHERE staff_id = ?")
                    .bind(&capster.id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let pct = pct.unwrap_or(0);

            let price = Money::from_rupiah(line.price_override.unwrap_or(item.price));
            let commission = commission_amount(price, pct);
            subtotal += price;

            service_rows.push(TransactionService {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction_id.clone(),
                pricelist_id: item.id,
                name_snapshot: item.name,
                price: price.rupiah(),
                capster_id: capster.id,
                commission_pct: pct,
                commission_amount: commission.rupiah(),
                created_at: now,
            });
        }

        let change_due = (input.amount_paid - subtotal.rupiah()).max(0);

        let transaction = Transaction {
            id: transaction_id.clone(),
            store_id: input.store_id.clone(),
            user_id: input.user_id.clone(),
            kind: input.kind,
            payment_method: input.payment_method,
            subtotal: subtotal.rupiah(),
            amount_paid: input.amount_paid,
            change_due,
            payment_proof: None,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, store_id, user_id, kind, payment_method,
                subtotal, amount_paid, change_due, payment_proof, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.store_id)
        .bind(&transaction.user_id)
        .bind(transaction.kind)
        .bind(transaction.payment_method)
        .bind(transaction.subtotal)
        .bind(transaction.amount_paid)
        .bind(transaction.change_due)
        .bind(&transaction.payment_proof)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            transaction_id: transaction_id.clone(),
            receipt_number,
            issued_at: now,
        };

        sqlx::query(
            "INSERT INTO receipts (id, transaction_id, receipt_number, issued_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&receipt.id)
        .bind(&receipt.transaction_id)
        .bind(&receipt.receipt_number)
        .bind(receipt.issued_at)
        .execute(&mut *tx)
        .await?;

        // Both line tables are written in one INSERT each.
        if !product_rows.is_empty() {
            let mut qb = QueryBuilder::<sqlx::MySql>::new(
                "INSERT INTO transaction_products (id, transaction_id, product_id, name_snapshot, \
                 quantity, unit_cost, unit_price, line_cost, line_total, profit, created_at) ",
            );
            qb.push_values(product_rows.iter(), |mut b, row| {
                b.push_bind(&row.id)
                    .push_bind(&row.transaction_id)
                    .push_bind(&row.product_id)
                    .push_bind(&row.name_snapshot)
                    .push_bind(row.quantity)
                    .push_bind(row.unit_cost)
                    .push_bind(row.unit_price)
                    .push_bind(row.line_cost)
                    .push_bind(row.line_total)
                    .push_bind(row.profit)
                    .push_bind(row.created_at);
            });
            qb.build().execute(&mut *tx).await?;

            // Decrement the locked stock rows and leave the audit trail.
            for row in &product_rows {
                sqlx::query(
                    "UPDATE stocks SET quantity = quantity - ?, updated_at = ? \
                     WHERE store_id = ? AND product_id = ?",
                )
                .bind(row.quantity)
                .bind(now)
                .bind(&input.store_id)
                .bind(&row.product_id)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    "INSERT INTO stock_movements (id, store_id, product_id, delta, reason, \
                     reference_id, note, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&input.store_id)
                .bind(&row.product_id)
                .bind(-row.quantity)
                .bind(MOVEMENT_REASON_SALE)
                .bind(&transaction_id)
                .bind(Option::<String>::None)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        if !service_rows.is_empty() {
            let mut qb = QueryBuilder::<sqlx::MySql>::new(
                "INSERT INTO transaction_services (id, transaction_id, pricelist_id, \
                 name_snapshot, price, capster_id, commission_pct, commission_amount, created_at) ",
            );
            qb.push_values(service_rows.iter(), |mut b, row| {
                b.push_bind(&row.id)
                    .push_bind(&row.transaction_id)
                    .push_bind(&row.pricelist_id)
                    .push_bind(&row.name_snapshot)
                    .push_bind(row.price)
                    .push_bind(&row.capster_id)
                    .push_bind(row.commission_pct)
                    .push_bind(row.commission_amount)
                    .push_bind(row.created_at);
            });
            qb.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        debug!(
            transaction_id = %transaction.id,
            receipt_number = %receipt.receipt_number,
            subtotal = transaction.subtotal,
            "Sale committed"
        );

        Ok(SaleOutcome {
            transaction,
            receipt,
            products: product_rows,
            services: service_rows,
        })
    }

    /// Lists transactions for the back office, newest first.
    pub async fn list(&self, filter: &TransactionFilter) -> DbResult<Vec<TransactionSummary>> {
        let mut qb = QueryBuilder::<sqlx::MySql>::new(
            r#"
            SELECT t.id, r.receipt_number, t.store_id, s.name AS store_name,
                   u.name AS cashier_name, t.kind, t.payment_method,
                   t.subtotal, t.amount_paid, t.change_due, t.created_at
            FROM transactions t
            JOIN receipts r ON r.transaction_id = t.id
            JOIN stores s ON s.id = t.store_id
            JOIN users u ON u.id = t.user_id
            WHERE 1 = 1
            "#,
        );

        if let Some(store_id) = &filter.store_id {
            qb.push(" AND t.store_id = ").push_bind(store_id);
        }
        if let Some(kind) = filter.kind {
            qb.push(" AND t.kind = ").push_bind(kind);
        }
        if let Some(from) = filter.from {
            qb.push(" AND t.created_at >= ")
                .push_bind(NaiveDateTime::new(from, NaiveTime::MIN));
        }
        if let Some(to) = filter.to {
            // End date is inclusive: compare against the next midnight.
            let end = to.succ_opt().unwrap_or(to);
            qb.push(" AND t.created_at < ")
                .push_bind(NaiveDateTime::new(end, NaiveTime::MIN));
        }

        let limit = if filter.limit <= 0 { 50 } else { filter.limit };
        qb.push(" ORDER BY t.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(filter.offset.max(0));

        let rows = qb
            .build_query_as::<TransactionSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Lists transactions containing service lines assigned to a capster.
    pub async fn list_for_capster(
        &self,
        capster_id: &str,
        limit: i64,
    ) -> DbResult<Vec<TransactionSummary>> {
        let limit = if limit <= 0 { 50 } else { limit };

        let rows = sqlx::query_as::<_, TransactionSummary>(
            r#"
            SELECT DISTINCT t.id, r.receipt_number, t.store_id, s.name AS store_name,
                   u.name AS cashier_name, t.kind, t.payment_method,
                   t.subtotal, t.amount_paid, t.change_due, t.created_at
            FROM transactions t
            JOIN receipts r ON r.transaction_id = t.id
            JOIN stores s ON s.id = t.store_id
            JOIN users u ON u.id = t.user_id
            JOIN transaction_services ts ON ts.transaction_id = t.id
            WHERE ts.capster_id = ?
            ORDER BY t.created_at DESC
            LIMIT ?
            "#,
        )
        .bind(capster_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetches a transaction with its receipt and both line tables.
    pub async fn detail(&self, id: &str) -> DbResult<Option<TransactionDetail>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, store_id, user_id, kind, payment_method, subtotal,
                   amount_paid, change_due, payment_proof, created_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let transaction = match transaction {
            Some(t) => t,
            None => return Ok(None),
        };

        let receipt = sqlx::query_as::<_, Receipt>(
            "SELECT id, transaction_id, receipt_number, issued_at FROM receipts \
             WHERE transaction_id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let products = sqlx::query_as::<_, TransactionProduct>(
            r#"
            SELECT id, transaction_id, product_id, name_snapshot, quantity,
                   unit_cost, unit_price, line_cost, line_total, profit, created_at
            FROM transaction_products
            WHERE transaction_id = ?
            ORDER BY name_snapshot
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let services = sqlx::query_as::<_, TransactionService>(
            r#"
            SELECT id, transaction_id, pricelist_id, name_snapshot, price,
                   capster_id, commission_pct, commission_amount, created_at
            FROM transaction_services
            WHERE transaction_id = ?
            ORDER BY name_snapshot
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TransactionDetail {
            transaction,
            receipt,
            products,
            services,
        }))
    }

    /// Attaches a payment-proof image path to a transaction.
    ///
    /// The only mutation a committed transaction allows.
    pub async fn set_payment_proof(&self, id: &str, path: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE transactions SET payment_proof = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }
}
