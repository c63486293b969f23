//! # Expense Repository
//!
//! Operating expenses (pengeluaran) per store, with an optional proof
//! image attached after creation.

use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::Expense;

#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub store_id: String,
    pub description: String,
    pub amount: i64,
    pub spent_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: MySqlPool,
}

impl ExpenseRepository {
    pub fn new(pool: MySqlPool) -> Self {
        ExpenseRepository { pool }
    }

    pub async fn create(&self, input: &ExpenseInput) -> DbResult<Expense> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            store_id: input.store_id.clone(),
            description: input.description.clone(),
            amount: input.amount,
            spent_on: input.spent_on,
            proof_path: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO expenses (id, store_id, description, amount, spent_on,
                                  proof_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.store_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.spent_on)
        .bind(&expense.proof_path)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            "SELECT id, store_id, description, amount, spent_on, proof_path, created_at \
             FROM expenses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn list(
        &self,
        store_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, store_id, description, amount, spent_on, proof_path, created_at
            FROM expenses
            WHERE (? IS NULL OR store_id = ?)
              AND (? IS NULL OR spent_on >= ?)
              AND (? IS NULL OR spent_on <= ?)
            ORDER BY spent_on DESC, created_at DESC
            "#,
        )
        .bind(store_id)
        .bind(store_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn set_proof(&self, id: &str, path: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE expenses SET proof_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }
}
