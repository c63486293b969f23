//! Transaction (sale) handlers.
//!
//! Creation validates the request up front and then hands a `NewSale` to
//! the transaction repository, which owns the locking discipline. A
//! validation failure writes nothing; a repository failure rolls the
//! whole sale back.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::middleware::KasirSession;
use crate::state::AppState;
use crate::upload::{save_image, MAX_PAYMENT_PROOF_BYTES};
use pangkas_core::cart::{ProductLine, ServiceLine};
use pangkas_core::validation::{validate_amount, validate_line_count, validate_quantity, validate_uuid};
use pangkas_core::{PaymentMethod, Role, TransactionKind};
use pangkas_db::repository::transaction::{
    NewSale, SaleOutcome, TransactionDetail, TransactionFilter, TransactionSummary,
};

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductLineBody {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_override: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceLineBody {
    pub pricelist_id: String,
    pub capster_id: String,
    pub price_override: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub store_id: String,
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    pub amount_paid: i64,
    #[serde(default)]
    pub products: Vec<ProductLineBody>,
    #[serde(default)]
    pub services: Vec<ServiceLineBody>,
}

impl CreateTransactionRequest {
    /// All-or-nothing request validation; nothing touches the database
    /// until this passes.
    fn validate(&self) -> Result<(), ApiError> {
        validate_uuid("store_id", &self.store_id)?;
        validate_amount(self.amount_paid)?;

        if self.products.is_empty() && self.services.is_empty() {
            return Err(ApiError::validation(
                "Transaction must contain at least one line item",
            ));
        }
        validate_line_count(self.products.len() + self.services.len())?;

        for line in &self.products {
            validate_uuid("product_id", &line.product_id)?;
            validate_quantity(line.quantity)?;
            if let Some(price) = line.unit_price_override {
                validate_amount(price)?;
            }
        }

        for line in &self.services {
            validate_uuid("pricelist_id", &line.pricelist_id)?;
            validate_uuid("capster_id", &line.capster_id)?;
            if let Some(price) = line.price_override {
                validate_amount(price)?;
            }
        }

        Ok(())
    }

    fn into_new_sale(self, user_id: String) -> NewSale {
        NewSale {
            store_id: self.store_id,
            user_id,
            kind: self.kind,
            payment_method: self.payment_method,
            amount_paid: self.amount_paid,
            products: self
                .products
                .into_iter()
                .map(|l| ProductLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price_override: l.unit_price_override,
                })
                .collect(),
            services: self
                .services
                .into_iter()
                .map(|l| ServiceLine {
                    pricelist_id: l.pricelist_id,
                    capster_id: l.capster_id,
                    price_override: l.price_override,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub store_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub page: i64,
    pub limit: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Creates a sale. The cashier comes from the session, never the body.
pub async fn create(
    State(state): State<AppState>,
    session: KasirSession,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<Json<SaleOutcome>, ApiError> {
    req.validate()?;

    let sale = req.into_new_sale(session.0.user_id.clone());
    let outcome = state.db.transactions().create(sale).await?;

    info!(
        transaction_id = %outcome.transaction.id,
        receipt_number = %outcome.receipt.receipt_number,
        subtotal = outcome.transaction.subtotal,
        cashier = %session.0.username,
        "Sale created"
    );

    Ok(Json(outcome))
}

pub async fn list(
    State(state): State<AppState>,
    _session: KasirSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TransactionSummary>>, ApiError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.page.max(0) * limit;

    let filter = TransactionFilter {
        store_id: params.store_id,
        from: params.from,
        to: params.to,
        kind: params.kind,
        limit,
        offset,
    };

    let rows = state.db.transactions().list(&filter).await?;
    Ok(Json(rows))
}

/// A capster's own transactions (sales containing their service lines).
pub async fn my_transactions(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<TransactionSummary>>, ApiError> {
    if session.role != Role::Capster {
        return Err(ApiError::forbidden());
    }
    let staff_id = session
        .staff_id
        .as_deref()
        .ok_or_else(|| ApiError::forbidden())?;

    let rows = state.db.transactions().list_for_capster(staff_id, 50).await?;
    Ok(Json(rows))
}

pub async fn detail(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(id): Path<String>,
) -> Result<Json<TransactionDetail>, ApiError> {
    let detail = state
        .db
        .transactions()
        .detail(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &id))?;
    Ok(Json(detail))
}

/// Attaches a payment-proof image (transfer/QRIS receipts).
pub async fn upload_payment_proof(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Reject uploads against unknown transactions before writing to disk.
    state
        .db
        .transactions()
        .detail(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &id))?;

    let path = save_image(
        &mut multipart,
        &state.config.upload_dir,
        "bukti-pembayaran",
        MAX_PAYMENT_PROOF_BYTES,
    )
    .await?;

    state.db.transactions().set_payment_proof(&id, &path).await?;

    Ok(Json(serde_json::json!({ "payment_proof": path })))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            store_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            kind: TransactionKind::Product,
            payment_method: PaymentMethod::Cash,
            amount_paid: 40_000,
            products: vec![ProductLineBody {
                product_id: "550e8400-e29b-41d4-a716-446655440001".to_string(),
                quantity: 2,
                unit_price_override: None,
            }],
            services: vec![],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut req = base_request();
        req.products.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut req = base_request();
        req.products[0].quantity = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_amount_paid_rejected() {
        let mut req = base_request();
        req.amount_paid = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_bad_store_id_rejected() {
        let mut req = base_request();
        req.store_id = "store-2".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_override_rejected() {
        let mut req = base_request();
        req.products[0].unit_price_override = Some(-100);
        assert!(req.validate().is_err());
    }
}
