//! Product catalog and stock handlers.
//!
//! Kasir accounts can read the catalog and stock levels; mutations are
//! admin only. Stock adjustments go through the locked path in the stock
//! repository and land in the movement ledger.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{AdminSession, KasirSession};
use crate::state::AppState;
use pangkas_core::validation::{validate_amount, validate_name, validate_uuid};
use pangkas_core::{Product, StockMovement};
use pangkas_db::repository::product::ProductInput;
use pangkas_db::repository::stock::StockWithProduct;

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub sku: String,
    pub name: String,
    pub cost_price: i64,
    pub sale_price: i64,
}

impl ProductBody {
    fn validate(&self) -> Result<ProductInput, ApiError> {
        let sku = self.sku.trim();
        if sku.is_empty() {
            return Err(ApiError::validation("sku is required"));
        }
        validate_name(&self.name)?;
        validate_amount(self.cost_price)?;
        validate_amount(self.sale_price)?;

        Ok(ProductInput {
            sku: sku.to_string(),
            name: self.name.trim().to_string(),
            cost_price: self.cost_price,
            sale_price: self.sale_price,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub all: bool,
}

pub async fn list(
    State(state): State<AppState>,
    _session: KasirSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list(params.all).await?;
    Ok(Json(products))
}

pub async fn get(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;
    Ok(Json(product))
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>, ApiError> {
    let input = body.validate()?;
    let product = state.db.products().create(&input).await?;
    Ok(Json(product))
}

pub async fn update(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>, ApiError> {
    let input = body.validate()?;
    state.db.products().update(&id, &input).await?;
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;
    Ok(Json(product))
}

pub async fn deactivate(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.products().deactivate(&id).await?;
    Ok(Json(serde_json::json!({ "deactivated": id })))
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AdjustStockBody {
    pub store_id: String,
    pub delta: i64,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdjustStockResponse {
    pub product_id: String,
    pub store_id: String,
    pub quantity: i64,
}

/// Lists stock on hand at one store.
pub async fn stock_for_store(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<StockWithProduct>>, ApiError> {
    let rows = state.db.stocks().list_for_store(&store_id).await?;
    Ok(Json(rows))
}

/// Applies an administrative stock adjustment (restock or correction).
pub async fn adjust_stock(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<AdjustStockBody>,
) -> Result<Json<AdjustStockResponse>, ApiError> {
    validate_uuid("store_id", &body.store_id)?;
    if body.delta == 0 {
        return Err(ApiError::validation("delta must not be zero"));
    }

    let quantity = state
        .db
        .stocks()
        .adjust(&body.store_id, &id, body.delta, body.note.as_deref())
        .await?;

    Ok(Json(AdjustStockResponse {
        product_id: id,
        store_id: body.store_id,
        quantity,
    }))
}

/// Movement ledger for one product at one store.
pub async fn movements(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, store_id)): Path<(String, String)>,
) -> Result<Json<Vec<StockMovement>>, ApiError> {
    let rows = state.db.stocks().movements(&store_id, &id, 50).await?;
    Ok(Json(rows))
}
