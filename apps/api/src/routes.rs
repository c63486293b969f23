//! # Router
//!
//! Route table for the whole API. Three zones:
//!
//! - public: health, login, receipt HTML, uploaded images
//! - authenticated: everything else, behind the `authenticate` layer;
//!   per-route roles are enforced by the typed session extractors in
//!   `middleware.rs`
//!
//! Upload routes raise the body limit above axum's 2 MB default to match
//! the per-upload-type ceilings.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::middleware::authenticate;
use crate::state::AppState;
use crate::upload::{MAX_PAYMENT_PROOF_BYTES, MAX_PROOF_BYTES};

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/login", post(handlers::auth::login))
        .route("/struk/print/{id}", get(handlers::struk::print))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir));

    let protected = Router::new()
        // Session
        .route("/auth/me", get(handlers::auth::me))
        // Products & stock
        .route(
            "/produk",
            get(handlers::produk::list).post(handlers::produk::create),
        )
        .route(
            "/produk/{id}",
            get(handlers::produk::get)
                .put(handlers::produk::update)
                .delete(handlers::produk::deactivate),
        )
        .route("/produk/{id}/stok", post(handlers::produk::adjust_stock))
        .route(
            "/produk/{id}/mutasi/{store_id}",
            get(handlers::produk::movements),
        )
        .route(
            "/produk/stok/{store_id}",
            get(handlers::produk::stock_for_store),
        )
        // Stores
        .route(
            "/store",
            get(handlers::store::list).post(handlers::store::create),
        )
        .route(
            "/store/{id}",
            get(handlers::store::get)
                .put(handlers::store::update)
                .delete(handlers::store::deactivate),
        )
        // Staff
        .route(
            "/capster",
            get(handlers::staff::list_capster).post(handlers::staff::create_capster),
        )
        .route(
            "/capster/{id}",
            get(handlers::staff::get_capster)
                .put(handlers::staff::update_capster)
                .delete(handlers::staff::deactivate_capster),
        )
        .route(
            "/kasir",
            get(handlers::staff::list_kasir).post(handlers::staff::create_kasir),
        )
        .route(
            "/kasir/{id}",
            get(handlers::staff::get_kasir)
                .put(handlers::staff::update_kasir)
                .delete(handlers::staff::deactivate_kasir),
        )
        // Pricelist
        .route(
            "/pricelist",
            get(handlers::pricelist::list).post(handlers::pricelist::create),
        )
        .route(
            "/pricelist/{id}",
            get(handlers::pricelist::get)
                .put(handlers::pricelist::update)
                .delete(handlers::pricelist::deactivate),
        )
        // Commission settings
        .route("/komisi", get(handlers::komisi::list))
        .route(
            "/komisi/{staff_id}",
            get(handlers::komisi::get)
                .put(handlers::komisi::upsert)
                .delete(handlers::komisi::delete),
        )
        // Users
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/users/{id}",
            put(handlers::users::update).delete(handlers::users::deactivate),
        )
        .route("/users/{id}/password", put(handlers::users::set_password))
        // Transactions
        .route(
            "/transaksi",
            get(handlers::transaksi::list).post(handlers::transaksi::create),
        )
        .route("/transaksi/saya", get(handlers::transaksi::my_transactions))
        .route("/transaksi/{id}", get(handlers::transaksi::detail))
        .route(
            "/transaksi/{id}/bukti",
            post(handlers::transaksi::upload_payment_proof)
                .layer(DefaultBodyLimit::max(MAX_PAYMENT_PROOF_BYTES + 1024)),
        )
        // Payroll: salary + bonuses
        .route(
            "/gaji/bonus",
            get(handlers::gaji::list_bonuses).post(handlers::gaji::create_bonus),
        )
        .route("/gaji/bonus/{id}", delete(handlers::gaji::delete_bonus))
        .route(
            "/gaji/{staff_id}",
            get(handlers::gaji::get_salary).put(handlers::gaji::set_salary),
        )
        // Cash advances
        .route(
            "/kasbon",
            get(handlers::kasbon::list).post(handlers::kasbon::create),
        )
        .route("/kasbon/{id}", get(handlers::kasbon::get))
        .route("/kasbon/{id}/lunas", put(handlers::kasbon::settle))
        // Deductions
        .route(
            "/potongan",
            get(handlers::potongan::list).post(handlers::potongan::create),
        )
        .route("/potongan/{id}", delete(handlers::potongan::delete))
        // Expenses
        .route(
            "/pengeluaran",
            get(handlers::pengeluaran::list).post(handlers::pengeluaran::create),
        )
        .route("/pengeluaran/{id}", delete(handlers::pengeluaran::delete))
        .route(
            "/pengeluaran/{id}/bukti",
            post(handlers::pengeluaran::upload_proof)
                .layer(DefaultBodyLimit::max(MAX_PROOF_BYTES + 1024)),
        )
        // Shop profile
        .route(
            "/profil",
            get(handlers::profil::get).put(handlers::profil::update),
        )
        .route(
            "/profil/logo",
            post(handlers::profil::upload_logo)
                .layer(DefaultBodyLimit::max(MAX_PAYMENT_PROOF_BYTES + 1024)),
        )
        // Reports
        .route("/laporan/penjualan", get(handlers::laporan::sales_summary))
        .route("/laporan/komisi", get(handlers::laporan::commission_report))
        .route("/laporan/gaji", get(handlers::laporan::payroll_summary))
        .route(
            "/laporan/pengeluaran",
            get(handlers::laporan::expense_total),
        )
        .layer(from_fn_with_state(state.clone(), authenticate));

    // The SPA is served from a different origin in every deployment.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
