//! Receipt (struk) rendering.
//!
//! `GET /struk/print/{id}` is unauthenticated: the till opens it in a new
//! window for printing, and customers may reopen it from a QR link. It
//! exposes nothing beyond what is printed on the paper receipt.

use axum::extract::{Path, State};
use axum::response::Html;
use std::fmt::Write as _;

use crate::error::ApiError;
use crate::state::AppState;
use pangkas_core::{Money, ShopProfile, Store};
use pangkas_db::repository::transaction::TransactionDetail;

pub async fn print(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let detail = state
        .db
        .transactions()
        .detail(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &id))?;

    let store = state
        .db
        .stores()
        .get_by_id(&detail.transaction.store_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", &detail.transaction.store_id))?;

    let profile = state.db.profile().get().await?;

    Ok(Html(render_receipt(&profile, &store, &detail)))
}

/// Renders the receipt as a small self-contained HTML page sized for a
/// 58mm thermal printer.
fn render_receipt(profile: &ShopProfile, store: &Store, detail: &TransactionDetail) -> String {
    let tx = &detail.transaction;
    let mut out = String::with_capacity(2048);

    out.push_str(
        "<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Struk</title>\n<style>\n\
         body { font-family: monospace; font-size: 12px; width: 58mm; margin: 0 auto; }\n\
         .center { text-align: center; }\n\
         .row { display: flex; justify-content: space-between; }\n\
         hr { border: none; border-top: 1px dashed #000; }\n\
         </style>\n</head>\n<body>\n",
    );

    // Header: shop profile + branch
    let _ = writeln!(out, "<div class=\"center\"><strong>{}</strong></div>", esc(&profile.name));
    let _ = writeln!(out, "<div class=\"center\">{}</div>", esc(&store.name));
    if let Some(address) = &store.address {
        let _ = writeln!(out, "<div class=\"center\">{}</div>", esc(address));
    }
    if let Some(phone) = &store.phone {
        let _ = writeln!(out, "<div class=\"center\">{}</div>", esc(phone));
    }
    out.push_str("<hr>\n");

    let _ = writeln!(
        out,
        "<div class=\"row\"><span>No</span><span>{}</span></div>",
        esc(&detail.receipt.receipt_number)
    );
    let _ = writeln!(
        out,
        "<div class=\"row\"><span>Tanggal</span><span>{}</span></div>",
        tx.created_at.format("%d-%m-%Y %H:%M")
    );
    out.push_str("<hr>\n");

    // Line items
    for line in &detail.services {
        let _ = writeln!(
            out,
            "<div class=\"row\"><span>{}</span><span>{}</span></div>",
            esc(&line.name_snapshot),
            Money::from_rupiah(line.price)
        );
    }
    for line in &detail.products {
        let _ = writeln!(
            out,
            "<div class=\"row\"><span>{} x{}</span><span>{}</span></div>",
            esc(&line.name_snapshot),
            line.quantity,
            Money::from_rupiah(line.line_total)
        );
    }
    out.push_str("<hr>\n");

    // Totals
    let _ = writeln!(
        out,
        "<div class=\"row\"><strong>Total</strong><strong>{}</strong></div>",
        Money::from_rupiah(tx.subtotal)
    );
    let _ = writeln!(
        out,
        "<div class=\"row\"><span>Bayar</span><span>{}</span></div>",
        Money::from_rupiah(tx.amount_paid)
    );
    let _ = writeln!(
        out,
        "<div class=\"row\"><span>Kembali</span><span>{}</span></div>",
        Money::from_rupiah(tx.change_due)
    );
    out.push_str("<hr>\n");

    if let Some(footer) = &profile.receipt_footer {
        let _ = writeln!(out, "<div class=\"center\">{}</div>", esc(footer));
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Minimal HTML escaping for text nodes.
fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pangkas_core::{
        PaymentMethod, Receipt, Transaction, TransactionKind, TransactionProduct,
        TransactionService,
    };

    fn sample_detail() -> (ShopProfile, Store, TransactionDetail) {
        let now = Utc::now();
        let profile = ShopProfile {
            id: 1,
            name: "Pangkas Barbershop".to_string(),
            address: None,
            phone: None,
            logo_path: None,
            receipt_footer: Some("Terima kasih <3".to_string()),
            updated_at: now,
        };
        let store = Store {
            id: "store-1".to_string(),
            code: "02".to_string(),
            name: "Cabang Pusat".to_string(),
            address: Some("Jl. Merdeka 1".to_string()),
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let detail = TransactionDetail {
            transaction: Transaction {
                id: "tx-1".to_string(),
                store_id: "store-1".to_string(),
                user_id: "user-1".to_string(),
                kind: TransactionKind::Mixed,
                payment_method: PaymentMethod::Cash,
                subtotal: 90_000,
                amount_paid: 100_000,
                change_due: 10_000,
                payment_proof: None,
                created_at: now,
            },
            receipt: Receipt {
                id: "rc-1".to_string(),
                transaction_id: "tx-1".to_string(),
                receipt_number: "02/260805/0001".to_string(),
                issued_at: now,
            },
            products: vec![TransactionProduct {
                id: "tp-1".to_string(),
                transaction_id: "tx-1".to_string(),
                product_id: "p-1".to_string(),
                name_snapshot: "Shampoo".to_string(),
                quantity: 2,
                unit_cost: 12_000,
                unit_price: 20_000,
                line_cost: 24_000,
                line_total: 40_000,
                profit: 16_000,
                created_at: now,
            }],
            services: vec![TransactionService {
                id: "ts-1".to_string(),
                transaction_id: "tx-1".to_string(),
                pricelist_id: "pl-1".to_string(),
                name_snapshot: "Cukur Dewasa".to_string(),
                price: 50_000,
                capster_id: "st-1".to_string(),
                commission_pct: 40,
                commission_amount: 20_000,
                created_at: now,
            }],
        };
        (profile, store, detail)
    }

    #[test]
    fn test_render_contains_lines_and_totals() {
        let (profile, store, detail) = sample_detail();
        let html = render_receipt(&profile, &store, &detail);

        assert!(html.contains("02/260805/0001"));
        assert!(html.contains("Shampoo x2"));
        assert!(html.contains("Rp40.000"));
        assert!(html.contains("Cukur Dewasa"));
        assert!(html.contains("Rp90.000"));
        assert!(html.contains("Rp10.000"));
    }

    #[test]
    fn test_render_escapes_user_content() {
        let (mut profile, store, detail) = sample_detail();
        profile.name = "Toko <script>alert(1)</script>".to_string();
        let html = render_receipt(&profile, &store, &detail);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        // The footer's literal "<3" must survive as an escape, not a tag.
        assert!(html.contains("Terima kasih &lt;3"));
    }
}
