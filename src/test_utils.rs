//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test invoices with sensible defaults.

use crate::{
    api::{self, AppState},
    config::settings::{InvoiceRules, Settings},
    core::invoice,
    errors::Result,
    models::InvoiceWithLineItems,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a valid invoice payload with one line item carrying the whole total.
///
/// # Defaults
/// * `date`: `2025-01-15T10:00:00Z`
/// * line item: `"Test item"`, quantity 3, amount = `total_amount`
pub fn invoice_payload(customer_details: &str, total_amount: f64) -> Value {
    json!({
        "customerDetails": customer_details,
        "date": "2025-01-15T10:00:00Z",
        "totalAmount": total_amount,
        "lineItems": [
            { "description": "Test item", "quantity": 3, "amount": total_amount }
        ]
    })
}

/// Creates a test invoice with a total of 300 and a single line item.
pub async fn create_test_invoice(
    db: &DatabaseConnection,
    customer_details: &str,
) -> Result<InvoiceWithLineItems> {
    invoice::create_invoice(
        db,
        &invoice_payload(customer_details, 300.0),
        &InvoiceRules::default(),
    )
    .await
}

/// Sets up an API router over a fresh in-memory database.
/// Returns (db, router) so tests can seed data directly and call the API.
pub async fn setup_test_router() -> Result<(Arc<DatabaseConnection>, axum::Router)> {
    let db = Arc::new(setup_test_db().await?);
    let state = AppState::new(Arc::clone(&db), &Settings::default());
    Ok((db, api::router(state, None)))
}
