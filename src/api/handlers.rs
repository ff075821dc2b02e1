//! Invoice route handlers.
//!
//! Each handler parses the route id and body, calls into [`crate::core::invoice`],
//! and shapes the JSON response. Validation lives in core.

use super::{AppState, error::ApiError};
use crate::{
    core::{
        invoice,
        validation::{MISSING_FIELDS, parse_invoice_id},
    },
    errors::{Error, Result},
    models::{DeleteConfirmation, InvoiceWithLineItems},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;

const LIST_FAILED: &str = "Failed to fetch invoices";
const GET_FAILED: &str = "Failed to fetch invoice";
const CREATE_FAILED: &str = "Failed to create invoice";
const UPDATE_FAILED: &str = "Failed to update invoice";
const DELETE_FAILED: &str = "Failed to delete invoice";

/// `GET /api/invoice`
pub async fn list_invoices(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<InvoiceWithLineItems>>, ApiError> {
    invoice::list_invoices(&state.database)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, LIST_FAILED))
}

/// `GET /api/invoice/{id}` - answers `null` when the invoice does not exist.
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<Option<InvoiceWithLineItems>>, ApiError> {
    let invoice_id = parse_invoice_id(&id).map_err(|e| ApiError::from_core(e, GET_FAILED))?;

    invoice::get_invoice(&state.database, invoice_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, GET_FAILED))
}

/// `POST /api/invoice`
pub async fn create_invoice(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<(StatusCode, Json<InvoiceWithLineItems>), ApiError> {
    let payload = parse_body(&body).map_err(|e| ApiError::from_core(e, CREATE_FAILED))?;

    invoice::create_invoice(&state.database, &payload, &state.rules)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(|e| ApiError::from_core(e, CREATE_FAILED))
}

/// `PUT /api/invoice/{id}`
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> std::result::Result<Json<InvoiceWithLineItems>, ApiError> {
    let invoice_id = parse_invoice_id(&id).map_err(|e| ApiError::from_core(e, UPDATE_FAILED))?;
    let payload = parse_body(&body).map_err(|e| ApiError::from_core(e, UPDATE_FAILED))?;

    invoice::update_invoice(&state.database, invoice_id, &payload)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, UPDATE_FAILED))
}

/// `DELETE /api/invoice/{id}`
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<DeleteConfirmation>, ApiError> {
    let invoice_id = parse_invoice_id(&id).map_err(|e| ApiError::from_core(e, DELETE_FAILED))?;

    invoice::delete_invoice(&state.database, invoice_id)
        .await
        .map_err(|e| ApiError::from_core(e, DELETE_FAILED))?;

    Ok(Json(DeleteConfirmation {
        message: "Invoice deleted successfully".to_string(),
    }))
}

/// Content type is not checked; an unreadable body counts as missing fields.
fn parse_body(body: &Bytes) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Unparseable request body: {e}");
        Error::validation(MISSING_FIELDS)
    })
}
