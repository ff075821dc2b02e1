//! HTTP layer - the invoice REST API and static front-end hosting.
//!
//! All invoice routes live under `/api/invoice`. Anything else is handed to the
//! static asset directory when one is configured.

/// Core error to HTTP response mapping
pub mod error;
/// Invoice route handlers
pub mod handlers;

use crate::config::settings::{InvoiceRules, Settings};
use axum::{Router, http::StatusCode, routing::get};
use sea_orm::DatabaseConnection;
use std::{path::Path, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use error::ApiError;

/// Shared data available to all handlers.
/// This structure holds the database connection and the invoice rules.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations, shared across requests
    pub database: Arc<DatabaseConnection>,
    /// Business rules applied on write
    pub rules: InvoiceRules,
}

impl AppState {
    /// Creates a new `AppState` from a connection and the loaded settings.
    #[must_use]
    pub const fn new(database: Arc<DatabaseConnection>, settings: &Settings) -> Self {
        Self {
            database,
            rules: settings.invoices,
        }
    }
}

/// Builds the application router.
///
/// `static_dir` serves the built front end for every non-API path.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let invoices = Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route(
            "/{id}",
            get(handlers::get_invoice)
                .put(handlers::update_invoice)
                .delete(handlers::delete_invoice),
        );

    let app = Router::new().nest("/api/invoice", invoices);

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.fallback(static_unavailable),
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn static_unavailable() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Static assets not available")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_state_clones_share_one_connection() {
        let db = Arc::new(setup_test_db().await.unwrap());
        let state = AppState::new(Arc::clone(&db), &Settings::default());

        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.database, &cloned.database));
        assert!(Arc::ptr_eq(&state.database, &db));
        let limit = state.rules.max_total_amount;
        assert!((cloned.rules.max_total_amount - limit).abs() < f64::EPSILON);
    }
}
