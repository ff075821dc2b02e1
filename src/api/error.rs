//! Maps core errors to HTTP responses.
//!
//! Client errors carry their own message. Store failures are logged here and the
//! caller only sees the operation's generic failure text.

use crate::{errors::Error, models::ErrorBody};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// An error ready to be sent as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Classifies `error`; `failure` is the message used for server-side errors.
    pub fn from_core(error: Error, failure: &str) -> Self {
        let status = match &error {
            Error::InvoiceNotFound { .. } => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{failure}: {error}");
            return Self {
                status,
                message: failure.to_string(),
            };
        }

        tracing::debug!(%status, "Rejected request: {error}");
        Self {
            status,
            message: error.to_string(),
        }
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST),
            (
                Error::AmountLimitExceeded { limit: 1000.0 },
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::InvalidInvoiceId {
                    raw: "x".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (Error::InvoiceNotFound { id: 1 }, StatusCode::NOT_FOUND),
            (
                Error::Database(DbErr::Custom("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from_core(error, "Failed").status(), expected);
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let error = ApiError::from_core(
            Error::Database(DbErr::Custom("password=hunter2".to_string())),
            "Failed to create invoice",
        );
        assert_eq!(error.message, "Failed to create invoice");
    }
}
