//! Unified error types and result handling.
//!
//! Every core operation returns [`Result`]. The API layer decides which HTTP status
//! each variant maps to, so nothing here knows about HTTP.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// A request payload field is missing or malformed
    #[error("{message}")]
    Validation {
        /// Human-readable message returned to the caller verbatim
        message: String,
    },

    /// The invoice total is above the configured ceiling (create only)
    #[error("Total amount cannot exceed ${limit}")]
    AmountLimitExceeded {
        /// The configured ceiling
        limit: f64,
    },

    /// A route id did not parse as a positive integer
    #[error("Invalid invoice ID")]
    InvalidInvoiceId {
        /// The raw path segment
        raw: String,
    },

    /// No invoice exists with the given id
    #[error("Invoice not found")]
    InvoiceNotFound {
        /// The id that was looked up
        id: i32,
    },

    /// Settings could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Store failure from the ORM or driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the caller is at fault (bad input) rather than the store.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::AmountLimitExceeded { .. }
                | Self::InvalidInvoiceId { .. }
                | Self::InvoiceNotFound { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
