//! Wire shapes shared by the HTTP API and the client.

use crate::entities::{InvoiceModel, LineItemModel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An invoice with its line items eagerly loaded.
///
/// Serializes as the invoice's own fields plus a `lineItems` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWithLineItems {
    /// The invoice row
    #[serde(flatten)]
    pub invoice: InvoiceModel,
    /// Its line items, ordered by id
    pub line_items: Vec<LineItemModel>,
}

impl InvoiceWithLineItems {
    /// Store id of the invoice
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.invoice.id
    }

    /// Sum of the line-item amounts (not the stored total).
    #[must_use]
    pub fn line_items_total(&self) -> Decimal {
        self.line_items.iter().map(|item| item.amount).sum()
    }
}

/// Body of a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// Confirmation text
    pub message: String,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}
