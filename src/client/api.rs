//! HTTP client for `/api/invoice`.

use crate::models::{DeleteConfirmation, ErrorBody, InvoiceWithLineItems};
use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced to the user as notifications
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The server's `error` text
        message: String,
    },

    /// Cosmetic form check failed before any request was made
    #[error("{message}")]
    Form {
        /// What to fix
        message: String,
    },

    /// Formatting output for display failed
    #[error("Failed to render output: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Client-side `Result` type
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Body sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    /// Customer name/address block
    pub customer_details: String,
    /// RFC 3339 timestamp
    pub date: String,
    /// Sum of the line-item amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Line items, in form order
    pub line_items: Vec<LineItemPayload>,
}

/// One line item in an [`InvoicePayload`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemPayload {
    /// Optional description
    pub description: Option<String>,
    /// Units billed
    pub quantity: i32,
    /// Line amount
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// The five invoice operations as seen from the client.
pub trait InvoiceApi {
    /// All invoices with line items
    fn list(&self) -> impl Future<Output = ClientResult<Vec<InvoiceWithLineItems>>> + Send;
    /// One invoice, `None` when the server answers `null`
    fn get(
        &self,
        id: i32,
    ) -> impl Future<Output = ClientResult<Option<InvoiceWithLineItems>>> + Send;
    /// Creates an invoice
    fn create(
        &self,
        payload: &InvoicePayload,
    ) -> impl Future<Output = ClientResult<InvoiceWithLineItems>> + Send;
    /// Replaces an invoice
    fn update(
        &self,
        id: i32,
        payload: &InvoicePayload,
    ) -> impl Future<Output = ClientResult<InvoiceWithLineItems>> + Send;
    /// Deletes an invoice, returning the confirmation text
    fn delete(&self, id: i32) -> impl Future<Output = ClientResult<String>> + Send;
}

/// [`InvoiceApi`] over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpInvoiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInvoiceClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, id: Option<i32>) -> String {
        match id {
            Some(id) => format!("{}/api/invoice/{id}", self.base_url),
            None => format!("{}/api/invoice", self.base_url),
        }
    }
}

impl InvoiceApi for HttpInvoiceClient {
    async fn list(&self) -> ClientResult<Vec<InvoiceWithLineItems>> {
        decode(self.http.get(self.url(None)).send().await?).await
    }

    async fn get(&self, id: i32) -> ClientResult<Option<InvoiceWithLineItems>> {
        decode(self.http.get(self.url(Some(id))).send().await?).await
    }

    async fn create(&self, payload: &InvoicePayload) -> ClientResult<InvoiceWithLineItems> {
        decode(self.http.post(self.url(None)).json(payload).send().await?).await
    }

    async fn update(
        &self,
        id: i32,
        payload: &InvoicePayload,
    ) -> ClientResult<InvoiceWithLineItems> {
        decode(self.http.put(self.url(Some(id))).json(payload).send().await?).await
    }

    async fn delete(&self, id: i32) -> ClientResult<String> {
        let confirmation: DeleteConfirmation =
            decode(self.http.delete(self.url(Some(id))).send().await?).await?;
        Ok(confirmation.message)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    debug!(%status, url = %response.url(), "Invoice API response");

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| status.to_string(), |body| body.error);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
