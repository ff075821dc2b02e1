//! Explicit state container for the invoice list.
//!
//! State only changes through [`InvoiceStore::apply`]. The async actions first talk
//! to the server and then apply the result, so a failed request leaves the list as
//! it was.

use super::api::{ClientResult, InvoiceApi};
use crate::models::InvoiceWithLineItems;
use tracing::{info, instrument};

/// A state transition for [`InvoiceStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the whole list with a fresh server listing
    Loaded(Vec<InvoiceWithLineItems>),
    /// Drop the invoice with this id after the server confirmed the delete
    Removed(i32),
}

/// The client's in-memory invoice list
#[derive(Debug, Default)]
pub struct InvoiceStore {
    invoices: Vec<InvoiceWithLineItems>,
}

impl InvoiceStore {
    /// An empty store
    #[must_use]
    pub const fn new() -> Self {
        Self {
            invoices: Vec::new(),
        }
    }

    /// Current invoices, in server order
    #[must_use]
    pub fn invoices(&self) -> &[InvoiceWithLineItems] {
        &self.invoices
    }

    /// Applies one state transition.
    pub fn apply(&mut self, action: StoreAction) {
        match action {
            StoreAction::Loaded(invoices) => self.invoices = invoices,
            StoreAction::Removed(id) => self.invoices.retain(|invoice| invoice.id() != id),
        }
    }

    /// Replaces the list with the server's current listing.
    #[instrument(skip(self, api))]
    pub async fn fetch_invoices<A: InvoiceApi>(&mut self, api: &A) -> ClientResult<()> {
        let invoices = api.list().await?;
        info!(count = invoices.len(), "Fetched invoices");
        self.apply(StoreAction::Loaded(invoices));
        Ok(())
    }

    /// Deletes on the server, then removes the entry locally.
    #[instrument(skip(self, api))]
    pub async fn delete_invoice<A: InvoiceApi>(
        &mut self,
        api: &A,
        id: i32,
    ) -> ClientResult<String> {
        let confirmation = api.delete(id).await?;
        self.apply(StoreAction::Removed(id));
        Ok(confirmation)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::client::api::{ClientError, InvoicePayload};
    use crate::entities::{InvoiceModel, LineItemModel};
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    /// Builds an invoice with one line item carrying the whole total.
    pub(crate) fn sample_invoice(
        id: i32,
        customer: &str,
        total_cents: i64,
    ) -> InvoiceWithLineItems {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 15, 10, 0, 0)
            .unwrap();
        InvoiceWithLineItems {
            invoice: InvoiceModel {
                id,
                customer_details: customer.to_string(),
                date,
                total_amount: Decimal::new(total_cents, 2),
            },
            line_items: vec![LineItemModel {
                id: id * 10,
                invoice_id: id,
                description: Some("Test item".to_string()),
                quantity: 1,
                amount: Decimal::new(total_cents, 2),
            }],
        }
    }

    /// In-memory stand-in for the server.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub invoices: Mutex<Vec<InvoiceWithLineItems>>,
        pub created: Mutex<Vec<InvoicePayload>>,
        pub updated: Mutex<Vec<(i32, InvoicePayload)>>,
    }

    impl FakeApi {
        pub(crate) fn with(invoices: Vec<InvoiceWithLineItems>) -> Self {
            Self {
                invoices: Mutex::new(invoices),
                ..Self::default()
            }
        }
    }

    impl InvoiceApi for FakeApi {
        async fn list(&self) -> ClientResult<Vec<InvoiceWithLineItems>> {
            Ok(self.invoices.lock().unwrap().clone())
        }

        async fn get(&self, id: i32) -> ClientResult<Option<InvoiceWithLineItems>> {
            Ok(self
                .invoices
                .lock()
                .unwrap()
                .iter()
                .find(|invoice| invoice.id() == id)
                .cloned())
        }

        async fn create(&self, payload: &InvoicePayload) -> ClientResult<InvoiceWithLineItems> {
            self.created.lock().unwrap().push(payload.clone());
            Ok(sample_invoice(99, &payload.customer_details, 100))
        }

        async fn update(
            &self,
            id: i32,
            payload: &InvoicePayload,
        ) -> ClientResult<InvoiceWithLineItems> {
            self.updated.lock().unwrap().push((id, payload.clone()));
            Ok(sample_invoice(id, &payload.customer_details, 100))
        }

        async fn delete(&self, id: i32) -> ClientResult<String> {
            let mut invoices = self.invoices.lock().unwrap();
            let before = invoices.len();
            invoices.retain(|invoice| invoice.id() != id);
            if invoices.len() == before {
                return Err(ClientError::Api {
                    status: 404,
                    message: "Invoice not found".to_string(),
                });
            }
            Ok("Invoice deleted successfully".to_string())
        }
    }

    #[tokio::test]
    async fn test_fetch_replaces_list() {
        let api = FakeApi::with(vec![sample_invoice(1, "Alice", 1000)]);
        let mut store = InvoiceStore::new();
        store.apply(StoreAction::Loaded(vec![sample_invoice(5, "Stale", 100)]));

        store.fetch_invoices(&api).await.unwrap();

        assert_eq!(store.invoices().len(), 1);
        assert_eq!(store.invoices()[0].invoice.customer_details, "Alice");
    }

    #[tokio::test]
    async fn test_delete_removes_after_confirmation() {
        let api = FakeApi::with(vec![
            sample_invoice(1, "Alice", 1000),
            sample_invoice(2, "Bob", 2000),
        ]);
        let mut store = InvoiceStore::new();
        store.fetch_invoices(&api).await.unwrap();

        let message = store.delete_invoice(&api, 1).await.unwrap();

        assert_eq!(message, "Invoice deleted successfully");
        assert_eq!(store.invoices().len(), 1);
        assert_eq!(store.invoices()[0].id(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_entry() {
        let api = FakeApi::with(vec![sample_invoice(1, "Alice", 1000)]);
        let mut store = InvoiceStore::new();
        store.fetch_invoices(&api).await.unwrap();
        api.invoices.lock().unwrap().clear();

        let result = store.delete_invoice(&api, 1).await;

        assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));
        assert_eq!(store.invoices().len(), 1);
    }
}
