//! Client side of the invoice service.
//!
//! Talks to the REST API, keeps an explicit in-memory invoice list, and provides the
//! filter, form and view logic used by the terminal front end. Validation here is
//! cosmetic only; the server is authoritative.

/// HTTP client and the [`api::InvoiceApi`] seam
pub mod api;
/// Client-side list filtering with debounce
pub mod filter;
/// Create/edit form model with change detection
pub mod form;
/// Explicit state container for the invoice list
pub mod store;
/// Read-only text rendering of invoices
pub mod view;

pub use api::{ClientError, ClientResult, HttpInvoiceClient, InvoiceApi};
pub use filter::{DebouncedFilter, filter_invoices};
pub use form::{InvoiceForm, SubmitOutcome};
pub use store::{InvoiceStore, StoreAction};
