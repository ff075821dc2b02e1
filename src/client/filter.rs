//! Client-side list filtering.
//!
//! [`filter_invoices`] matches a query against customer details and id.
//! [`DebouncedFilter`] delays that work until typing pauses: every keystroke cancels
//! the pending timer, so only the last query of a quiet period is computed.

use crate::models::InvoiceWithLineItems;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

/// Quiet period before a query is applied
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Case-insensitive substring match over customer details and id.
/// A blank query matches everything.
#[must_use]
pub fn filter_invoices(all: &[InvoiceWithLineItems], query: &str) -> Vec<InvoiceWithLineItems> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return all.to_vec();
    }

    all.iter()
        .filter(|invoice| {
            invoice
                .invoice
                .customer_details
                .to_lowercase()
                .contains(&needle)
                || invoice.id().to_string().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Debounced filter over a full invoice list.
///
/// Results are published on the receiver returned by [`DebouncedFilter::new`]. Must be
/// used inside a tokio runtime.
pub struct DebouncedFilter {
    all: Arc<Vec<InvoiceWithLineItems>>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    results: Arc<watch::Sender<Vec<InvoiceWithLineItems>>>,
}

impl DebouncedFilter {
    /// Starts with the unfiltered list as the current result.
    #[must_use]
    pub fn new(
        all: Vec<InvoiceWithLineItems>,
        delay: Duration,
    ) -> (Self, watch::Receiver<Vec<InvoiceWithLineItems>>) {
        let (sender, receiver) = watch::channel(all.clone());
        let filter = Self {
            all: Arc::new(all),
            delay,
            pending: None,
            results: Arc::new(sender),
        };
        (filter, receiver)
    }

    /// Swaps in a new full list (e.g. after a refetch). Takes effect on the next input.
    pub fn set_invoices(&mut self, all: Vec<InvoiceWithLineItems>) {
        self.all = Arc::new(all);
    }

    /// Records a keystroke: cancels any pending computation and schedules this query.
    pub fn on_input(&mut self, query: impl Into<String>) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let query = query.into();
        let all = Arc::clone(&self.all);
        let results = Arc::clone(&self.results);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let filtered = filter_invoices(&all, &query);
            debug!(query = %query, matches = filtered.len(), "Applied invoice filter");
            results.send_replace(filtered);
        }));
    }
}

impl Drop for DebouncedFilter {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::client::store::tests::sample_invoice;
    use tokio::time::Instant;

    fn invoices() -> Vec<InvoiceWithLineItems> {
        vec![
            sample_invoice(1, "Alice Cooper", 1000),
            sample_invoice(12, "Bob Builder", 2000),
            sample_invoice(3, "alicia keys", 3000),
        ]
    }

    fn ids(invoices: &[InvoiceWithLineItems]) -> Vec<i32> {
        invoices.iter().map(InvoiceWithLineItems::id).collect()
    }

    #[test]
    fn test_filter_by_customer_case_insensitive() {
        assert_eq!(ids(&filter_invoices(&invoices(), "ALIC")), vec![1, 3]);
    }

    #[test]
    fn test_filter_by_id() {
        assert_eq!(ids(&filter_invoices(&invoices(), "12")), vec![12]);
        assert_eq!(ids(&filter_invoices(&invoices(), "1")), vec![1, 12]);
    }

    #[test]
    fn test_blank_query_matches_all() {
        assert_eq!(filter_invoices(&invoices(), "  ").len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_query_in_quiet_period_runs() {
        let (mut filter, mut results) = DebouncedFilter::new(invoices(), DEFAULT_DEBOUNCE);
        let start = Instant::now();

        filter.on_input("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        filter.on_input("bob");

        results.changed().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert_eq!(ids(&results.borrow_and_update()), vec![12]);

        // The cancelled "a" query never publishes
        let late = tokio::time::timeout(Duration::from_secs(1), results.changed()).await;
        assert!(late.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_query_filters_full_set() {
        let (mut filter, mut results) = DebouncedFilter::new(invoices(), DEFAULT_DEBOUNCE);

        filter.on_input("bob");
        results.changed().await.unwrap();
        assert_eq!(ids(&results.borrow_and_update()), vec![12]);

        filter.on_input("alic");
        results.changed().await.unwrap();
        assert_eq!(ids(&results.borrow_and_update()), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetched_list_used_from_next_input() {
        let (mut filter, mut results) = DebouncedFilter::new(invoices(), DEFAULT_DEBOUNCE);

        filter.on_input("ali");
        results.changed().await.unwrap();
        assert_eq!(ids(&results.borrow_and_update()), vec![1, 3]);

        // Invoice 3 was deleted and 40 created elsewhere
        filter.set_invoices(vec![
            sample_invoice(1, "Alice Cooper", 1000),
            sample_invoice(40, "Alina Baker", 4000),
        ]);
        filter.on_input("ali");
        results.changed().await.unwrap();
        assert_eq!(ids(&results.borrow_and_update()), vec![1, 40]);
    }
}
