//! Create/edit form model.
//!
//! An edit form keeps a snapshot of the invoice it was loaded from. On submit both are
//! normalized and compared; an unchanged form never reaches the server. Otherwise the
//! total is computed from the line items and the invoice is created or updated.

use super::api::{ClientError, ClientResult, InvoiceApi, InvoicePayload, LineItemPayload};
use crate::models::InvoiceWithLineItems;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

/// Smallest amount the form accepts
const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One editable line-item row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineItemRow {
    /// Store id when the row came from an existing invoice
    pub id: Option<i32>,
    /// Description text
    pub description: Option<String>,
    /// Units, `None` while the field is empty
    pub quantity: Option<i32>,
    /// Amount, `None` while the field is empty
    pub amount: Option<Decimal>,
}

impl LineItemRow {
    /// The row a fresh form or "add line item" starts with
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: None,
            description: Some(String::new()),
            quantity: Some(1),
            amount: Some(MIN_AMOUNT),
        }
    }
}

/// Editable form values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    /// Customer name/address block
    pub customer_details: String,
    /// Invoice date
    pub date: DateTime<FixedOffset>,
    /// Line-item rows, in display order
    pub line_items: Vec<LineItemRow>,
}

/// Comparable form of [`FormValues`]: UTC timestamp text, empty numbers as zero.
#[derive(Debug, PartialEq, Eq)]
struct NormalizedValues {
    customer_details: String,
    date: String,
    line_items: Vec<(Option<i32>, Option<String>, i32, Decimal)>,
}

impl FormValues {
    fn normalized(&self) -> NormalizedValues {
        NormalizedValues {
            customer_details: self.customer_details.clone(),
            date: iso_timestamp(&self.date),
            line_items: self
                .line_items
                .iter()
                .map(|row| {
                    (
                        row.id,
                        row.description.clone(),
                        row.quantity.unwrap_or(0),
                        row.amount.unwrap_or(Decimal::ZERO),
                    )
                })
                .collect(),
        }
    }
}

/// What a submit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing changed since loading; no request was made
    Unchanged,
    /// A new invoice was created
    Created(InvoiceWithLineItems),
    /// The loaded invoice was replaced
    Updated(InvoiceWithLineItems),
}

/// Form state for creating a new invoice or editing an existing one
#[derive(Debug, Clone)]
pub struct InvoiceForm {
    id: Option<i32>,
    values: FormValues,
    snapshot: Option<FormValues>,
}

impl InvoiceForm {
    /// An empty create form dated `date` with one blank row.
    #[must_use]
    pub fn new_invoice(date: DateTime<FixedOffset>) -> Self {
        Self {
            id: None,
            values: FormValues {
                customer_details: String::new(),
                date,
                line_items: vec![LineItemRow::blank()],
            },
            snapshot: None,
        }
    }

    /// An edit form preloaded from `invoice`, snapshotting the loaded values.
    #[must_use]
    pub fn from_invoice(invoice: &InvoiceWithLineItems) -> Self {
        let values = FormValues {
            customer_details: invoice.invoice.customer_details.clone(),
            date: invoice.invoice.date,
            line_items: invoice
                .line_items
                .iter()
                .map(|item| LineItemRow {
                    id: Some(item.id),
                    description: item.description.clone(),
                    quantity: Some(item.quantity),
                    amount: Some(item.amount),
                })
                .collect(),
        };

        Self {
            id: Some(invoice.id()),
            snapshot: Some(values.clone()),
            values,
        }
    }

    /// Fetches invoice `id` and builds an edit form from it.
    pub async fn load<A: InvoiceApi>(api: &A, id: i32) -> ClientResult<Self> {
        api.get(id)
            .await?
            .map(|invoice| Self::from_invoice(&invoice))
            .ok_or_else(|| ClientError::Form {
                message: "Failed to load invoice data".to_string(),
            })
    }

    /// Id of the invoice being edited, `None` for a create form
    #[must_use]
    pub const fn id(&self) -> Option<i32> {
        self.id
    }

    /// Current values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current values, for editing
    pub fn values_mut(&mut self) -> &mut FormValues {
        &mut self.values
    }

    /// Appends a blank row.
    pub fn add_line_item(&mut self) {
        self.values.line_items.push(LineItemRow::blank());
    }

    /// Removes a row; the last remaining row cannot be removed.
    pub fn remove_line_item(&mut self, index: usize) {
        if self.values.line_items.len() > 1 && index < self.values.line_items.len() {
            self.values.line_items.remove(index);
        }
    }

    /// Whether an edit form still matches what was loaded.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.normalized() == self.values.normalized())
    }

    /// Sum of the row amounts, empty amounts counting as zero.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.values
            .line_items
            .iter()
            .map(|row| row.amount.unwrap_or(Decimal::ZERO))
            .sum()
    }

    /// Cosmetic checks mirroring the input widgets.
    pub fn check(&self) -> ClientResult<()> {
        let fail = |message: &str| {
            Err(ClientError::Form {
                message: message.to_string(),
            })
        };

        if self.values.customer_details.trim().is_empty() {
            return fail("Please input customer details");
        }
        if self.values.line_items.is_empty() {
            return fail("Add at least one line item");
        }
        for row in &self.values.line_items {
            if row.description.as_deref().is_none_or(|text| text.trim().is_empty()) {
                return fail("Missing description");
            }
            if row.quantity.is_none_or(|quantity| quantity < 1) {
                return fail("At least 1");
            }
            if row.amount.is_none_or(|amount| amount < MIN_AMOUNT) {
                return fail("Amount must be at least 0.01");
            }
        }
        Ok(())
    }

    /// The request body for the current values.
    #[must_use]
    pub fn payload(&self) -> InvoicePayload {
        InvoicePayload {
            customer_details: self.values.customer_details.clone(),
            date: iso_timestamp(&self.values.date),
            total_amount: self.total_amount(),
            line_items: self
                .values
                .line_items
                .iter()
                .map(|row| LineItemPayload {
                    description: row.description.clone(),
                    quantity: row.quantity.unwrap_or(0),
                    amount: row.amount.unwrap_or(Decimal::ZERO),
                })
                .collect(),
        }
    }

    /// Checks, short-circuits unchanged edits, then creates or updates.
    pub async fn submit<A: InvoiceApi>(&self, api: &A) -> ClientResult<SubmitOutcome> {
        self.check()?;

        if self.is_unchanged() {
            info!("No changes detected.");
            return Ok(SubmitOutcome::Unchanged);
        }

        let payload = self.payload();
        match self.id {
            Some(id) => {
                let updated = api.update(id, &payload).await?;
                info!(invoice_id = id, "Invoice updated successfully!");
                Ok(SubmitOutcome::Updated(updated))
            }
            None => {
                let created = api.create(&payload).await?;
                info!(invoice_id = created.id(), "Invoice created successfully!");
                Ok(SubmitOutcome::Created(created))
            }
        }
    }
}

/// Parses a `description:quantity:amount` row, splitting from the right so the
/// description may itself contain colons.
pub fn parse_line_item(raw: &str) -> ClientResult<LineItemRow> {
    let invalid = || ClientError::Form {
        message: format!("Invalid line item `{raw}`, expected description:quantity:amount"),
    };

    let mut parts = raw.rsplitn(3, ':');
    let amount = parts.next().ok_or_else(invalid)?;
    let quantity = parts.next().ok_or_else(invalid)?;
    let description = parts.next().ok_or_else(invalid)?;

    Ok(LineItemRow {
        id: None,
        description: Some(description.trim().to_string()),
        quantity: Some(quantity.trim().parse().map_err(|_| invalid())?),
        amount: Some(Decimal::from_str(amount.trim()).map_err(|_| invalid())?),
    })
}

fn iso_timestamp(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::client::store::tests::{FakeApi, sample_invoice};

    fn filled_create_form() -> InvoiceForm {
        let date = DateTime::parse_from_rfc3339("2025-06-01T08:00:00+02:00").unwrap();
        let mut form = InvoiceForm::new_invoice(date);
        form.values_mut().customer_details = "Charlie".to_string();
        form.values_mut().line_items = vec![
            parse_line_item("Design:2:150.25").unwrap(),
            parse_line_item("Hosting: monthly:1:49.75").unwrap(),
        ];
        form
    }

    #[tokio::test]
    async fn test_create_computes_total() {
        let api = FakeApi::default();
        let form = filled_create_form();

        let outcome = form.submit(&api).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        let created = api.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].total_amount, Decimal::new(200, 0));
        assert_eq!(created[0].date, "2025-06-01T06:00:00.000Z");
        assert_eq!(created[0].line_items[1].description.as_deref(), Some("Hosting: monthly"));
    }

    #[tokio::test]
    async fn test_unchanged_edit_skips_network() {
        let invoice = sample_invoice(4, "Dana", 5000);
        let api = FakeApi::with(vec![invoice]);
        let form = InvoiceForm::load(&api, 4).await.unwrap();

        let outcome = form.submit(&api).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Unchanged);
        assert!(api.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_changed_edit_updates() {
        let api = FakeApi::with(vec![sample_invoice(4, "Dana", 5000)]);
        let mut form = InvoiceForm::load(&api, 4).await.unwrap();
        form.values_mut().line_items[0].amount = Some(Decimal::new(7500, 2));

        let outcome = form.submit(&api).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Updated(_)));
        let updated = api.updated.lock().unwrap();
        assert_eq!(updated[0].0, 4);
        assert_eq!(updated[0].1.total_amount, Decimal::new(7500, 2));
    }

    #[tokio::test]
    async fn test_load_missing_invoice() {
        let api = FakeApi::default();
        let result = InvoiceForm::load(&api, 42).await;
        assert!(matches!(result, Err(ClientError::Form { .. })));
    }

    #[test]
    fn test_cosmetic_checks() {
        let mut form = filled_create_form();
        form.values_mut().customer_details = "  ".to_string();
        assert!(form.check().is_err());

        let mut form = filled_create_form();
        form.values_mut().line_items[0].quantity = Some(0);
        assert!(form.check().is_err());

        let mut form = filled_create_form();
        form.values_mut().line_items[0].amount = None;
        assert!(form.check().is_err());

        assert!(filled_create_form().check().is_ok());
    }

    #[test]
    fn test_last_row_cannot_be_removed() {
        let mut form = InvoiceForm::new_invoice(Utc::now().fixed_offset());
        form.add_line_item();
        form.remove_line_item(0);
        form.remove_line_item(0);
        assert_eq!(form.values().line_items.len(), 1);
    }

    #[test]
    fn test_parse_line_item_errors() {
        assert!(parse_line_item("no separators").is_err());
        assert!(parse_line_item("Item:many:10").is_err());
        assert!(parse_line_item("Item:1:ten").is_err());
    }
}
