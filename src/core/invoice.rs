//! Invoice business logic - Handles the five invoice operations.
//!
//! Create and update validate the payload first, then write the invoice and its line
//! items inside a single database transaction so a failure part-way leaves nothing
//! behind. Update replaces the whole line-item set instead of diffing it.

use crate::{
    config::settings::InvoiceRules,
    core::validation::{InvoiceDraft, LineItemDraft, validate_invoice},
    entities::{Invoice, LineItem, invoice, line_item},
    errors::{Error, Result},
    models::InvoiceWithLineItems,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Retrieves every invoice with its line items, ordered by invoice id.
#[instrument(skip(db))]
pub async fn list_invoices(db: &DatabaseConnection) -> Result<Vec<InvoiceWithLineItems>> {
    let rows = Invoice::find()
        .find_with_related(LineItem)
        .order_by_asc(invoice::Column::Id)
        .order_by_asc(line_item::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(invoice, line_items)| InvoiceWithLineItems {
            invoice,
            line_items,
        })
        .collect())
}

/// Finds one invoice with its line items, returning None if it does not exist.
#[instrument(skip(db))]
pub async fn get_invoice(
    db: &DatabaseConnection,
    invoice_id: i32,
) -> Result<Option<InvoiceWithLineItems>> {
    find_with_line_items(db, invoice_id).await
}

/// Validates the payload (including the total ceiling) and creates the invoice
/// together with its line items.
///
/// Repeating a create produces a new invoice with a new id.
#[instrument(skip(db, payload, rules))]
pub async fn create_invoice(
    db: &DatabaseConnection,
    payload: &Value,
    rules: &InvoiceRules,
) -> Result<InvoiceWithLineItems> {
    let draft = validate_invoice(payload, Some(rules.max_total_amount))?;
    warn_on_total_mismatch(&draft);

    let txn = db.begin().await?;

    let invoice = invoice::ActiveModel {
        customer_details: Set(draft.customer_details.clone()),
        date: Set(draft.date),
        total_amount: Set(draft.total_amount),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    insert_line_items(&txn, invoice.id, &draft.line_items).await?;

    let created = find_with_line_items(&txn, invoice.id)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice.id })?;

    txn.commit().await?;

    info!(
        invoice_id = created.id(),
        line_items = created.line_items.len(),
        "Invoice created"
    );
    Ok(created)
}

/// Validates the payload (no total ceiling) and replaces the invoice's fields and
/// its entire line-item set.
///
/// # Errors
/// [`Error::InvoiceNotFound`] when no invoice has `invoice_id`.
#[instrument(skip(db, payload))]
pub async fn update_invoice(
    db: &DatabaseConnection,
    invoice_id: i32,
    payload: &Value,
) -> Result<InvoiceWithLineItems> {
    let draft = validate_invoice(payload, None)?;
    warn_on_total_mismatch(&draft);

    let txn = db.begin().await?;

    let existing = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let mut invoice: invoice::ActiveModel = existing.into();
    invoice.customer_details = Set(draft.customer_details.clone());
    invoice.date = Set(draft.date);
    invoice.total_amount = Set(draft.total_amount);
    invoice.update(&txn).await?;

    LineItem::delete_many()
        .filter(line_item::Column::InvoiceId.eq(invoice_id))
        .exec(&txn)
        .await?;
    insert_line_items(&txn, invoice_id, &draft.line_items).await?;

    let updated = find_with_line_items(&txn, invoice_id)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    txn.commit().await?;

    info!(
        invoice_id,
        line_items = updated.line_items.len(),
        "Invoice updated"
    );
    Ok(updated)
}

/// Deletes an invoice's line items and then the invoice itself.
///
/// # Errors
/// [`Error::InvoiceNotFound`] when the invoice row did not exist.
#[instrument(skip(db))]
pub async fn delete_invoice(db: &DatabaseConnection, invoice_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let removed_items = LineItem::delete_many()
        .filter(line_item::Column::InvoiceId.eq(invoice_id))
        .exec(&txn)
        .await?
        .rows_affected;

    let result = Invoice::delete_by_id(invoice_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::InvoiceNotFound { id: invoice_id });
    }

    txn.commit().await?;

    info!(invoice_id, removed_items, "Invoice deleted");
    Ok(())
}

async fn find_with_line_items<C>(db: &C, invoice_id: i32) -> Result<Option<InvoiceWithLineItems>>
where
    C: ConnectionTrait,
{
    let Some(invoice) = Invoice::find_by_id(invoice_id).one(db).await? else {
        return Ok(None);
    };

    let line_items = invoice
        .find_related(LineItem)
        .order_by_asc(line_item::Column::Id)
        .all(db)
        .await?;

    Ok(Some(InvoiceWithLineItems {
        invoice,
        line_items,
    }))
}

async fn insert_line_items<C>(db: &C, invoice_id: i32, items: &[LineItemDraft]) -> Result<()>
where
    C: ConnectionTrait,
{
    let models = items.iter().map(|item| line_item::ActiveModel {
        invoice_id: Set(invoice_id),
        description: Set(item.description.clone()),
        quantity: Set(item.quantity),
        amount: Set(item.amount),
        ..Default::default()
    });

    LineItem::insert_many(models).exec(db).await?;
    Ok(())
}

/// The supplied total is stored as given; a mismatch is only reported.
fn warn_on_total_mismatch(draft: &InvoiceDraft) {
    let line_total = draft.line_items_total();
    if line_total != draft.total_amount {
        warn!(
            supplied = %draft.total_amount,
            line_items = %line_total,
            "Invoice total does not match the sum of its line items"
        );
    }
}
