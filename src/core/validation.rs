//! Payload validation - Turns an untyped JSON body into a typed invoice draft.
//!
//! The body is inspected as a [`serde_json::Value`] rather than deserialized into a
//! struct so that a wrong JSON type yields the same message as a missing field.
//! Checks run in a fixed order and the first failure wins.

use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Message for any top-level field that is missing or malformed
pub const MISSING_FIELDS: &str = "Invalid or missing required fields";
/// Message for a malformed entry in `lineItems`
pub const INVALID_LINE_ITEM: &str = "Invalid line item data";

/// A validated invoice ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Trimmed, non-empty customer details
    pub customer_details: String,
    /// Parsed invoice date
    pub date: DateTime<FixedOffset>,
    /// Total rounded to cents, strictly positive
    pub total_amount: Decimal,
    /// At least one line item
    pub line_items: Vec<LineItemDraft>,
}

impl InvoiceDraft {
    /// Sum of the line-item amounts.
    #[must_use]
    pub fn line_items_total(&self) -> Decimal {
        self.line_items.iter().map(|item| item.amount).sum()
    }
}

/// A validated line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemDraft {
    /// Description, `None` when absent or empty
    pub description: Option<String>,
    /// Whole number of units, at least 1
    pub quantity: i32,
    /// Amount rounded to cents, strictly positive
    pub amount: Decimal,
}

/// Validates an invoice payload.
///
/// `max_total_amount` is the creation ceiling; updates pass `None` and accept any
/// positive total.
///
/// # Errors
/// - [`Error::Validation`] with [`MISSING_FIELDS`] or [`INVALID_LINE_ITEM`]
/// - [`Error::AmountLimitExceeded`] when the total is above `max_total_amount`
pub fn validate_invoice(payload: &Value, max_total_amount: Option<f64>) -> Result<InvoiceDraft> {
    let fields = payload
        .as_object()
        .ok_or_else(|| Error::validation(MISSING_FIELDS))?;

    // The ceiling takes precedence over every other check on create.
    if let Some(limit) = max_total_amount {
        let total = fields.get("totalAmount").and_then(Value::as_f64);
        if total.is_some_and(|total| total > limit) {
            return Err(Error::AmountLimitExceeded { limit });
        }
    }

    let customer_details = fields
        .get("customerDetails")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|details| !details.is_empty())
        .ok_or_else(|| Error::validation(MISSING_FIELDS))?;

    let date = fields
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_date)
        .ok_or_else(|| Error::validation(MISSING_FIELDS))?;

    let raw_total = fields
        .get("totalAmount")
        .and_then(Value::as_f64)
        .filter(|total| *total > 0.0)
        .ok_or_else(|| Error::validation(MISSING_FIELDS))?;

    let total_amount = to_cents(raw_total).ok_or_else(|| Error::validation(MISSING_FIELDS))?;

    let raw_items = fields
        .get("lineItems")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| Error::validation(MISSING_FIELDS))?;

    let line_items = raw_items
        .iter()
        .map(validate_line_item)
        .collect::<Result<Vec<_>>>()?;

    Ok(InvoiceDraft {
        customer_details: customer_details.to_string(),
        date,
        total_amount,
        line_items,
    })
}

fn validate_line_item(item: &Value) -> Result<LineItemDraft> {
    let invalid = || Error::validation(INVALID_LINE_ITEM);
    let fields: &Map<String, Value> = item.as_object().ok_or_else(invalid)?;

    let description = match fields.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.is_empty() => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => return Err(invalid()),
    };

    let quantity = fields
        .get("quantity")
        .and_then(positive_whole_number)
        .ok_or_else(invalid)?;

    let amount = fields
        .get("amount")
        .and_then(Value::as_f64)
        .filter(|amount| *amount > 0.0)
        .and_then(to_cents)
        .ok_or_else(invalid)?;

    Ok(LineItemDraft {
        description,
        quantity,
        amount,
    })
}

/// Parses a route id segment as a positive integer.
///
/// # Errors
/// [`Error::InvalidInvoiceId`] for anything else.
pub fn parse_invoice_id(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::InvalidInvoiceId {
            raw: raw.to_string(),
        })
}

/// Accepts RFC 3339 timestamps, naive timestamps (taken as UTC) and plain dates
/// (midnight UTC).
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().fixed_offset())
}

/// Converts to a two-fraction-digit decimal; `None` if it rounds to zero or is not finite.
fn to_cents(value: f64) -> Option<Decimal> {
    Decimal::try_from(value)
        .ok()
        .map(|amount| amount.round_dp(2))
        .filter(|amount| *amount > Decimal::ZERO)
}

fn positive_whole_number(value: &Value) -> Option<i32> {
    if let Some(whole) = value.as_i64() {
        return i32::try_from(whole).ok().filter(|quantity| *quantity > 0);
    }
    let number = value.as_f64()?;
    if number.fract() != 0.0 || number <= 0.0 || number > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)] // whole and within i32 range, checked above
    let quantity = number as i32;
    Some(quantity)
}
