//! Read-only text rendering of invoices.

use crate::models::InvoiceWithLineItems;
use rust_decimal::Decimal;
use std::fmt::{self, Write};

fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// One invoice: header fields, then its line items with a computed total row.
///
/// # Errors
/// Propagates [`fmt::Error`] from the underlying writes.
pub fn render_invoice(invoice: &InvoiceWithLineItems) -> Result<String, fmt::Error> {
    let header = &invoice.invoice;

    let mut out = format!("Invoice #{}\n", header.id);
    writeln!(&mut out, "Customer Details: {}", header.customer_details)?;
    writeln!(&mut out, "Date: {}", header.date.format("%Y-%m-%d"))?;
    writeln!(&mut out, "Total Amount: {}", money(header.total_amount))?;
    writeln!(&mut out)?;
    out.push_str("Line Items\n");
    writeln!(
        &mut out,
        "{:<32} {:>8} {:>12}",
        "Description", "Quantity", "Amount"
    )?;

    for item in &invoice.line_items {
        writeln!(
            &mut out,
            "{:<32} {:>8} {:>12}",
            item.description.as_deref().unwrap_or("-"),
            item.quantity,
            money(item.amount)
        )?;
    }

    writeln!(
        &mut out,
        "{:<32} {:>8} {:>12}",
        "Total",
        "",
        money(invoice.line_items_total())
    )?;
    Ok(out)
}

/// The invoice list table.
///
/// # Errors
/// Propagates [`fmt::Error`] from the underlying writes.
pub fn render_invoice_list(invoices: &[InvoiceWithLineItems]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        &mut out,
        "{:>6}  {:<32} {:<10} {:>14}",
        "ID", "Customer Details", "Date", "Total Amount"
    )?;

    if invoices.is_empty() {
        out.push_str("No invoices found.\n");
        return Ok(out);
    }

    for invoice in invoices {
        let header = &invoice.invoice;
        writeln!(
            &mut out,
            "{:>6}  {:<32} {:<10} {:>14}",
            header.id,
            header.customer_details.replace('\n', ", "),
            header.date.format("%Y-%m-%d").to_string(),
            money(header.total_amount)
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::client::store::tests::sample_invoice;
    use crate::entities::LineItemModel;

    #[test]
    fn test_render_invoice_with_total_row() {
        let mut invoice = sample_invoice(7, "Charlie", 30000);
        invoice.line_items.push(LineItemModel {
            id: 71,
            invoice_id: 7,
            description: None,
            quantity: 2,
            amount: Decimal::new(1250, 2),
        });

        let text = render_invoice(&invoice).unwrap();

        assert!(text.starts_with("Invoice #7\n"));
        assert!(text.contains("Customer Details: Charlie"));
        assert!(text.contains("Date: 2025-01-15"));
        assert!(text.contains("Total Amount: $300.00"));
        assert!(text.contains("$12.50"));
        let total_row = text.lines().last().unwrap_or_default();
        assert!(total_row.starts_with("Total"));
        assert!(total_row.ends_with("$312.50"));
    }

    #[test]
    fn test_render_empty_list() {
        let text = render_invoice_list(&[]).unwrap();
        assert!(text.contains("No invoices found."));
    }

    #[test]
    fn test_render_list_rows() {
        let text = render_invoice_list(&[
            sample_invoice(1, "Alice\nMain St 1", 1000),
            sample_invoice(2, "Bob", 2050),
        ])
        .unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Alice, Main St 1"));
        assert!(text.contains("$20.50"));
    }
}
