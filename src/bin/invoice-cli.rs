//! Terminal front end for the invoice service.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use invoice_desk::client::{
    ClientError, ClientResult, HttpInvoiceClient, InvoiceApi, InvoiceForm, InvoiceStore,
    SubmitOutcome, filter_invoices,
    form::{LineItemRow, parse_line_item},
    view::{render_invoice, render_invoice_list},
};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "invoice-cli")]
#[command(about = "List, create, edit, view and delete invoices")]
#[command(version)]
struct Cli {
    /// Root URL of the invoice service
    #[arg(long, env = "INVOICE_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all invoices, optionally filtered by customer or id
    List {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one invoice with its line items
    #[command(alias = "print")]
    View { id: i32 },
    /// Delete an invoice and its line items
    Delete { id: i32 },
    /// Create an invoice
    Create {
        #[arg(long)]
        customer: String,
        /// RFC 3339 timestamp or YYYY-MM-DD; defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Line item as description:quantity:amount (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Edit an invoice; omitted options keep their current values
    Edit {
        id: i32,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// Replaces all line items when given
        #[arg(long = "item")]
        items: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let api = HttpInvoiceClient::new(cli.api_url);

    match cli.command {
        Command::List { filter } => {
            let mut store = InvoiceStore::new();
            store.fetch_invoices(&api).await?;
            let shown = filter_invoices(store.invoices(), filter.as_deref().unwrap_or(""));
            print!("{}", render_invoice_list(&shown)?);
        }
        Command::View { id } => {
            let invoice = api.get(id).await?.ok_or_else(|| ClientError::Form {
                message: "Error fetching the invoice".to_string(),
            })?;
            print!("{}", render_invoice(&invoice)?);
        }
        Command::Delete { id } => {
            let mut store = InvoiceStore::new();
            store.fetch_invoices(&api).await?;
            let message = store.delete_invoice(&api, id).await?;
            println!("{message}");
            print!("{}", render_invoice_list(store.invoices())?);
        }
        Command::Create {
            customer,
            date,
            items,
        } => {
            let mut form = InvoiceForm::new_invoice(parse_date(date.as_deref())?);
            form.values_mut().customer_details = customer;
            form.values_mut().line_items = parse_items(&items)?;
            report(form.submit(&api).await?)?;
        }
        Command::Edit {
            id,
            customer,
            date,
            items,
        } => {
            let mut form = InvoiceForm::load(&api, id).await?;
            if let Some(customer) = customer {
                form.values_mut().customer_details = customer;
            }
            if date.is_some() {
                form.values_mut().date = parse_date(date.as_deref())?;
            }
            if !items.is_empty() {
                form.values_mut().line_items = parse_items(&items)?;
            }
            report(form.submit(&api).await?)?;
        }
    }

    Ok(())
}

fn report(outcome: SubmitOutcome) -> ClientResult<()> {
    match outcome {
        SubmitOutcome::Unchanged => println!("No changes detected."),
        SubmitOutcome::Created(invoice) => {
            println!("Invoice created successfully!");
            print!("{}", render_invoice(&invoice)?);
        }
        SubmitOutcome::Updated(invoice) => {
            println!("Invoice updated successfully!");
            print!("{}", render_invoice(&invoice)?);
        }
    }
    Ok(())
}

fn parse_items(items: &[String]) -> ClientResult<Vec<LineItemRow>> {
    items.iter().map(|item| parse_line_item(item)).collect()
}

fn parse_date(raw: Option<&str>) -> ClientResult<DateTime<FixedOffset>> {
    let Some(raw) = raw else {
        return Ok(Utc::now().fixed_offset());
    };

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc().fixed_offset())
        })
        .ok_or_else(|| ClientError::Form {
            message: "Please select the date".to_string(),
        })
}
