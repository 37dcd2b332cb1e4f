//! Command-line surface.

use crate::models::{InvoiceId, LineItemInput};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use service_core::config::LogFormat;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "invoicing", version, about = "Customers, work locations and printable invoices")]
pub struct Cli {
    /// Override the configured log format (pretty or json).
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage saved customers
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Manage saved work locations
    #[command(subcommand)]
    Location(LocationCommand),
    /// Create, edit and print invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Business information and invoice defaults
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Write a JSON backup of all data
    Export {
        /// Output file (defaults to invoice-backup-<date>.json in the output directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace all data with the contents of a backup
    Import {
        file: PathBuf,
        #[command(flatten)]
        confirm: Confirm,
    },
    /// Delete all data and restore default settings
    Clear {
        #[command(flatten)]
        confirm: Confirm,
    },
    /// Record counts and storage size
    Stats,
}

/// Destructive commands only run with an explicit `--yes`.
#[derive(Debug, Clone, Copy, Args)]
pub struct Confirm {
    /// Confirm the operation
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct CustomerFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    Add(CustomerFields),
    Update {
        id: u64,
        #[command(flatten)]
        fields: CustomerFields,
    },
    List,
    Delete {
        id: u64,
        #[command(flatten)]
        confirm: Confirm,
    },
}

#[derive(Debug, Args)]
pub struct LocationFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    Add(LocationFields),
    Update {
        id: u64,
        #[command(flatten)]
        fields: LocationFields,
    },
    List,
    Delete {
        id: u64,
        #[command(flatten)]
        confirm: Confirm,
    },
}

/// Invoice contents. On `edit`, anything left out keeps its stored value.
#[derive(Debug, Args)]
pub struct InvoiceFields {
    /// Saved customer to bill
    #[arg(long, conflicts_with = "customer_name")]
    pub customer: Option<u64>,
    /// Bill a customer that is not saved
    #[arg(long)]
    pub customer_name: Option<String>,
    /// Saved work location
    #[arg(long, conflicts_with = "location_name")]
    pub location: Option<u64>,
    /// Work location that is not saved
    #[arg(long)]
    pub location_name: Option<String>,
    /// Line item as `description|quantity|price`; repeat for more items
    #[arg(long = "item")]
    pub items: Vec<LineItemInput>,
    /// Tax rate in percent (non-numeric input counts as 0)
    #[arg(long)]
    pub tax_rate: Option<String>,
    /// Invoice number (defaults to the next number in sequence)
    #[arg(long)]
    pub number: Option<String>,
    /// Invoice date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// Compose an invoice and write its PDF
    New {
        #[command(flatten)]
        fields: InvoiceFields,
        /// Save as a draft instead of generating the document
        #[arg(long)]
        draft: bool,
    },
    /// Change a stored invoice and regenerate its PDF
    Edit {
        id: InvoiceId,
        #[command(flatten)]
        fields: InvoiceFields,
        /// Save changes without generating a document, keeping the status
        #[arg(long)]
        no_render: bool,
    },
    List {
        /// Match number, customer or work location
        #[arg(long, default_value = "")]
        search: String,
        /// Only invoices for this exact customer name
        #[arg(long)]
        customer: Option<String>,
    },
    Show {
        id: InvoiceId,
    },
    /// Write the PDF for a stored invoice
    Render {
        id: InvoiceId,
    },
    /// Prepare a stored invoice for sharing
    Share {
        id: InvoiceId,
    },
    Delete {
        id: InvoiceId,
        #[command(flatten)]
        confirm: Confirm,
    },
    /// Print the number the next invoice will get
    NextNumber,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Update business information; omitted fields keep their value
    Business {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        slogan: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        tax_id: Option<String>,
    },
    /// Update invoice defaults
    Invoice {
        #[arg(long)]
        default_tax_rate: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
    },
}
