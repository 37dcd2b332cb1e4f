//! Services module for invoicing.

pub mod book;
mod contacts;
pub mod lifecycle;
pub mod numbering;
pub mod store;
pub mod totals;
pub mod transfer;
pub mod validation;

pub use book::{BookStats, InvoiceBook};
pub use lifecycle::FinalizedInvoice;
pub use numbering::next_number;
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageKey};
pub use totals::{parse_tax_rate, Totals};
pub use transfer::{backup_file_name, ExportBundle, ImportSummary, EXPORT_VERSION};
pub use validation::validate;
