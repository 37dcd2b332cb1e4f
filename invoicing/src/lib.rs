pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod startup;

pub use error::{InvoicingError, StorageError, ValidationError};
pub use services::{InvoiceBook, KeyValueStore};
