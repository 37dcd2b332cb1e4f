//! Error taxonomy for invoicing.

use crate::models::{InvoiceId, ItemId};
use crate::services::store::StorageKey;
use service_core::error::AppError;
use thiserror::Error;

/// A required field is missing or a value is out of range.
///
/// The first four variants are the invoice-level checks, reported in the order
/// listed. The rest come from line-item entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter customer name")]
    MissingCustomerName,

    #[error("Please enter work location name")]
    MissingWorkLocation,

    #[error("Please add at least one item")]
    NoItems,

    #[error("Please enter invoice number")]
    MissingNumber,

    #[error("Item description is required")]
    MissingDescription,

    #[error("Item quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("Item price must be a positive amount")]
    InvalidUnitPrice,
}

/// Persistence read/write failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: StorageKey,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored data for '{key}' is corrupt: {source}")]
    Corrupt {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage quota exceeded writing '{key}' ({needed} bytes needed, {available} available)")]
    QuotaExceeded {
        key: StorageKey,
        needed: usize,
        available: usize,
    },
}

#[derive(Debug, Error)]
pub enum InvoicingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Error importing data: {0}")]
    ImportFormat(String),

    #[error("Failed to serialize export: {0}")]
    Export(#[source] serde_json::Error),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    #[error("Customer not found: {0}")]
    CustomerNotFound(u64),

    #[error("Work location not found: {0}")]
    WorkLocationNotFound(u64),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("No invoice is being edited")]
    NotEditing,

    #[error("Invoice {0} is being edited; update it or cancel the edit first")]
    EditInProgress(InvoiceId),

    #[error("Invoice number {0} is already used by a completed invoice")]
    DuplicateNumber(String),

    #[error("No ids left for new {0}")]
    IdsExhausted(&'static str),

    #[error("Failed to render document: {0}")]
    Render(String),
}

impl From<InvoicingError> for AppError {
    fn from(err: InvoicingError) -> Self {
        match err {
            InvoicingError::Validation(_) | InvoicingError::ImportFormat(_) => {
                AppError::BadRequest(anyhow::Error::new(err))
            }
            InvoicingError::InvoiceNotFound(_)
            | InvoicingError::CustomerNotFound(_)
            | InvoicingError::WorkLocationNotFound(_)
            | InvoicingError::ItemNotFound(_)
            | InvoicingError::NotEditing => AppError::NotFound(anyhow::Error::new(err)),
            InvoicingError::DuplicateNumber(_)
            | InvoicingError::EditInProgress(_)
            | InvoicingError::IdsExhausted(_) => {
                AppError::Conflict(anyhow::Error::new(err))
            }
            InvoicingError::Storage(_) => AppError::StorageError(anyhow::Error::new(err)),
            InvoicingError::Export(_) | InvoicingError::Render(_) => {
                AppError::InternalError(anyhow::Error::new(err))
            }
        }
    }
}
