//! Domain models for invoicing.

mod customer;
mod draft;
mod invoice;
mod line_item;
mod record_id;
mod settings;
mod work_location;

pub use customer::{Customer, CustomerInput};
pub use draft::DraftInvoice;
pub use invoice::{CustomerSnapshot, Invoice, InvoiceId, InvoiceStatus, WorkLocationSnapshot};
pub use line_item::{ItemId, LineItem, LineItemInput};
pub use settings::{BusinessInfo, BusinessProfile, Settings, DEFAULT_INVOICE_PREFIX};
pub use work_location::{WorkLocation, WorkLocationInput};

/// Treat blank optional text as absent.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Normalise free-text input: trimmed, `None` when blank.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
