//! Invoice-level validation.

use crate::error::ValidationError;
use crate::models::DraftInvoice;

/// Check a draft before it is saved or finalized.
///
/// Rules are checked in a fixed order and the first failure is reported:
/// customer name, work location name, at least one item, invoice number.
/// Whitespace-only text counts as missing.
pub fn validate(draft: &DraftInvoice) -> Result<(), ValidationError> {
    if draft.customer.name.trim().is_empty() {
        return Err(ValidationError::MissingCustomerName);
    }
    if draft.work_location.name.trim().is_empty() {
        return Err(ValidationError::MissingWorkLocation);
    }
    if draft.items.is_empty() {
        return Err(ValidationError::NoItems);
    }
    if draft.number.trim().is_empty() {
        return Err(ValidationError::MissingNumber);
    }
    Ok(())
}
