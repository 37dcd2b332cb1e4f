//! Editable invoice draft.

use super::{
    Customer, CustomerSnapshot, Invoice, ItemId, LineItem, LineItemInput, WorkLocation,
    WorkLocationSnapshot,
};
use crate::error::InvoicingError;
use crate::services::totals::Totals;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// The in-memory form of an invoice being composed or edited.
///
/// Totals are never stored here; [`DraftInvoice::totals`] derives them from
/// the current items and rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftInvoice {
    pub number: String,
    pub date: NaiveDate,
    pub customer: CustomerSnapshot,
    pub work_location: WorkLocationSnapshot,
    pub items: Vec<LineItem>,
    pub tax_rate_percent: Decimal,
}

impl DraftInvoice {
    pub fn new(number: impl Into<String>, date: NaiveDate, tax_rate_percent: Decimal) -> Self {
        Self {
            number: number.into(),
            date,
            customer: CustomerSnapshot::default(),
            work_location: WorkLocationSnapshot::default(),
            items: Vec::new(),
            tax_rate_percent,
        }
    }

    /// Load a stored invoice for editing. Items get fresh synthetic ids.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            number: invoice.number.clone(),
            date: invoice.date,
            customer: invoice.customer.clone(),
            work_location: invoice.work_location.clone(),
            items: invoice.items.iter().map(LineItem::rekeyed).collect(),
            tax_rate_percent: invoice.tax_rate_percent,
        }
    }

    pub fn add_item(&mut self, input: LineItemInput) -> ItemId {
        let item = LineItem::new(input);
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn update_item(&mut self, id: ItemId, input: LineItemInput) -> Result<(), InvoicingError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(InvoicingError::ItemNotFound(id))?;
        item.update(input);
        Ok(())
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<LineItem, InvoicingError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(InvoicingError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Copy a customer record into the draft by value.
    pub fn apply_customer(&mut self, customer: &Customer) {
        self.customer = CustomerSnapshot::from(customer);
    }

    pub fn apply_work_location(&mut self, location: &WorkLocation) {
        self.work_location = WorkLocationSnapshot::from(location);
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.items, self.tax_rate_percent)
    }
}
