//! Customer and work-location records.
//!
//! Invoices carry snapshots of these records, so nothing here ever touches
//! the invoice collection.

use super::book::InvoiceBook;
use crate::error::{InvoicingError, ValidationError};
use crate::models::{clean, Customer, CustomerInput, WorkLocation, WorkLocationInput};
use crate::services::store::{KeyValueStore, StorageKey};
use chrono::Utc;
use tracing::{info, instrument};

/// `max + 1`; imported data may already hold the largest possible id.
fn next_id(ids: impl Iterator<Item = u64>, kind: &'static str) -> Result<u64, InvoicingError> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(InvoicingError::IdsExhausted(kind))
}

fn required_name(name: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        Err(missing)
    } else {
        Ok(name.to_string())
    }
}

impl<S: KeyValueStore> InvoiceBook<S> {
    pub fn customer(&self, id: u64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn add_customer(&mut self, input: CustomerInput) -> Result<&Customer, InvoicingError> {
        let name = required_name(&input.name, ValidationError::MissingCustomerName)?;
        let id = next_id(self.customers.iter().map(|c| c.id), "customers")?;
        self.customers.push(Customer {
            id,
            name,
            phone: clean(input.phone),
            email: clean(input.email),
            address: clean(input.address),
            created: Utc::now(),
        });
        self.persist(StorageKey::Customers)?;
        info!(customer_id = id, "Customer added");
        self.customer(id).ok_or(InvoicingError::CustomerNotFound(id))
    }

    /// Replace the editable fields; `id` and `created` are kept.
    #[instrument(skip(self, input))]
    pub fn update_customer(
        &mut self,
        id: u64,
        input: CustomerInput,
    ) -> Result<&Customer, InvoicingError> {
        let name = required_name(&input.name, ValidationError::MissingCustomerName)?;
        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(InvoicingError::CustomerNotFound(id))?;
        customer.name = name;
        customer.phone = clean(input.phone);
        customer.email = clean(input.email);
        customer.address = clean(input.address);
        self.persist(StorageKey::Customers)?;
        info!(customer_id = id, "Customer updated");
        self.customer(id).ok_or(InvoicingError::CustomerNotFound(id))
    }

    #[instrument(skip(self))]
    pub fn delete_customer(&mut self, id: u64) -> Result<Customer, InvoicingError> {
        let index = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(InvoicingError::CustomerNotFound(id))?;
        let removed = self.customers.remove(index);
        self.persist(StorageKey::Customers)?;
        info!(customer_id = id, "Customer deleted");
        Ok(removed)
    }

    pub fn work_location(&self, id: u64) -> Option<&WorkLocation> {
        self.work_locations.iter().find(|l| l.id == id)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn add_work_location(
        &mut self,
        input: WorkLocationInput,
    ) -> Result<&WorkLocation, InvoicingError> {
        let name = required_name(&input.name, ValidationError::MissingWorkLocation)?;
        let id = next_id(self.work_locations.iter().map(|l| l.id), "work locations")?;
        self.work_locations.push(WorkLocation {
            id,
            name,
            address: clean(input.address),
            city: clean(input.city),
            state: clean(input.state),
            zip: clean(input.zip),
            created: Utc::now(),
        });
        self.persist(StorageKey::WorkLocations)?;
        info!(work_location_id = id, "Work location added");
        self.work_location(id)
            .ok_or(InvoicingError::WorkLocationNotFound(id))
    }

    #[instrument(skip(self, input))]
    pub fn update_work_location(
        &mut self,
        id: u64,
        input: WorkLocationInput,
    ) -> Result<&WorkLocation, InvoicingError> {
        let name = required_name(&input.name, ValidationError::MissingWorkLocation)?;
        let location = self
            .work_locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(InvoicingError::WorkLocationNotFound(id))?;
        location.name = name;
        location.address = clean(input.address);
        location.city = clean(input.city);
        location.state = clean(input.state);
        location.zip = clean(input.zip);
        self.persist(StorageKey::WorkLocations)?;
        info!(work_location_id = id, "Work location updated");
        self.work_location(id)
            .ok_or(InvoicingError::WorkLocationNotFound(id))
    }

    #[instrument(skip(self))]
    pub fn delete_work_location(&mut self, id: u64) -> Result<WorkLocation, InvoicingError> {
        let index = self
            .work_locations
            .iter()
            .position(|l| l.id == id)
            .ok_or(InvoicingError::WorkLocationNotFound(id))?;
        let removed = self.work_locations.remove(index);
        self.persist(StorageKey::WorkLocations)?;
        info!(work_location_id = id, "Work location deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_max_plus_one() {
        assert_eq!(next_id([].into_iter(), "customers").unwrap(), 1);
        assert_eq!(next_id([3, 1, 7].into_iter(), "customers").unwrap(), 8);
    }

    #[test]
    fn test_next_id_reports_exhaustion() {
        assert!(matches!(
            next_id([u64::MAX].into_iter(), "work locations"),
            Err(InvoicingError::IdsExhausted("work locations"))
        ));
    }
}
