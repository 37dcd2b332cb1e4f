//! The invoicing session: collections, settings and the edit pointer.

use crate::error::{InvoicingError, StorageError};
use crate::models::{
    BusinessInfo, BusinessProfile, Customer, Invoice, InvoiceId, Settings, WorkLocation,
};
use crate::services::store::{KeyValueStore, StorageKey};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Owns every collection and writes them through an injected store.
///
/// Mutations change the in-memory state first and then persist the affected
/// collection. If the write fails the error is returned but the in-memory
/// change stays, so the session remains the source of truth until the next
/// successful write. Whole-data-set replacements (`import`, `clear_all`) are
/// the exception: they change nothing unless every key is written.
#[derive(Debug)]
pub struct InvoiceBook<S: KeyValueStore> {
    pub(crate) customers: Vec<Customer>,
    pub(crate) work_locations: Vec<WorkLocation>,
    pub(crate) invoices: Vec<Invoice>,
    pub(crate) settings: Settings,
    pub(crate) editing: Option<InvoiceId>,
    pub(crate) store: S,
}

/// Record counts and the size of the serialized data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookStats {
    pub customers: usize,
    pub work_locations: usize,
    pub invoices: usize,
    pub storage_bytes: usize,
}

fn load_key<T, S>(store: &S, key: StorageKey) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    match store.load(key)? {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StorageError::Corrupt { key, source }),
        None => Ok(None),
    }
}

pub(crate) fn to_json<T: Serialize + ?Sized>(key: StorageKey, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Serialize { key, source })
}

impl<S: KeyValueStore> InvoiceBook<S> {
    /// Load all four collections. Absent keys start empty (settings start at
    /// their defaults).
    #[instrument(skip(store))]
    pub fn open(store: S) -> Result<Self, InvoicingError> {
        let customers = load_key(&store, StorageKey::Customers)?.unwrap_or_default();
        let work_locations = load_key(&store, StorageKey::WorkLocations)?.unwrap_or_default();
        let mut invoices: Vec<Invoice> =
            load_key(&store, StorageKey::Invoices)?.unwrap_or_default();
        let settings = load_key(&store, StorageKey::Settings)?.unwrap_or_default();

        for invoice in &mut invoices {
            invoice.recompute();
        }

        let book = Self {
            customers,
            work_locations,
            invoices,
            settings,
            editing: None,
            store,
        };
        info!(
            customers = book.customers.len(),
            work_locations = book.work_locations.len(),
            invoices = book.invoices.len(),
            "Invoice book opened"
        );
        Ok(book)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn work_locations(&self) -> &[WorkLocation] {
        &self.work_locations
    }

    /// Invoices, most recent first.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn business_profile(&self) -> BusinessProfile {
        BusinessProfile::from(&self.settings)
    }

    /// The invoice currently loaded into a draft for editing.
    pub fn editing(&self) -> Option<InvoiceId> {
        self.editing
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    #[instrument(skip(self, business))]
    pub fn update_business_info(
        &mut self,
        business: BusinessInfo,
    ) -> Result<&Settings, InvoicingError> {
        self.settings.apply_business_info(business);
        self.persist(StorageKey::Settings)?;
        info!(business_name = %self.settings.business_name, "Business information updated");
        Ok(&self.settings)
    }

    /// Update the default tax rate and the numbering prefix. A negative rate
    /// is stored as 0.
    #[instrument(skip(self))]
    pub fn update_invoice_settings(
        &mut self,
        default_tax_rate: Decimal,
        invoice_prefix: &str,
    ) -> Result<&Settings, InvoicingError> {
        self.settings.default_tax_rate = default_tax_rate.max(Decimal::ZERO);
        self.settings.invoice_prefix = invoice_prefix.trim().to_string();
        self.persist(StorageKey::Settings)?;
        info!(
            default_tax_rate = %self.settings.default_tax_rate,
            invoice_prefix = %self.settings.invoice_prefix,
            "Invoice settings updated"
        );
        Ok(&self.settings)
    }

    /// Wipe the store and reset every collection and the settings.
    ///
    /// Either every key is removed or, on failure, the store and the session
    /// are left as they were.
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) -> Result<(), InvoicingError> {
        let batch: Vec<(StorageKey, Option<String>)> =
            StorageKey::ALL.into_iter().map(|key| (key, None)).collect();
        self.write_batch(&batch)?;

        self.customers.clear();
        self.work_locations.clear();
        self.invoices.clear();
        self.settings = Settings::default();
        self.editing = None;
        info!("All data cleared");
        Ok(())
    }

    pub fn stats(&self) -> Result<BookStats, InvoicingError> {
        let storage_bytes = StorageKey::ALL
            .into_iter()
            .map(|key| self.serialize(key).map(|text| text.len()))
            .sum::<Result<usize, StorageError>>()?;
        Ok(BookStats {
            customers: self.customers.len(),
            work_locations: self.work_locations.len(),
            invoices: self.invoices.len(),
            storage_bytes,
        })
    }

    fn serialize(&self, key: StorageKey) -> Result<String, StorageError> {
        match key {
            StorageKey::Customers => to_json(key, &self.customers),
            StorageKey::WorkLocations => to_json(key, &self.work_locations),
            StorageKey::Invoices => to_json(key, &self.invoices),
            StorageKey::Settings => to_json(key, &self.settings),
        }
    }

    /// Write one collection through to the store.
    pub(crate) fn persist(&mut self, key: StorageKey) -> Result<(), StorageError> {
        let text = self.serialize(key)?;
        self.store.save(key, &text).map_err(|e| {
            warn!(key = %key, error = %e, "Failed to persist collection");
            e
        })
    }

    /// Apply a set of writes (`None` removes the key) as a unit.
    ///
    /// The previous text of every key is read before anything is written. If
    /// a write fails, the keys already written are put back in reverse order
    /// and the original error is returned.
    pub(crate) fn write_batch(
        &mut self,
        batch: &[(StorageKey, Option<String>)],
    ) -> Result<(), StorageError> {
        let previous = batch
            .iter()
            .map(|(key, _)| self.store.load(*key))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, (key, value)) in batch.iter().enumerate() {
            let result = match value {
                Some(text) => self.store.save(*key, text),
                None => self.store.remove(*key),
            };
            if let Err(e) = result {
                warn!(key = %key, error = %e, "Batch write failed, restoring previous data");
                for (written, before) in batch[..index].iter().zip(&previous[..index]).rev() {
                    self.restore(written.0, before.as_deref());
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn restore(&mut self, key: StorageKey, text: Option<&str>) {
        let result = match text {
            Some(text) => self.store.save(key, text),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            warn!(key = %key, error = %e, "Failed to restore collection");
        }
    }
}
