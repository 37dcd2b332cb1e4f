//! Whole-data-set export and import.

use super::book::{to_json, InvoiceBook};
use crate::error::InvoicingError;
use crate::models::{Customer, Invoice, Settings, WorkLocation};
use crate::services::store::{KeyValueStore, StorageKey};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

pub const EXPORT_VERSION: &str = "1.0";

/// Backup document written by [`InvoiceBook::export`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub customers: Vec<Customer>,
    pub work_locations: Vec<WorkLocation>,
    pub invoices: Vec<Invoice>,
    pub settings: Settings,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportBundle {
    pub fn to_json_pretty(&self) -> Result<String, InvoicingError> {
        serde_json::to_string_pretty(self).map_err(InvoicingError::Export)
    }
}

/// Import-side view of a backup: every section may be missing or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportBundle {
    customers: Option<Vec<Customer>>,
    work_locations: Option<Vec<WorkLocation>>,
    invoices: Option<Vec<Invoice>>,
    settings: Option<Settings>,
}

/// Record counts after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub customers: usize,
    pub work_locations: usize,
    pub invoices: usize,
}

/// `invoice-backup-M-D-YYYY.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!(
        "invoice-backup-{}-{}-{}.json",
        date.month(),
        date.day(),
        date.year()
    )
}

impl<S: KeyValueStore> InvoiceBook<S> {
    pub fn export(&self, now: DateTime<Utc>) -> ExportBundle {
        ExportBundle {
            customers: self.customers.clone(),
            work_locations: self.work_locations.clone(),
            invoices: self.invoices.clone(),
            settings: self.settings.clone(),
            export_date: now,
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Replace every collection with the contents of a backup.
    ///
    /// The whole document is parsed before anything changes. A parse failure,
    /// or a storage failure on any key, leaves the book and the store
    /// untouched. Missing sections import as empty (settings as defaults).
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn import(&mut self, text: &str) -> Result<ImportSummary, InvoicingError> {
        let bundle: ImportBundle = serde_json::from_str(text).map_err(|e| {
            warn!(error = %e, "Rejected import");
            InvoicingError::ImportFormat(e.to_string())
        })?;

        let customers = bundle.customers.unwrap_or_default();
        let work_locations = bundle.work_locations.unwrap_or_default();
        let mut invoices = bundle.invoices.unwrap_or_default();
        let settings = bundle.settings.unwrap_or_default();
        for invoice in &mut invoices {
            invoice.recompute();
        }

        // Nothing in the session changes unless every collection is stored.
        let batch = [
            (StorageKey::Customers, Some(to_json(StorageKey::Customers, &customers)?)),
            (StorageKey::WorkLocations, Some(to_json(StorageKey::WorkLocations, &work_locations)?)),
            (StorageKey::Invoices, Some(to_json(StorageKey::Invoices, &invoices)?)),
            (StorageKey::Settings, Some(to_json(StorageKey::Settings, &settings)?)),
        ];
        self.write_batch(&batch)?;

        self.customers = customers;
        self.work_locations = work_locations;
        self.invoices = invoices;
        self.settings = settings;
        self.editing = None;

        let summary = ImportSummary {
            customers: self.customers.len(),
            work_locations: self.work_locations.len(),
            invoices: self.invoices.len(),
        };
        info!(
            customers = summary.customers,
            work_locations = summary.work_locations,
            invoices = summary.invoices,
            "Data imported"
        );
        Ok(summary)
    }
}
