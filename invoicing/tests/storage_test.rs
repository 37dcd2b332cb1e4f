//! Persistence tests for invoicing: file store, reload and quota handling.

mod common;

use common::{TestBook, TEST_CUSTOMER, TEST_LOCATION};
use invoicing::models::{BusinessInfo, CustomerInput, Settings, WorkLocationInput};
use invoicing::services::{FileStore, InvoiceBook, KeyValueStore, MemoryStore, StorageKey};
use invoicing::{InvoicingError, StorageError};
use rust_decimal_macros::dec;
use std::{fs, io};
use tempfile::TempDir;

/// Memory store that refuses to delete one key.
#[derive(Debug)]
struct StuckKeyStore {
    inner: MemoryStore,
    stuck: StorageKey,
}

impl KeyValueStore for StuckKeyStore {
    fn load(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.inner.save(key, value)
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        if key == self.stuck {
            return Err(StorageError::Io {
                key,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.inner.remove(key)
    }
}

fn open_file_book(dir: &TempDir) -> InvoiceBook<FileStore> {
    let store = FileStore::open(dir.path()).unwrap();
    InvoiceBook::open(store).unwrap()
}

#[test]
fn empty_store_opens_with_defaults() {
    let dir = TempDir::new().unwrap();
    let book = open_file_book(&dir);

    assert!(book.customers().is_empty());
    assert!(book.work_locations().is_empty());
    assert!(book.invoices().is_empty());
    assert_eq!(book.settings(), &Settings::default());
    assert_eq!(book.editing(), None);
}

#[test]
fn file_store_round_trips_every_collection() {
    let dir = TempDir::new().unwrap();
    let mut book = open_file_book(&dir);

    let customer_id = book.add_customer(CustomerInput::named(TEST_CUSTOMER)).unwrap().id;
    book.add_work_location(WorkLocationInput::named(TEST_LOCATION))
        .unwrap();
    book.update_invoice_settings(dec!(7.25), "HV-").unwrap();

    let mut draft = book.new_draft(common::test_date());
    let customer = book.customer(customer_id).unwrap().clone();
    draft.apply_customer(&customer);
    draft.work_location.name = TEST_LOCATION.to_string();
    draft.add_item(common::item("Compressor", 1, dec!(899.99)));
    let invoice = book.finalize(&draft).unwrap().invoice;
    book.save_draft(&draft).unwrap();

    let reopened = open_file_book(&dir);
    assert_eq!(reopened.customers(), book.customers());
    assert_eq!(reopened.work_locations(), book.work_locations());
    assert_eq!(reopened.invoices(), book.invoices());
    assert_eq!(reopened.settings(), book.settings());
    assert_eq!(reopened.invoice(invoice.id).unwrap().total, dec!(965.239275));
}

#[test]
fn stored_files_use_collection_names() {
    let dir = TempDir::new().unwrap();
    let mut book = open_file_book(&dir);
    book.add_customer(CustomerInput::named(TEST_CUSTOMER)).unwrap();

    assert!(dir.path().join("invoice_customers.json").exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupt_collection_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("invoice_customers.json"), "{not json").unwrap();

    let store = FileStore::open(dir.path()).unwrap();
    let result = InvoiceBook::open(store);
    assert!(matches!(
        result,
        Err(InvoicingError::Storage(StorageError::Corrupt {
            key: StorageKey::Customers,
            ..
        }))
    ));
}

#[test]
fn missing_settings_fields_take_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("invoice_settings.json"),
        r#"{"businessName":"Cool Air LLC"}"#,
    )
    .unwrap();

    let book = open_file_book(&dir);
    assert_eq!(book.settings().business_name, "Cool Air LLC");
    assert_eq!(book.settings().invoice_prefix, "INV-");
    assert_eq!(book.settings().default_tax_rate, dec!(0));
}

#[test]
fn stored_totals_are_recomputed_on_load() {
    let mut app = TestBook::new();
    app.finalize_for(TEST_CUSTOMER);
    let mut store = app.book.into_store();

    let text = store.load(StorageKey::Invoices).unwrap().unwrap();
    let mut invoices: serde_json::Value = serde_json::from_str(&text).unwrap();
    invoices[0]["total"] = serde_json::json!("9999.99");
    invoices[0]["items"][0]["amount"] = serde_json::json!("1.00");
    store
        .save(StorageKey::Invoices, &invoices.to_string())
        .unwrap();

    let book = InvoiceBook::open(store).unwrap();
    let invoice = &book.invoices()[0];
    assert_eq!(invoice.total, dec!(118.80));
    assert_eq!(invoice.items[0].amount(), dec!(30.00));
}

#[test]
fn quota_failure_keeps_the_in_memory_change() {
    let mut app = TestBook::with_store(MemoryStore::with_quota(16));

    let result = app.book.add_customer(CustomerInput::named(TEST_CUSTOMER));
    assert!(matches!(
        result,
        Err(InvoicingError::Storage(StorageError::QuotaExceeded {
            key: StorageKey::Customers,
            ..
        }))
    ));
    assert_eq!(app.book.customers().len(), 1);
    assert_eq!(app.book.store().used_bytes(), 0);

    // Once space is available the next write persists everything.
    app.book.store_mut().set_quota(None);
    app.book.add_customer(CustomerInput::named("Second")).unwrap();
    let reopened = InvoiceBook::open(app.book.into_store()).unwrap();
    assert_eq!(reopened.customers().len(), 2);
}

#[test]
fn clear_all_removes_stored_data() {
    let dir = TempDir::new().unwrap();
    let mut book = open_file_book(&dir);
    book.add_customer(CustomerInput::named(TEST_CUSTOMER)).unwrap();
    book.update_business_info(BusinessInfo {
        name: "Cool Air LLC".to_string(),
        ..BusinessInfo::default()
    })
    .unwrap();

    book.clear_all().unwrap();
    assert!(book.customers().is_empty());
    assert_eq!(book.settings(), &Settings::default());

    let reopened = open_file_book(&dir);
    assert!(reopened.customers().is_empty());
    assert_eq!(reopened.settings().business_name, "HVAC Services Inc.");
}

#[test]
fn failed_clear_leaves_everything_in_place() {
    let store = StuckKeyStore {
        inner: MemoryStore::new(),
        stuck: StorageKey::Invoices,
    };
    let mut book = InvoiceBook::open(store).unwrap();
    book.add_customer(CustomerInput::named(TEST_CUSTOMER)).unwrap();
    book.add_work_location(WorkLocationInput::named(TEST_LOCATION))
        .unwrap();
    book.update_invoice_settings(dec!(8), "HV-").unwrap();

    let result = book.clear_all();
    assert!(matches!(
        result,
        Err(InvoicingError::Storage(StorageError::Io {
            key: StorageKey::Invoices,
            ..
        }))
    ));
    assert_eq!(book.customers().len(), 1);
    assert_eq!(book.settings().invoice_prefix, "HV-");

    let reopened = InvoiceBook::open(book.into_store()).unwrap();
    assert_eq!(reopened.customers().len(), 1);
    assert_eq!(reopened.work_locations().len(), 1);
    assert_eq!(reopened.settings().invoice_prefix, "HV-");
}

#[test]
fn stats_count_records_and_bytes() {
    let mut app = TestBook::new();
    app.book.update_invoice_settings(dec!(8), "INV-").unwrap();
    app.add_customer(TEST_CUSTOMER);
    app.add_location(TEST_LOCATION);
    app.finalize_for(TEST_CUSTOMER);

    let stats = app.book.stats().unwrap();
    assert_eq!(stats.customers, 1);
    assert_eq!(stats.work_locations, 1);
    assert_eq!(stats.invoices, 1);
    assert_eq!(stats.storage_bytes, app.book.store().used_bytes());
}
