//! Common test utilities for invoicing integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use invoicing::models::{
    CustomerInput, DraftInvoice, Invoice, LineItemInput, WorkLocationInput,
};
use invoicing::services::{FinalizedInvoice, InvoiceBook, MemoryStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const TEST_CUSTOMER: &str = "Jane Doe";
pub const TEST_LOCATION: &str = "Riverside Warehouse";

/// An invoice book over an in-memory store.
pub struct TestBook {
    pub book: InvoiceBook<MemoryStore>,
}

impl TestBook {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self {
            book: InvoiceBook::open(store).expect("Failed to open invoice book"),
        }
    }

    /// A valid draft billed to `customer` with the Filter and Labor items.
    pub fn draft_for(&self, customer: &str) -> DraftInvoice {
        let mut draft = self.book.new_draft(test_date());
        draft.customer.name = customer.to_string();
        draft.work_location.name = TEST_LOCATION.to_string();
        draft.tax_rate_percent = dec!(8);
        draft.add_item(item("Filter", 2, dec!(15.00)));
        draft.add_item(item("Labor", 1, dec!(80.00)));
        draft
    }

    pub fn finalize_for(&mut self, customer: &str) -> FinalizedInvoice {
        let draft = self.draft_for(customer);
        self.book.finalize(&draft).expect("Failed to finalize invoice")
    }

    pub fn save_draft_for(&mut self, customer: &str) -> Invoice {
        let draft = self.draft_for(customer);
        self.book
            .save_draft(&draft)
            .expect("Failed to save draft")
            .clone()
    }

    pub fn add_customer(&mut self, name: &str) -> u64 {
        let input = CustomerInput {
            name: name.to_string(),
            phone: Some("(555) 010-2030".to_string()),
            email: Some("jane@example.com".to_string()),
            address: Some("42 Elm Street".to_string()),
        };
        self.book.add_customer(input).expect("Failed to add customer").id
    }

    pub fn add_location(&mut self, name: &str) -> u64 {
        let input = WorkLocationInput {
            name: name.to_string(),
            address: Some("9 Dock Road".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            zip: Some("62701".to_string()),
        };
        self.book
            .add_work_location(input)
            .expect("Failed to add work location")
            .id
    }
}

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
}

pub fn item(description: &str, quantity: u32, price: Decimal) -> LineItemInput {
    LineItemInput::new(description, quantity, price).expect("valid line item")
}
