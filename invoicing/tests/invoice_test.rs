//! Invoice validation, totals and search tests for invoicing.

mod common;

use common::{item, test_date, TestBook, TEST_CUSTOMER, TEST_LOCATION};
use invoicing::models::{CustomerInput, DraftInvoice, InvoiceStatus};
use invoicing::services::validate;
use invoicing::ValidationError;
use rust_decimal_macros::dec;

#[test]
fn validation_reports_first_violated_rule() {
    let mut draft = DraftInvoice::new("", test_date(), dec!(0));
    assert_eq!(validate(&draft), Err(ValidationError::MissingCustomerName));

    draft.customer.name = TEST_CUSTOMER.to_string();
    assert_eq!(validate(&draft), Err(ValidationError::MissingWorkLocation));

    draft.work_location.name = TEST_LOCATION.to_string();
    assert_eq!(validate(&draft), Err(ValidationError::NoItems));

    draft.add_item(item("Labor", 1, dec!(80)));
    assert_eq!(validate(&draft), Err(ValidationError::MissingNumber));

    draft.number = "INV-0001".to_string();
    assert_eq!(validate(&draft), Ok(()));
}

#[test]
fn whitespace_only_fields_count_as_missing() {
    let app = TestBook::new();
    let mut draft = app.draft_for("   ");
    assert_eq!(validate(&draft), Err(ValidationError::MissingCustomerName));

    draft.customer.name = TEST_CUSTOMER.to_string();
    draft.number = " \t".to_string();
    assert_eq!(validate(&draft), Err(ValidationError::MissingNumber));
}

#[test]
fn validation_messages_match_prompts() {
    assert_eq!(
        ValidationError::MissingCustomerName.to_string(),
        "Please enter customer name"
    );
    assert_eq!(
        ValidationError::NoItems.to_string(),
        "Please add at least one item"
    );
}

#[test]
fn finalized_totals_are_consistent() {
    let mut app = TestBook::new();
    let invoice = app.finalize_for(TEST_CUSTOMER).invoice;

    assert_eq!(invoice.subtotal, dec!(110.00));
    assert_eq!(invoice.tax_amount, dec!(8.80));
    assert_eq!(invoice.total, dec!(118.80));
    assert_eq!(invoice.total, invoice.subtotal + invoice.tax_amount);
    let sum: rust_decimal::Decimal = invoice.items.iter().map(|i| i.amount()).sum();
    assert_eq!(invoice.subtotal, sum);
}

#[test]
fn invoice_serializes_with_flat_snapshot_fields() {
    let mut app = TestBook::new();
    let invoice = app.finalize_for(TEST_CUSTOMER).invoice;
    let json = serde_json::to_value(&invoice).unwrap();

    assert_eq!(json["customerName"], TEST_CUSTOMER);
    assert_eq!(json["workLocationName"], TEST_LOCATION);
    assert_eq!(json["status"], "completed");
    assert!(json.get("taxRate").is_some());
    assert!(json.get("pdfGenerated").is_some());
    assert!(json.get("updatedAt").is_none());
    assert_eq!(json["items"][0]["price"], "15.00");
}

#[test]
fn customer_changes_do_not_alter_invoice_snapshots() {
    let mut app = TestBook::new();
    let customer_id = app.add_customer(TEST_CUSTOMER);

    let mut draft = app.draft_for("placeholder");
    let customer = app.book.customer(customer_id).unwrap().clone();
    draft.apply_customer(&customer);
    let invoice = app.book.finalize(&draft).unwrap().invoice;

    app.book
        .update_customer(customer_id, CustomerInput::named("Jane Smith"))
        .unwrap();
    app.book.delete_customer(customer_id).unwrap();

    let stored = app.book.invoice(invoice.id).unwrap();
    assert_eq!(stored.customer.name, TEST_CUSTOMER);
    assert_eq!(stored.customer.phone.as_deref(), Some("(555) 010-2030"));
    assert_eq!(stored.customer.address.as_deref(), Some("42 Elm Street"));
}

#[test]
fn search_matches_number_customer_and_location() {
    let mut app = TestBook::new();
    app.finalize_for("Jane Doe");
    app.finalize_for("Acme Storage");
    let draft = app.save_draft_for("Jane Doe");

    assert_eq!(app.book.search("jane", None).len(), 2);
    assert_eq!(app.book.search("ACME", None).len(), 1);
    assert_eq!(app.book.search("inv-0002", None).len(), 1);
    assert_eq!(app.book.search("riverside", None).len(), 3);
    assert_eq!(app.book.search("", None).len(), 3);
    assert!(app.book.search("nobody", None).is_empty());

    // Most recent first.
    let all = app.book.search("", None);
    assert_eq!(all[0].id, draft.id);
    assert_eq!(all[0].status, InvoiceStatus::Draft);
}

#[test]
fn search_customer_filter_is_exact() {
    let mut app = TestBook::new();
    app.finalize_for("Jane Doe");
    app.finalize_for("Jane Doe Jr.");

    let found = app.book.search("", Some("Jane Doe"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].customer.name, "Jane Doe");

    assert!(app.book.search("0001", Some("Jane Doe Jr.")).is_empty());
}
