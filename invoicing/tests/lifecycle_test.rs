//! Invoice lifecycle tests for invoicing: draft, finalize, edit, delete.

mod common;

use common::{item, TestBook, TEST_CUSTOMER};
use invoicing::models::{InvoiceId, InvoiceStatus};
use invoicing::{InvoicingError, ValidationError};
use rust_decimal_macros::dec;
use std::collections::HashSet;

#[test]
fn save_draft_prepends_a_draft_record() {
    let mut app = TestBook::new();
    app.finalize_for("Earlier Customer");
    let draft = app.save_draft_for(TEST_CUSTOMER);

    assert_eq!(draft.status, InvoiceStatus::Draft);
    assert!(draft.pdf_generated.is_none());
    assert_eq!(app.book.invoices()[0].id, draft.id);
    assert_eq!(app.book.invoices().len(), 2);
}

#[test]
fn save_draft_validates() {
    let mut app = TestBook::new();
    let mut draft = app.draft_for(TEST_CUSTOMER);
    draft.items.clear();

    let result = app.book.save_draft(&draft);
    assert!(matches!(
        result,
        Err(InvoicingError::Validation(ValidationError::NoItems))
    ));
    assert!(app.book.invoices().is_empty());
}

#[test]
fn finalize_without_edit_target_creates_distinct_identities() {
    let mut app = TestBook::new();
    let ids: HashSet<InvoiceId> = (0..5).map(|_| app.finalize_for(TEST_CUSTOMER).invoice.id).collect();
    assert_eq!(ids.len(), 5);
    assert_eq!(app.book.invoices().len(), 5);
}

#[test]
fn finalize_marks_completed_and_returns_document() {
    let mut app = TestBook::new();
    let finalized = app.finalize_for(TEST_CUSTOMER);

    assert_eq!(finalized.invoice.status, InvoiceStatus::Completed);
    assert!(finalized.invoice.pdf_generated.is_some());
    assert!(finalized.invoice.updated_at.is_none());
    assert_eq!(finalized.document.title, "Invoice INV-0001");
    assert_eq!(finalized.document.file_name, "invoice-INV-0001.pdf");
    assert_eq!(app.book.invoice(finalized.invoice.id), Some(&finalized.invoice));
}

#[test]
fn finalize_with_edit_target_overwrites_in_place() {
    let mut app = TestBook::new();
    let original = app.finalize_for(TEST_CUSTOMER).invoice;
    app.finalize_for("Someone Else");

    let mut draft = app.book.begin_edit(original.id).unwrap();
    assert_eq!(app.book.editing(), Some(original.id));
    draft.add_item(item("Thermostat", 1, dec!(120.00)));

    let edited = app.book.finalize(&draft).unwrap().invoice;

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.number, original.number);
    assert_eq!(edited.created_at, original.created_at);
    assert!(edited.updated_at.is_some());
    assert_eq!(edited.subtotal, dec!(230.00));
    assert_eq!(app.book.editing(), None);
    assert_eq!(app.book.invoices().len(), 2);
    // Position in the list is kept.
    assert_eq!(app.book.invoices()[1].id, original.id);
}

#[test]
fn finalizing_an_edited_draft_completes_it() {
    let mut app = TestBook::new();
    let draft_record = app.save_draft_for(TEST_CUSTOMER);

    let draft = app.book.begin_edit(draft_record.id).unwrap();
    let completed = app.book.finalize(&draft).unwrap().invoice;

    assert_eq!(completed.id, draft_record.id);
    assert_eq!(completed.status, InvoiceStatus::Completed);
}

#[test]
fn begin_edit_rekeys_items() {
    let mut app = TestBook::new();
    let original = app.finalize_for(TEST_CUSTOMER).invoice;

    let draft = app.book.begin_edit(original.id).unwrap();

    assert_eq!(draft.items.len(), original.items.len());
    for (edited, stored) in draft.items.iter().zip(&original.items) {
        assert_ne!(edited.id, stored.id);
        assert_eq!(edited.description, stored.description);
        assert_eq!(edited.amount(), stored.amount());
    }
}

#[test]
fn begin_edit_unknown_invoice_fails() {
    let mut app = TestBook::new();
    let missing = InvoiceId::new();
    assert!(matches!(
        app.book.begin_edit(missing),
        Err(InvoicingError::InvoiceNotFound(id)) if id == missing
    ));
    assert_eq!(app.book.editing(), None);
}

#[test]
fn update_invoice_keeps_original_status() {
    let mut app = TestBook::new();
    let draft_record = app.save_draft_for(TEST_CUSTOMER);

    let mut draft = app.book.begin_edit(draft_record.id).unwrap();
    draft.tax_rate_percent = dec!(10);
    let updated = app.book.update_invoice(&draft).unwrap().clone();

    assert_eq!(updated.id, draft_record.id);
    assert_eq!(updated.status, InvoiceStatus::Draft);
    assert_eq!(updated.tax_amount, dec!(11.00));
    assert!(updated.updated_at.is_some());
    assert_eq!(app.book.editing(), None);
}

#[test]
fn update_invoice_requires_edit_target() {
    let mut app = TestBook::new();
    let draft = app.draft_for(TEST_CUSTOMER);
    assert!(matches!(
        app.book.update_invoice(&draft),
        Err(InvoicingError::NotEditing)
    ));
}

#[test]
fn cancel_edit_leaves_record_untouched() {
    let mut app = TestBook::new();
    let original = app.finalize_for(TEST_CUSTOMER).invoice;

    let mut draft = app.book.begin_edit(original.id).unwrap();
    draft.items.clear();
    app.book.cancel_edit();

    assert_eq!(app.book.editing(), None);
    assert_eq!(app.book.invoice(original.id), Some(&original));
}

#[test]
fn delete_clears_matching_edit_target() {
    let mut app = TestBook::new();
    let first = app.finalize_for(TEST_CUSTOMER).invoice;
    let second = app.finalize_for(TEST_CUSTOMER).invoice;

    app.book.begin_edit(first.id).unwrap();
    app.book.delete_invoice(second.id).unwrap();
    assert_eq!(app.book.editing(), Some(first.id));

    let removed = app.book.delete_invoice(first.id).unwrap();
    assert_eq!(removed.id, first.id);
    assert_eq!(app.book.editing(), None);
    assert!(app.book.invoices().is_empty());
}

#[test]
fn delete_unknown_invoice_fails() {
    let mut app = TestBook::new();
    app.finalize_for(TEST_CUSTOMER);
    assert!(matches!(
        app.book.delete_invoice(InvoiceId::new()),
        Err(InvoicingError::InvoiceNotFound(_))
    ));
    assert_eq!(app.book.invoices().len(), 1);
}

#[test]
fn finalize_rejects_number_of_another_completed_invoice() {
    let mut app = TestBook::new();
    let first = app.finalize_for(TEST_CUSTOMER).invoice;

    let mut draft = app.draft_for("Second Customer");
    draft.number = first.number.clone();

    let result = app.book.finalize(&draft);
    assert!(matches!(
        result,
        Err(InvoicingError::DuplicateNumber(ref n)) if *n == first.number
    ));
    assert_eq!(app.book.invoices().len(), 1);
}

#[test]
fn edited_invoice_may_keep_its_own_number() {
    let mut app = TestBook::new();
    let original = app.finalize_for(TEST_CUSTOMER).invoice;

    let draft = app.book.begin_edit(original.id).unwrap();
    assert_eq!(draft.number, original.number);
    assert!(app.book.finalize(&draft).is_ok());
}

#[test]
fn failed_finalize_keeps_edit_target() {
    let mut app = TestBook::new();
    let original = app.finalize_for(TEST_CUSTOMER).invoice;

    let mut draft = app.book.begin_edit(original.id).unwrap();
    draft.customer.name.clear();

    assert!(app.book.finalize(&draft).is_err());
    assert_eq!(app.book.editing(), Some(original.id));
    assert_eq!(app.book.invoice(original.id), Some(&original));
}

#[test]
fn save_draft_is_refused_while_editing() {
    let mut app = TestBook::new();
    let original = app.finalize_for(TEST_CUSTOMER).invoice;
    let draft = app.book.begin_edit(original.id).unwrap();

    let result = app.book.save_draft(&draft);
    assert!(matches!(result, Err(InvoicingError::EditInProgress(id)) if id == original.id));
    assert_eq!(app.book.invoices().len(), 1);
    assert_eq!(app.book.editing(), Some(original.id));

    app.book.cancel_edit();
    assert!(app.book.save_draft(&draft).is_ok());
    assert_eq!(app.book.invoices().len(), 2);
}

#[test]
fn negative_tax_rate_is_stored_as_zero() {
    let mut app = TestBook::new();
    let mut draft = app.draft_for(TEST_CUSTOMER);
    draft.tax_rate_percent = dec!(-5);

    let finalized = app.book.finalize(&draft).unwrap();
    assert_eq!(finalized.invoice.tax_rate_percent, dec!(0));
    assert_eq!(finalized.invoice.total, dec!(110.00));
    assert!(finalized.document.pages[0].contains_text("Tax (0%):"));
}
