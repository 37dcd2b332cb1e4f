//! Draft, finalize, edit and delete.

use super::book::InvoiceBook;
use super::numbering::next_number;
use super::validation::validate;
use crate::error::InvoicingError;
use crate::models::{DraftInvoice, Invoice, InvoiceId, InvoiceStatus};
use crate::render::{render, RenderedDocument};
use crate::services::store::{KeyValueStore, StorageKey};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};

/// A committed completed invoice and the document generated for it.
#[derive(Debug, Clone)]
pub struct FinalizedInvoice {
    pub invoice: Invoice,
    pub document: RenderedDocument,
}

fn build_invoice(
    draft: &DraftInvoice,
    id: InvoiceId,
    status: InvoiceStatus,
    created_at: DateTime<Utc>,
) -> Invoice {
    let mut invoice = Invoice {
        id,
        number: draft.number.trim().to_string(),
        date: draft.date,
        customer: draft.customer.clone(),
        work_location: draft.work_location.clone(),
        items: draft.items.clone(),
        tax_rate_percent: draft.tax_rate_percent,
        subtotal: Default::default(),
        tax_amount: Default::default(),
        total: Default::default(),
        status,
        created_at,
        pdf_generated: None,
        updated_at: None,
    };
    invoice.recompute();
    invoice
}

impl<S: KeyValueStore> InvoiceBook<S> {
    /// An empty draft carrying the next number and the default tax rate.
    pub fn new_draft(&self, date: NaiveDate) -> DraftInvoice {
        DraftInvoice::new(
            next_number(&self.settings.invoice_prefix, &self.invoices),
            date,
            self.settings.default_tax_rate,
        )
    }

    pub fn next_invoice_number(&self) -> String {
        next_number(&self.settings.invoice_prefix, &self.invoices)
    }

    /// Store the draft as a new record with status `draft`. Not available
    /// while an invoice is being edited; use [`Self::update_invoice`].
    #[instrument(skip(self, draft), fields(number = %draft.number))]
    pub fn save_draft(&mut self, draft: &DraftInvoice) -> Result<&Invoice, InvoicingError> {
        if let Some(id) = self.editing {
            return Err(InvoicingError::EditInProgress(id));
        }
        validate(draft)?;
        let invoice = build_invoice(draft, InvoiceId::new(), InvoiceStatus::Draft, Utc::now());
        let id = invoice.id;
        self.invoices.insert(0, invoice);
        self.persist(StorageKey::Invoices)?;
        info!(invoice_id = %id, "Draft saved");
        self.invoice(id).ok_or(InvoicingError::InvoiceNotFound(id))
    }

    /// Commit the draft as a completed invoice and generate its document.
    ///
    /// With an edit target the stored record is overwritten in place and keeps
    /// its id; otherwise a new record is prepended. Nothing is committed if
    /// validation, the number check or the edit-target lookup fails.
    #[instrument(skip(self, draft), fields(number = %draft.number, editing = ?self.editing))]
    pub fn finalize(&mut self, draft: &DraftInvoice) -> Result<FinalizedInvoice, InvoicingError> {
        validate(draft)?;

        let target = match self.editing {
            Some(id) => Some(
                self.invoices
                    .iter()
                    .position(|inv| inv.id == id)
                    .ok_or(InvoicingError::InvoiceNotFound(id))?,
            ),
            None => None,
        };
        self.ensure_number_free(draft.number.trim(), self.editing)?;

        let now = Utc::now();
        let mut invoice = match target {
            Some(index) => {
                let existing = &self.invoices[index];
                let mut invoice = build_invoice(
                    draft,
                    existing.id,
                    InvoiceStatus::Completed,
                    existing.created_at,
                );
                invoice.updated_at = Some(now);
                invoice
            }
            None => build_invoice(draft, InvoiceId::new(), InvoiceStatus::Completed, now),
        };
        invoice.pdf_generated = Some(now);

        let document = render(&invoice, &self.business_profile());

        match target {
            Some(index) => self.invoices[index] = invoice.clone(),
            None => self.invoices.insert(0, invoice.clone()),
        }
        self.editing = None;
        self.persist(StorageKey::Invoices)?;

        info!(
            invoice_id = %invoice.id,
            number = %invoice.number,
            status = %invoice.status,
            pages = document.pages.len(),
            "Invoice finalized"
        );
        Ok(FinalizedInvoice { invoice, document })
    }

    /// Overwrite the edit target with the draft, keeping its id and status.
    #[instrument(skip(self, draft), fields(number = %draft.number))]
    pub fn update_invoice(&mut self, draft: &DraftInvoice) -> Result<&Invoice, InvoicingError> {
        let id = self.editing.ok_or(InvoicingError::NotEditing)?;
        validate(draft)?;
        let index = self
            .invoices
            .iter()
            .position(|inv| inv.id == id)
            .ok_or(InvoicingError::InvoiceNotFound(id))?;

        let existing = &self.invoices[index];
        if existing.is_completed() {
            self.ensure_number_free(draft.number.trim(), Some(id))?;
        }
        let mut invoice = build_invoice(draft, id, existing.status, existing.created_at);
        invoice.pdf_generated = existing.pdf_generated;
        invoice.updated_at = Some(Utc::now());

        self.invoices[index] = invoice;
        self.editing = None;
        self.persist(StorageKey::Invoices)?;
        info!(invoice_id = %id, "Invoice updated");
        Ok(&self.invoices[index])
    }

    /// Load a stored invoice into a draft and make it the edit target.
    #[instrument(skip(self))]
    pub fn begin_edit(&mut self, id: InvoiceId) -> Result<DraftInvoice, InvoicingError> {
        let invoice = self.invoice(id).ok_or(InvoicingError::InvoiceNotFound(id))?;
        let draft = DraftInvoice::from_invoice(invoice);
        self.editing = Some(id);
        info!(invoice_id = %id, number = %draft.number, "Editing invoice");
        Ok(draft)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    #[instrument(skip(self))]
    pub fn delete_invoice(&mut self, id: InvoiceId) -> Result<Invoice, InvoicingError> {
        let index = self
            .invoices
            .iter()
            .position(|inv| inv.id == id)
            .ok_or(InvoicingError::InvoiceNotFound(id))?;
        let removed = self.invoices.remove(index);
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.persist(StorageKey::Invoices)?;
        info!(invoice_id = %id, number = %removed.number, "Invoice deleted");
        Ok(removed)
    }

    /// Case-insensitive substring match on number, customer name and work
    /// location name, optionally restricted to one exact customer name.
    /// Most recent first.
    pub fn search(&self, query: &str, customer: Option<&str>) -> Vec<&Invoice> {
        let needle = query.trim().to_lowercase();
        self.invoices
            .iter()
            .filter(|inv| {
                needle.is_empty()
                    || inv.number.to_lowercase().contains(&needle)
                    || inv.customer.name.to_lowercase().contains(&needle)
                    || inv.work_location.name.to_lowercase().contains(&needle)
            })
            .filter(|inv| customer.map_or(true, |name| inv.customer.name == name))
            .collect()
    }

    /// Regenerate the document for a stored invoice.
    pub fn render_invoice(&self, id: InvoiceId) -> Result<RenderedDocument, InvoicingError> {
        let invoice = self.invoice(id).ok_or(InvoicingError::InvoiceNotFound(id))?;
        Ok(render(invoice, &self.business_profile()))
    }

    fn ensure_number_free(
        &self,
        number: &str,
        except: Option<InvoiceId>,
    ) -> Result<(), InvoicingError> {
        let taken = self
            .invoices
            .iter()
            .any(|inv| inv.is_completed() && Some(inv.id) != except && inv.number == number);
        if taken {
            warn!(number, "Invoice number already in use");
            return Err(InvoicingError::DuplicateNumber(number.to_string()));
        }
        Ok(())
    }
}
