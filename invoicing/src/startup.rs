use crate::cli::{
    Command, Confirm, CustomerCommand, CustomerFields, InvoiceCommand, InvoiceFields,
    LocationCommand, LocationFields, SettingsCommand,
};
use crate::config::InvoicingConfig;
use crate::error::InvoicingError;
use crate::models::{
    CustomerInput, CustomerSnapshot, DraftInvoice, Invoice, LineItem, WorkLocationInput,
    WorkLocationSnapshot,
};
use crate::render::text::{format_date, format_money, format_rate};
use crate::render::RenderedDocument;
use crate::services::{backup_file_name, parse_tax_rate, FileStore, InvoiceBook, KeyValueStore};
use chrono::{Local, Utc};
use service_core::error::AppError;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// A configured invoice book plus the directory documents are written to.
pub struct Application<S: KeyValueStore> {
    book: InvoiceBook<S>,
    output_dir: PathBuf,
}

impl Application<FileStore> {
    pub fn build(config: &InvoicingConfig) -> Result<Self, AppError> {
        let store = FileStore::open(&config.data_dir).map_err(|e| {
            tracing::error!(
                "Failed to open data directory {}: {}",
                config.data_dir.display(),
                e
            );
            AppError::StorageError(anyhow::Error::new(e))
        })?;
        let book = InvoiceBook::open(store)?;
        Ok(Self::new(book, config.output_dir.clone()))
    }
}

fn require(confirm: Confirm, action: &str) -> Result<(), AppError> {
    if confirm.yes {
        Ok(())
    } else {
        Err(AppError::BadRequest(anyhow::anyhow!(
            "{} cannot be undone; pass --yes to confirm",
            action
        )))
    }
}

fn customer_input(fields: CustomerFields) -> CustomerInput {
    CustomerInput {
        name: fields.name,
        phone: fields.phone,
        email: fields.email,
        address: fields.address,
    }
}

fn location_input(fields: LocationFields) -> WorkLocationInput {
    WorkLocationInput {
        name: fields.name,
        address: fields.address,
        city: fields.city,
        state: fields.state,
        zip: fields.zip,
    }
}

impl<S: KeyValueStore> Application<S> {
    pub fn new(book: InvoiceBook<S>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            book,
            output_dir: output_dir.into(),
        }
    }

    pub fn book(&self) -> &InvoiceBook<S> {
        &self.book
    }

    /// Execute one command, writing human-readable results to `out`.
    pub fn run(&mut self, command: Command, out: &mut impl Write) -> Result<(), AppError> {
        match command {
            Command::Customer(cmd) => self.customer(cmd, out),
            Command::Location(cmd) => self.location(cmd, out),
            Command::Invoice(cmd) => self.invoice(cmd, out),
            Command::Settings(cmd) => self.settings(cmd, out),
            Command::Export { out: path } => {
                let now = Utc::now();
                let json = self.book.export(now).to_json_pretty()?;
                let path = match path {
                    Some(path) => path,
                    None => {
                        fs::create_dir_all(&self.output_dir)?;
                        self.output_dir
                            .join(backup_file_name(now.with_timezone(&Local).date_naive()))
                    }
                };
                fs::write(&path, json)?;
                writeln!(out, "Exported to {}", path.display())?;
                Ok(())
            }
            Command::Import { file, confirm } => {
                require(confirm, "Importing a backup")?;
                let text = fs::read_to_string(&file)?;
                let summary = self.book.import(&text)?;
                writeln!(
                    out,
                    "Imported {} customers, {} work locations, {} invoices",
                    summary.customers, summary.work_locations, summary.invoices
                )?;
                Ok(())
            }
            Command::Clear { confirm } => {
                require(confirm, "Clearing all data")?;
                self.book.clear_all()?;
                writeln!(out, "All data has been cleared.")?;
                Ok(())
            }
            Command::Stats => {
                let stats = self.book.stats()?;
                writeln!(out, "Customers:      {}", stats.customers)?;
                writeln!(out, "Work locations: {}", stats.work_locations)?;
                writeln!(out, "Invoices:       {}", stats.invoices)?;
                writeln!(out, "Storage used:   {:.1} KB", stats.storage_bytes as f64 / 1024.0)?;
                Ok(())
            }
        }
    }

    fn customer(&mut self, cmd: CustomerCommand, out: &mut impl Write) -> Result<(), AppError> {
        match cmd {
            CustomerCommand::Add(fields) => {
                let customer = self.book.add_customer(customer_input(fields))?;
                writeln!(out, "Added customer {}: {}", customer.id, customer.name)?;
            }
            CustomerCommand::Update { id, fields } => {
                let customer = self.book.update_customer(id, customer_input(fields))?;
                writeln!(out, "Updated customer {}: {}", customer.id, customer.name)?;
            }
            CustomerCommand::List => {
                if self.book.customers().is_empty() {
                    writeln!(out, "No customers saved")?;
                }
                for c in self.book.customers() {
                    writeln!(
                        out,
                        "{:>4}  {}  {}  {}",
                        c.id,
                        c.name,
                        c.phone.as_deref().unwrap_or("-"),
                        c.email.as_deref().unwrap_or("-")
                    )?;
                }
            }
            CustomerCommand::Delete { id, confirm } => {
                require(confirm, "Deleting a customer")?;
                let removed = self.book.delete_customer(id)?;
                writeln!(out, "Deleted customer {}: {}", removed.id, removed.name)?;
            }
        }
        Ok(())
    }

    fn location(&mut self, cmd: LocationCommand, out: &mut impl Write) -> Result<(), AppError> {
        match cmd {
            LocationCommand::Add(fields) => {
                let location = self.book.add_work_location(location_input(fields))?;
                writeln!(out, "Added work location {}: {}", location.id, location.name)?;
            }
            LocationCommand::Update { id, fields } => {
                let location = self.book.update_work_location(id, location_input(fields))?;
                writeln!(out, "Updated work location {}: {}", location.id, location.name)?;
            }
            LocationCommand::List => {
                if self.book.work_locations().is_empty() {
                    writeln!(out, "No work locations saved")?;
                }
                for l in self.book.work_locations() {
                    let place = [&l.address, &l.city, &l.state, &l.zip]
                        .into_iter()
                        .filter_map(|part| part.as_deref())
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(out, "{:>4}  {}  {}", l.id, l.name, place)?;
                }
            }
            LocationCommand::Delete { id, confirm } => {
                require(confirm, "Deleting a work location")?;
                let removed = self.book.delete_work_location(id)?;
                writeln!(out, "Deleted work location {}: {}", removed.id, removed.name)?;
            }
        }
        Ok(())
    }

    /// Apply command-line fields on top of a draft.
    fn fill_draft(&self, draft: &mut DraftInvoice, fields: InvoiceFields) -> Result<(), AppError> {
        if let Some(id) = fields.customer {
            let customer = self
                .book
                .customer(id)
                .ok_or(InvoicingError::CustomerNotFound(id))?;
            draft.apply_customer(customer);
        } else if let Some(name) = fields.customer_name {
            draft.customer = CustomerSnapshot {
                name,
                ..CustomerSnapshot::default()
            };
        }

        if let Some(id) = fields.location {
            let location = self
                .book
                .work_location(id)
                .ok_or(InvoicingError::WorkLocationNotFound(id))?;
            draft.apply_work_location(location);
        } else if let Some(name) = fields.location_name {
            draft.work_location = WorkLocationSnapshot {
                name,
                ..WorkLocationSnapshot::default()
            };
        }

        if !fields.items.is_empty() {
            draft.items = fields.items.into_iter().map(LineItem::new).collect();
        }
        if let Some(rate) = fields.tax_rate {
            draft.tax_rate_percent = parse_tax_rate(&rate);
        }
        if let Some(number) = fields.number {
            draft.number = number;
        }
        if let Some(date) = fields.date {
            draft.date = date;
        }
        Ok(())
    }

    fn write_document(&self, document: &RenderedDocument) -> Result<PathBuf, AppError> {
        let bytes = document.to_pdf()?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&document.file_name);
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), "Document written");
        Ok(path)
    }

    fn invoice(&mut self, cmd: InvoiceCommand, out: &mut impl Write) -> Result<(), AppError> {
        match cmd {
            InvoiceCommand::New { fields, draft: as_draft } => {
                let mut draft = self.book.new_draft(Local::now().date_naive());
                self.fill_draft(&mut draft, fields)?;
                if as_draft {
                    let invoice = self.book.save_draft(&draft)?;
                    writeln!(out, "Draft saved: {} ({})", invoice.number, invoice.id)?;
                } else {
                    let finalized = self.book.finalize(&draft)?;
                    let path = self.write_document(&finalized.document)?;
                    print_summary(out, &finalized.invoice)?;
                    writeln!(out, "Written to {}", path.display())?;
                }
            }
            InvoiceCommand::Edit {
                id,
                fields,
                no_render,
            } => {
                let mut draft = self.book.begin_edit(id)?;
                if let Err(e) = self.fill_draft(&mut draft, fields) {
                    self.book.cancel_edit();
                    return Err(e);
                }
                let result = if no_render {
                    self.book
                        .update_invoice(&draft)
                        .map(|invoice| (invoice.clone(), None))
                } else {
                    self.book
                        .finalize(&draft)
                        .map(|f| (f.invoice, Some(f.document)))
                };
                let (invoice, document) = match result {
                    Ok(done) => done,
                    Err(e) => {
                        self.book.cancel_edit();
                        return Err(e.into());
                    }
                };
                print_summary(out, &invoice)?;
                if let Some(document) = document {
                    let path = self.write_document(&document)?;
                    writeln!(out, "Written to {}", path.display())?;
                }
            }
            InvoiceCommand::List { search, customer } => {
                let found = self.book.search(&search, customer.as_deref());
                if found.is_empty() {
                    writeln!(out, "No invoices found")?;
                }
                for inv in found {
                    writeln!(
                        out,
                        "{}  {}  {:<10}  {:<24}  {:<24}  {:>10}  {}",
                        inv.id,
                        inv.number,
                        format_date(inv.date),
                        inv.customer.name,
                        inv.work_location.name,
                        format_money(inv.total),
                        inv.status
                    )?;
                }
            }
            InvoiceCommand::Show { id } => {
                let invoice = self
                    .book
                    .invoice(id)
                    .ok_or(InvoicingError::InvoiceNotFound(id))?;
                print_summary(out, invoice)?;
                for item in &invoice.items {
                    writeln!(
                        out,
                        "  {} x {} @ {} = {}",
                        item.quantity(),
                        item.description,
                        format_money(item.unit_price()),
                        format_money(item.amount())
                    )?;
                }
            }
            InvoiceCommand::Render { id } => {
                let document = self.book.render_invoice(id)?;
                let path = self.write_document(&document)?;
                writeln!(out, "Written to {}", path.display())?;
            }
            InvoiceCommand::Share { id } => {
                // No share facility on a terminal: fall back to saving the file.
                let request = self.book.render_invoice(id)?.share_request()?;
                fs::create_dir_all(&self.output_dir)?;
                let path = self.output_dir.join(&request.file_name);
                fs::write(&path, &request.bytes)?;
                writeln!(out, "{}", request.title)?;
                writeln!(out, "{}", request.text)?;
                writeln!(
                    out,
                    "Saved {} ({}) to {}",
                    request.file_name,
                    request.mime_type,
                    path.display()
                )?;
            }
            InvoiceCommand::Delete { id, confirm } => {
                require(confirm, "Deleting an invoice")?;
                let removed = self.book.delete_invoice(id)?;
                writeln!(out, "Deleted invoice {}", removed.number)?;
            }
            InvoiceCommand::NextNumber => {
                writeln!(out, "{}", self.book.next_invoice_number())?;
            }
        }
        Ok(())
    }

    fn settings(&mut self, cmd: SettingsCommand, out: &mut impl Write) -> Result<(), AppError> {
        match cmd {
            SettingsCommand::Show => {}
            SettingsCommand::Business {
                name,
                slogan,
                address,
                phone,
                email,
                tax_id,
            } => {
                let mut business = self.book.settings().business_info();
                let updates = [
                    (&mut business.name, name),
                    (&mut business.slogan, slogan),
                    (&mut business.address, address),
                    (&mut business.phone, phone),
                    (&mut business.email, email),
                    (&mut business.tax_id, tax_id),
                ];
                for (field, value) in updates {
                    if let Some(value) = value {
                        *field = value;
                    }
                }
                self.book.update_business_info(business)?;
            }
            SettingsCommand::Invoice {
                default_tax_rate,
                prefix,
            } => {
                let current = self.book.settings();
                let rate = default_tax_rate
                    .as_deref()
                    .map(parse_tax_rate)
                    .unwrap_or(current.default_tax_rate);
                let prefix = prefix.unwrap_or_else(|| current.invoice_prefix.clone());
                self.book.update_invoice_settings(rate, &prefix)?;
            }
        }

        let s = self.book.settings();
        writeln!(out, "Business name:    {}", s.business_name)?;
        writeln!(out, "Slogan:           {}", s.business_slogan)?;
        writeln!(out, "Address:          {}", s.business_address)?;
        writeln!(out, "Phone:            {}", s.business_phone)?;
        writeln!(out, "Email:            {}", s.business_email)?;
        writeln!(out, "Tax ID:           {}", s.business_tax_id)?;
        writeln!(out, "Default tax rate: {}%", s.default_tax_rate)?;
        writeln!(out, "Invoice prefix:   {}", s.invoice_prefix)?;
        Ok(())
    }
}

fn print_summary(out: &mut impl Write, invoice: &Invoice) -> std::io::Result<()> {
    writeln!(out, "Invoice {} ({})", invoice.number, invoice.status)?;
    writeln!(out, "  Date:          {}", format_date(invoice.date))?;
    writeln!(out, "  Customer:      {}", invoice.customer.name)?;
    writeln!(out, "  Work location: {}", invoice.work_location.name)?;
    writeln!(out, "  Subtotal:      {}", format_money(invoice.subtotal))?;
    writeln!(
        out,
        "  Tax ({}%):      {}",
        format_rate(invoice.tax_rate_percent),
        format_money(invoice.tax_amount)
    )?;
    writeln!(out, "  Total:         {}", format_money(invoice.total))?;
    Ok(())
}
