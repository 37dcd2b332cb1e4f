//! Invoice model for invoicing.

use super::{Customer, LineItem, WorkLocation};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(#[serde(deserialize_with = "super::record_id::deserialize")] pub Uuid);

impl InvoiceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for InvoiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Completed,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Completed => "completed",
        }
    }
}

impl Default for InvoiceStatus {
    /// Records written before statuses existed were all generated documents.
    fn default() -> Self {
        InvoiceStatus::Completed
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer fields copied into an invoice at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    #[serde(rename = "customerName", default)]
    pub name: String,
    #[serde(rename = "customerAddress", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "customerPhone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "customerEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Customer> for CustomerSnapshot {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            address: customer.address.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
        }
    }
}

/// Work-location fields copied into an invoice at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLocationSnapshot {
    #[serde(rename = "workLocationName", default)]
    pub name: String,
    #[serde(rename = "workLocationAddress", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "workLocationCity", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "workLocationState", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "workLocationZip", default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl From<&WorkLocation> for WorkLocationSnapshot {
    fn from(location: &WorkLocation) -> Self {
        Self {
            name: location.name.clone(),
            address: location.address.clone(),
            city: location.city.clone(),
            state: location.state.clone(),
            zip: location.zip.clone(),
        }
    }
}

/// A committed invoice record.
///
/// `subtotal`, `tax_amount` and `total` are derived from `items` and
/// `tax_rate_percent` whenever the record is written; they are stored so the
/// history list and export file carry them, not so they can drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub number: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub customer: CustomerSnapshot,
    #[serde(flatten)]
    pub work_location: WorkLocationSnapshot,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(rename = "taxRate", default)]
    pub tax_rate_percent: Decimal,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_generated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn is_completed(&self) -> bool {
        self.status == InvoiceStatus::Completed
    }

    /// Re-derive item amounts and invoice totals from their inputs. A negative
    /// tax rate is stored as 0.
    pub(crate) fn recompute(&mut self) {
        self.tax_rate_percent = self.tax_rate_percent.max(Decimal::ZERO);
        for item in &mut self.items {
            item.recompute();
        }
        let totals = crate::services::totals::Totals::compute(&self.items, self.tax_rate_percent);
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
    }

    /// `invoice-<number>.pdf`, with path separators in the number replaced.
    pub fn file_name(&self) -> String {
        let number: String = self
            .number
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
            .collect();
        format!("invoice-{}.pdf", number)
    }
}
