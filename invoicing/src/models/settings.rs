//! Business profile and invoice defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUSINESS_NAME: &str = "HVAC Services Inc.";
pub const DEFAULT_BUSINESS_SLOGAN: &str = "Your Comfort is Our Priority";
pub const DEFAULT_BUSINESS_ADDRESS: &str = "123 Main Street, City, State 12345";
pub const DEFAULT_BUSINESS_PHONE: &str = "(555) 123-4567";
pub const DEFAULT_BUSINESS_EMAIL: &str = "info@hvacservices.com";
pub const DEFAULT_BUSINESS_TAX_ID: &str = "TAX-123456789";
pub const DEFAULT_INVOICE_PREFIX: &str = "INV-";

/// Persisted settings record. Missing fields take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub business_name: String,
    pub business_slogan: String,
    pub business_address: String,
    pub business_phone: String,
    pub business_email: String,
    pub business_tax_id: String,
    pub default_tax_rate: Decimal,
    pub invoice_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            business_slogan: DEFAULT_BUSINESS_SLOGAN.to_string(),
            business_address: DEFAULT_BUSINESS_ADDRESS.to_string(),
            business_phone: DEFAULT_BUSINESS_PHONE.to_string(),
            business_email: DEFAULT_BUSINESS_EMAIL.to_string(),
            business_tax_id: DEFAULT_BUSINESS_TAX_ID.to_string(),
            default_tax_rate: Decimal::ZERO,
            invoice_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
        }
    }
}

impl Settings {
    pub fn business_info(&self) -> BusinessInfo {
        BusinessInfo {
            name: self.business_name.clone(),
            slogan: self.business_slogan.clone(),
            address: self.business_address.clone(),
            phone: self.business_phone.clone(),
            email: self.business_email.clone(),
            tax_id: self.business_tax_id.clone(),
        }
    }

    pub(crate) fn apply_business_info(&mut self, info: BusinessInfo) {
        self.business_name = info.name.trim().to_string();
        self.business_slogan = info.slogan.trim().to_string();
        self.business_address = info.address.trim().to_string();
        self.business_phone = info.phone.trim().to_string();
        self.business_email = info.email.trim().to_string();
        self.business_tax_id = info.tax_id.trim().to_string();
    }
}

/// The editable business-information part of [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessInfo {
    pub name: String,
    pub slogan: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
}

/// Business details as printed on a document. Blank settings fall back to the
/// defaults so the header is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub name: String,
    pub slogan: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for BusinessProfile {
    fn from(settings: &Settings) -> Self {
        fn or_default(value: &str, default: &str) -> String {
            let value = value.trim();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        }

        Self {
            name: or_default(&settings.business_name, DEFAULT_BUSINESS_NAME),
            slogan: or_default(&settings.business_slogan, DEFAULT_BUSINESS_SLOGAN),
            address: or_default(&settings.business_address, DEFAULT_BUSINESS_ADDRESS),
            phone: or_default(&settings.business_phone, DEFAULT_BUSINESS_PHONE),
            email: or_default(&settings.business_email, DEFAULT_BUSINESS_EMAIL),
        }
    }
}
