//! Line item model for invoicing.

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of a line item within a draft or invoice.
///
/// Ids handed out by an edit session are synthetic: they only need to be
/// unique among the items of the draft being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(#[serde(deserialize_with = "super::record_id::deserialize")] pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Line item on an invoice.
///
/// `quantity` and `unit_price` are only reachable through [`LineItem::update`],
/// so `amount` always matches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub description: String,
    quantity: u32,
    #[serde(rename = "price")]
    unit_price: Decimal,
    #[serde(default)]
    amount: Decimal,
}

/// Validated input for creating or replacing a line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemInput {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItemInput {
    /// Check the "all fields required" rule.
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, ValidationError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity);
        }
        if unit_price <= Decimal::ZERO {
            return Err(ValidationError::InvalidUnitPrice);
        }
        Ok(Self {
            description,
            quantity,
            unit_price,
        })
    }

    /// Build from raw text fields. Non-integer quantities and non-numeric
    /// prices are rejected rather than coerced.
    pub fn parse(description: &str, quantity: &str, unit_price: &str) -> Result<Self, ValidationError> {
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidQuantity)?;
        let unit_price = Decimal::from_str(unit_price.trim())
            .map_err(|_| ValidationError::InvalidUnitPrice)?;
        Self::new(description, quantity, unit_price)
    }
}

impl FromStr for LineItemInput {
    type Err = ValidationError;

    /// Parse `description|quantity|price`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, '|');
        let price = parts.next().unwrap_or_default();
        let quantity = parts.next().ok_or(ValidationError::InvalidQuantity)?;
        let description = parts.next().ok_or(ValidationError::MissingDescription)?;
        Self::parse(description, quantity, price)
    }
}

impl LineItem {
    pub fn new(input: LineItemInput) -> Self {
        Self::with_id(ItemId::new(), input)
    }

    /// Validate the fields and create an item with a fresh identity.
    pub fn create(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, ValidationError> {
        LineItemInput::new(description, quantity, unit_price).map(Self::new)
    }

    fn with_id(id: ItemId, input: LineItemInput) -> Self {
        let amount = Decimal::from(input.quantity) * input.unit_price;
        Self {
            id,
            description: input.description,
            quantity: input.quantity,
            unit_price: input.unit_price,
            amount,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// quantity × unit price.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Replace every field but the identity.
    pub fn update(&mut self, input: LineItemInput) {
        *self = Self::with_id(self.id, input);
    }

    /// Clone with a fresh synthetic identity.
    pub fn rekeyed(&self) -> Self {
        Self {
            id: ItemId::new(),
            ..self.clone()
        }
    }

    /// Re-derive `amount` from its inputs. Used on data read back from storage
    /// or an import file, where the stored amount is not trusted.
    pub(crate) fn recompute(&mut self) {
        self.amount = Decimal::from(self.quantity) * self.unit_price;
    }
}
