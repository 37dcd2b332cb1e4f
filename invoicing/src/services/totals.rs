//! Subtotal, tax and total derivation.

use crate::models::LineItem;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Derived invoice amounts. Values are exact; rounding happens only when a
/// figure is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// A negative rate is treated as zero.
    pub fn compute(items: &[LineItem], tax_rate_percent: Decimal) -> Self {
        let subtotal: Decimal = items.iter().map(LineItem::amount).sum();
        let rate = tax_rate_percent.max(Decimal::ZERO);
        let tax_amount = subtotal * rate / Decimal::ONE_HUNDRED;
        Self {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }
}

/// Lenient tax-rate entry: missing or non-numeric text is 0, negatives are 0.
pub fn parse_tax_rate(text: &str) -> Decimal {
    Decimal::from_str(text.trim())
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// Two decimal places, midpoint away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
