//! Sequential invoice numbering.

use crate::models::{Invoice, DEFAULT_INVOICE_PREFIX};

/// Next number: prefix + (completed invoices + 1), zero-padded to four digits.
///
/// The number is not reserved, and deleting a completed invoice shifts the
/// sequence back, so uniqueness is checked again at finalize.
pub fn next_number(prefix: &str, invoices: &[Invoice]) -> String {
    let prefix = if prefix.trim().is_empty() {
        DEFAULT_INVOICE_PREFIX
    } else {
        prefix
    };
    let completed = invoices.iter().filter(|inv| inv.is_completed()).count();
    format!("{}{:04}", prefix, completed + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(next_number("INV-", &[]), "INV-0001");
    }

    #[test]
    fn test_empty_prefix_falls_back() {
        assert_eq!(next_number("", &[]), "INV-0001");
        assert_eq!(next_number("  ", &[]), "INV-0001");
    }

    #[test]
    fn test_custom_prefix_kept_verbatim() {
        assert_eq!(next_number("HV-2024/", &[]), "HV-2024/0001");
    }
}
