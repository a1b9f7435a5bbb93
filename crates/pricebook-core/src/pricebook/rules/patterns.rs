//! Common regex patterns for price-list lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Symbol that prefixes every selling price.
pub const CURRENCY_SYMBOL: char = '£';

lazy_static! {
    // Component identifier: AB123, X9, RAD600K
    pub static ref COMPONENT_ID: Regex = Regex::new(
        r"^[A-Z][A-Z0-9]*\d+[A-Z]?$"
    ).unwrap();

    // Selling price: £1,234.56 or £ 850
    pub static ref GBP_AMOUNT: Regex = Regex::new(
        r"£\s*([0-9,]+\.?\d*)"
    ).unwrap();

    // Trailing lead time in days
    pub static ref LEAD_TIME: Regex = Regex::new(
        r"^[0-9]+$"
    ).unwrap();
}

/// Whether `text` (trimmed) has the shape of a component identifier.
pub fn is_component_id(text: &str) -> bool {
    COMPONENT_ID.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id_shapes() {
        for id in ["AB123", "X9", "RAD600K", "A1B2C3", "  WB4000  "] {
            assert!(is_component_id(id), "{id} should be a component id");
        }
        for text in ["", "ABC", "ab123", "123", "AB123KK", "AB-123", "AB123 x"] {
            assert!(!is_component_id(text), "{text:?} should not be a component id");
        }
    }

    #[test]
    fn test_gbp_amount_captures_digits() {
        let caps = GBP_AMOUNT.captures("Boiler £ 1,234.56 14").unwrap();
        assert_eq!(&caps[1], "1,234.56");
        assert!(GBP_AMOUNT.captures("Boiler 1,234.56").is_none());
    }
}
