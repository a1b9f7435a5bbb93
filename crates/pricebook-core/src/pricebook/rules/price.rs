//! Selling price extraction for price-list rows.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::GBP_AMOUNT;
use super::{ExtractionMatch, FieldExtractor};

/// Pound sterling price extractor.
pub struct PriceExtractor;

impl PriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = ExtractionMatch<Option<Decimal>>;

    /// First `£` amount on the line. The value is `None` when the matched
    /// digits do not form a number (e.g. `£,`).
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        GBP_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let amount = parse_gbp_amount(&caps[1]);
                Some(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Parse a sterling amount such as `1,234.56`, dropping thousands separators.
pub fn parse_gbp_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('£')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Format an amount with thousands separators (`£1,234.56`).
pub fn format_gbp_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}£{}.{}", sign, formatted, decimal_part)
}
