//! Item row parsing.

use rust_decimal::Decimal;
use tracing::trace;

use super::rules::patterns::{LEAD_TIME, is_component_id};
use super::rules::{FieldExtractor, PriceExtractor};
use crate::models::record::{PriceRecord, SectionState};

/// Parses candidate item rows into [`PriceRecord`]s.
///
/// A row reads `<component id> <description> £<price> ... <lead time>`.
/// Anything else is noise and yields `None`.
#[derive(Default)]
pub struct RowParser {
    price: PriceExtractor,
}

impl RowParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, line: &str, state: &SectionState) -> Option<PriceRecord> {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() < 3 {
            return None;
        }

        let component_id = tokens[0];
        if !is_component_id(component_id) {
            trace!("Rejected row, no component id: {}", line);
            return None;
        }

        let Some(price) = self.price.extract(line) else {
            trace!("Rejected row {}, no price", component_id);
            return None;
        };

        let selling_price_gbp = price.value.unwrap_or(Decimal::ZERO);
        if selling_price_gbp.is_zero() {
            trace!("Rejected row {}, zero price", component_id);
            return None;
        }

        let price_start = price.start().unwrap_or(line.len());
        let description = line
            .get(component_id.len()..price_start)
            .unwrap_or_default()
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'')
            .to_string();

        Some(PriceRecord {
            section: state.current_section.clone(),
            subsection: state.current_subsection.clone(),
            component_id: component_id.to_string(),
            description,
            selling_price_gbp,
            lead_time_days: lead_time(&tokens),
        })
    }
}

/// Lead time from the last token, or 0 when it is not a plain number.
///
/// Best effort: an unrelated trailing number is taken as the lead time.
fn lead_time(tokens: &[&str]) -> u32 {
    tokens
        .last()
        .filter(|last| LEAD_TIME.is_match(last))
        .and_then(|last| last.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn state() -> SectionState {
        SectionState::new("BOILERS", "Combi Natural Gas")
    }

    #[test]
    fn test_parse_full_row() {
        let parser = RowParser::new();
        let record = parser
            .parse("ABC123 Some description £1,234.56 14", &state())
            .unwrap();

        assert_eq!(
            record,
            PriceRecord {
                section: "BOILERS".to_string(),
                subsection: "Combi Natural Gas".to_string(),
                component_id: "ABC123".to_string(),
                description: "Some description".to_string(),
                selling_price_gbp: Decimal::from_str("1234.56").unwrap(),
                lead_time_days: 14,
            }
        );
    }

    #[test]
    fn test_too_few_tokens() {
        let parser = RowParser::new();
        assert_eq!(parser.parse("AB123 £10.00", &state()), None);
        assert_eq!(parser.parse("AB123", &state()), None);
        assert_eq!(parser.parse("", &state()), None);
    }

    #[test]
    fn test_rejects_bad_component_id() {
        let parser = RowParser::new();
        assert_eq!(parser.parse("ab123 Boiler £10.00 2", &state()), None);
        assert_eq!(parser.parse("Total for section £10.00 2", &state()), None);
    }

    #[test]
    fn test_rejects_missing_or_zero_price() {
        let parser = RowParser::new();
        assert_eq!(parser.parse("AB123 Boiler 10.00 2", &state()), None);
        assert_eq!(parser.parse("AB123 Boiler £0.00 2", &state()), None);
        assert_eq!(parser.parse("AB123 Boiler £, 2", &state()), None);
    }

    #[test]
    fn test_lead_time_defaults_to_zero() {
        let parser = RowParser::new();
        let record = parser.parse("AB123 Boiler £10.00 days", &state()).unwrap();
        assert_eq!(record.lead_time_days, 0);

        let record = parser.parse("AB123 Boiler £10.00", &state()).unwrap();
        assert_eq!(record.lead_time_days, 0);
    }

    #[test]
    fn test_lead_time_too_large_for_u32() {
        let parser = RowParser::new();
        let record = parser.parse("AB1 x £5.00 99999999999", &state()).unwrap();
        assert_eq!(record.lead_time_days, 0);

        let record = parser.parse("AB1 x £5.00 4294967295", &state()).unwrap();
        assert_eq!(record.lead_time_days, u32::MAX);
    }

    #[test]
    fn test_lead_time_ascii_digits_only() {
        let parser = RowParser::new();
        // Arabic-Indic digits
        let record = parser.parse("AB1 x £5.00 \u{0661}\u{0662}", &state()).unwrap();
        assert_eq!(record.lead_time_days, 0);
        assert!(!LEAD_TIME.is_match("\u{0661}\u{0662}"));
    }

    #[test]
    fn test_empty_description() {
        let parser = RowParser::new();
        let record = parser.parse("AB1 £5.00 3", &state()).unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.selling_price_gbp, Decimal::from(5));
        assert_eq!(record.lead_time_days, 3);
    }

    #[test]
    fn test_description_strips_quotes() {
        let parser = RowParser::new();
        let record = parser
            .parse("RAD600K \"Stelrad 600 x 1000\" £210.50 7", &state())
            .unwrap();
        assert_eq!(record.description, "Stelrad 600 x 1000");
        assert_eq!(record.selling_price_gbp, Decimal::from_str("210.50").unwrap());
    }

    #[test]
    fn test_first_price_wins() {
        let parser = RowParser::new();
        let record = parser
            .parse("AB123 Boiler £850 was £900 21", &state())
            .unwrap();
        assert_eq!(record.selling_price_gbp, Decimal::from(850));
        assert_eq!(record.description, "Boiler");
        assert_eq!(record.lead_time_days, 21);
    }

    #[test]
    fn test_section_copied_from_state() {
        let parser = RowParser::new();
        let record = parser
            .parse("AB1 Part £5.00 1", &SectionState::default())
            .unwrap();
        assert_eq!(record.section, "");
        assert_eq!(record.subsection, "");
    }
}
