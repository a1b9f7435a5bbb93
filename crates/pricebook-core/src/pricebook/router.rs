//! Tiered routing of records into partitions.
//!
//! Tiers are evaluated strictly in order and the first match wins:
//!
//! 1. section + subsection: the rule's section labels must match, then its
//!    subsection labels (if it has any) must match too;
//! 2. subsection only, ignoring the section;
//! 3. keyword substring of the subsection.
//!
//! Nothing matching routes to [`UNCLASSIFIED`].

use serde::Serialize;

use super::rules::{PartitionRule, PartitionRuleTable};
use crate::models::record::{PriceRecord, UNCLASSIFIED};

/// Which routing tier produced a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    SectionAndSubsection,
    SubsectionOnly,
    Keyword,
    Fallback,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::SectionAndSubsection => "section_and_subsection",
            MatchTier::SubsectionOnly => "subsection_only",
            MatchTier::Keyword => "keyword",
            MatchTier::Fallback => "fallback",
        }
    }

    /// Matching tiers in evaluation order.
    pub const ORDER: [MatchTier; 3] = [
        MatchTier::SectionAndSubsection,
        MatchTier::SubsectionOnly,
        MatchTier::Keyword,
    ];
}

/// A routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteMatch<'a> {
    pub partition: &'a str,
    pub tier: MatchTier,
}

/// Rule with labels lowercased once up front.
#[derive(Debug, Clone)]
struct LoweredRule {
    name: String,
    sections: Vec<String>,
    subsections: Vec<String>,
    keywords: Vec<String>,
}

impl From<&PartitionRule> for LoweredRule {
    fn from(rule: &PartitionRule) -> Self {
        let lower = |labels: &[String]| -> Vec<String> {
            labels.iter().map(|l| l.to_lowercase()).collect()
        };
        Self {
            name: rule.name.clone(),
            sections: lower(&rule.section_labels),
            subsections: lower(&rule.subsection_labels),
            keywords: lower(&rule.keywords),
        }
    }
}

/// Maps `(section, subsection)` to a partition name.
///
/// Pure: the same pair always yields the same partition.
#[derive(Debug, Clone)]
pub struct Router {
    rules: Vec<LoweredRule>,
}

impl Router {
    pub fn new(table: &PartitionRuleTable) -> Self {
        Self {
            rules: table.rules.iter().map(LoweredRule::from).collect(),
        }
    }

    /// Partition name for a section/subsection pair.
    pub fn route(&self, section: &str, subsection: &str) -> &str {
        self.resolve(section, subsection).partition
    }

    pub fn route_record(&self, record: &PriceRecord) -> &str {
        self.route(&record.section, &record.subsection)
    }

    /// Partition name plus the tier that chose it.
    pub fn resolve(&self, section: &str, subsection: &str) -> RouteMatch<'_> {
        let section = section.to_lowercase();
        let subsection = subsection.to_lowercase();

        for tier in MatchTier::ORDER {
            if let Some(partition) = self.match_tier(tier, &section, &subsection) {
                return RouteMatch { partition, tier };
            }
        }

        RouteMatch {
            partition: UNCLASSIFIED,
            tier: MatchTier::Fallback,
        }
    }

    fn match_tier(&self, tier: MatchTier, section: &str, subsection: &str) -> Option<&str> {
        let found = match tier {
            MatchTier::SectionAndSubsection => self.rules.iter().find(|rule| {
                any_overlap(&rule.sections, section)
                    && (rule.subsections.is_empty() || any_overlap(&rule.subsections, subsection))
            }),
            MatchTier::SubsectionOnly => self.rules.iter().find(|rule| {
                !rule.subsections.is_empty() && any_overlap(&rule.subsections, subsection)
            }),
            MatchTier::Keyword => self.rules.iter().find(|rule| {
                rule.keywords.iter().any(|keyword| subsection.contains(keyword.as_str()))
            }),
            MatchTier::Fallback => None,
        };

        found.map(|rule| rule.name.as_str())
    }
}

/// Whether `text` contains, or is contained by, any label. Both sides lowercase.
///
/// An empty `text` is contained by every label.
fn any_overlap(labels: &[String], text: &str) -> bool {
    labels
        .iter()
        .any(|label| text.contains(label.as_str()) || label.contains(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new(&PartitionRuleTable::builtin())
    }

    #[test]
    fn test_combi_natural_gas_not_lpg() {
        let router = router();
        let found = router.resolve("Boilers", "Combi Natural Gas");
        assert_eq!(found.partition, "boilers_combi_ng");
        assert_eq!(found.tier, MatchTier::SectionAndSubsection);
        assert_eq!(router.route("BOILERS", "Combi LPG"), "boilers_combi_lpg");
        assert_eq!(router.route("BOILERS", "Regular LPG"), "boilers_other");
    }

    #[test]
    fn test_deterministic() {
        let router = router();
        for (section, subsection) in [
            ("Boilers", "Combi Natural Gas"),
            ("Smart / Hive", "Hive TRV"),
            ("Nothing", "Matches"),
        ] {
            assert_eq!(
                router.resolve(section, subsection),
                router.resolve(section, subsection)
            );
        }
    }

    #[test]
    fn test_rule_without_subsections_matches_on_section() {
        let router = router();
        let found = router.resolve("Price Alignment", "anything at all");
        assert_eq!(found.partition, "price_alignment");
        assert_eq!(found.tier, MatchTier::SectionAndSubsection);
    }

    #[test]
    fn test_section_match_falls_through_to_later_rule() {
        // BOILERS matches the three boiler rules by section but none of their
        // subsections; flues_worcester also lists BOILERS.
        let router = router();
        let found = router.resolve("BOILERS", "Flue Components");
        assert_eq!(found.partition, "flues_worcester");
        assert_eq!(found.tier, MatchTier::SectionAndSubsection);
    }

    #[test]
    fn test_hive_subsection_routes_to_smart_hive() {
        let router = router();

        let found = router.resolve("Miscellaneous", "Hive Hubs");
        assert_eq!(found.partition, "smart_hive");
        assert_eq!(found.tier, MatchTier::SubsectionOnly);

        let found = router.resolve("Miscellaneous", "New hive bundle");
        assert_eq!(found.partition, "smart_hive");
        assert_eq!(found.tier, MatchTier::Keyword);

        assert_eq!(router.route("BOILERS", "HIVE Active Heating"), "smart_hive");
    }

    #[test]
    fn test_hive_subsection_can_lose_to_earlier_matches() {
        let router = router();

        // "stat" belongs to controls_and_stats, which comes before smart_hive.
        let found = router.resolve("Misc", "Hive thermostat");
        assert_eq!(found.partition, "controls_and_stats");
        assert_eq!(found.tier, MatchTier::Keyword);

        // A tier 1 match on the section wins before subsections are looked at.
        let found = router.resolve("Price Alignment", "Hive");
        assert_eq!(found.partition, "price_alignment");
        assert_eq!(found.tier, MatchTier::SectionAndSubsection);
    }

    #[test]
    fn test_keyword_tier_uses_table_order() {
        let router = router();
        let found = router.resolve("Miscellaneous", "Wiring looms");
        assert_eq!(found.partition, "controls_and_stats");
        assert_eq!(found.tier, MatchTier::Keyword);
    }

    #[test]
    fn test_unmatched_is_unclassified() {
        let router = router();
        let found = router.resolve("Miscellaneous", "Sundries");
        assert_eq!(found.partition, UNCLASSIFIED);
        assert_eq!(found.tier, MatchTier::Fallback);
    }

    #[test]
    fn test_empty_section_matches_first_section_rule() {
        // Every label contains the empty string.
        let router = router();
        assert_eq!(router.route("", ""), "core_packs");
    }

    #[test]
    fn test_custom_table() {
        let table = PartitionRuleTable::new(vec![
            PartitionRule::new("spares").keywords(&["spare"]),
            PartitionRule::new("labour").sections(&["Labour"]),
        ])
        .unwrap();
        let router = Router::new(&table);

        assert_eq!(router.route("Labour", "Day rate"), "labour");
        assert_eq!(router.route("Other", "Spare parts"), "spares");
        assert_eq!(router.route("Other", "Day rate"), UNCLASSIFIED);
    }
}
