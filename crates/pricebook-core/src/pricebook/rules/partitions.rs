//! Partition rule table.
//!
//! Rule order is significant: every routing tier walks the table top to
//! bottom and the first matching rule wins.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};
use crate::models::record::UNCLASSIFIED;

/// One named output partition and the labels that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRule {
    /// Output partition identifier.
    pub name: String,

    /// Section headings that select this partition.
    #[serde(default)]
    pub section_labels: Vec<String>,

    /// Subsection headings that narrow (tier 1) or select (tier 2) this partition.
    #[serde(default)]
    pub subsection_labels: Vec<String>,

    /// Subsection substrings that select this partition as a last resort.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PartitionRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section_labels: Vec::new(),
            subsection_labels: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn sections(mut self, labels: &[&str]) -> Self {
        self.section_labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn subsections(mut self, labels: &[&str]) -> Self {
        self.subsection_labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Ordered list of partition rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRuleTable {
    pub rules: Vec<PartitionRule>,
}

impl PartitionRuleTable {
    /// Create a table from rules, validating it.
    pub fn new(rules: Vec<PartitionRule>) -> std::result::Result<Self, RuleError> {
        let table = Self { rules };
        table.validate()?;
        Ok(table)
    }

    /// The built-in table for the manual price book.
    pub fn builtin() -> Self {
        let rules = vec![
            PartitionRule::new("core_packs")
                .sections(&["Core Packs"])
                .subsections(&["Full System", "Part System"]),
            PartitionRule::new("electrics_and_waste")
                .sections(&[
                    "Electrics/Waste/Filling Loops/GDA/Remote PRVs",
                    "Electrics",
                    "Waste",
                ])
                .subsections(&["Electrics/Waste/Filling Loops/GDA/Remote PRVs"])
                .keywords(&["filling loop", "remote prv", "waste collection", "electrics"]),
            PartitionRule::new("controls_and_stats")
                .sections(&[
                    "Controls",
                    "Wiring Centres",
                    "Stats",
                    "Timers",
                    "Programmers",
                    "CO Alarms",
                ])
                .subsections(&["Controls ***UPGRADE ONLY JOBS"])
                .keywords(&["wiring", "stat", "timer", "programmer", "thermostat", "control"]),
            PartitionRule::new("smart_hive")
                .sections(&[
                    "Smart / Hive",
                    "Hive",
                    "Smart",
                    "Hive Active Heating",
                    "Hive additional Products",
                    "Hive View",
                    "Hive TRV",
                    "Hive Hubs",
                ])
                .subsections(&[
                    "Hive Active Heating",
                    "Hive TRV",
                    "Hive Hubs",
                    "Product Bundles",
                    "Frames and Stand",
                    "Boiler IQ",
                ])
                .keywords(&["hive", "boiler iq"]),
            PartitionRule::new("boilers_combi_ng")
                .sections(&["Boilers", "BOILERS"])
                .subsections(&["Combi Natural Gas"]),
            PartitionRule::new("boilers_combi_lpg")
                .sections(&["Boilers", "BOILERS"])
                .subsections(&["Combi LPG"]),
            PartitionRule::new("boilers_other")
                .sections(&["Boilers", "BOILERS"])
                .subsections(&[
                    "System",
                    "Regular",
                    "System Natural Gas",
                    "System LPG",
                    "Regular Natural Gas",
                    "Regular LPG",
                    "Conventional Natural Gas",
                    "Conventional LPG",
                ]),
            PartitionRule::new("heat_pumps_and_ashp_labour")
                .sections(&["Heat Pumps", "ASHP", "Air Source Heat Pump"])
                .subsections(&[
                    "Radiator Installation Packs",
                    "Radiator Installation Bundles",
                    "Fire, Flue Liner, & Multipoint Installation Packs",
                    "Radiator Accessories",
                ])
                .keywords(&["heat pump", "ashp", "arothem"]),
            PartitionRule::new("radiators_and_valves")
                .sections(&["Radiator Valves", "Myson Radiators", "Radiators", "Price Test"])
                .subsections(&[
                    "Radiator Valves",
                    "Powercleanse, Powerflush, Magnetic Filter, & Combisave",
                    "Stelrad Radiators",
                    "Myson Radiators",
                    "Radiator Placeholders",
                    "Classic Towel Warmers",
                ])
                .keywords(&["radiator", "powerflush", "stelrad", "myson", "towel warmer"]),
            PartitionRule::new("flues_worcester")
                .sections(&[
                    "Worcester Combi Conventional and System Boilers",
                    "Flues",
                    "Worcester Flues",
                    "BOILERS",
                ])
                .subsections(&[
                    "Flue Components",
                    "Flue Components Continued",
                    "Worcester 440CDi Highflow",
                    "Vaillant EcoTec",
                ])
                .keywords(&["flue", "plume", "elbow"]),
            PartitionRule::new("heat_pump_accessories")
                .sections(&["ASHP Accessories", "Trunking", "Insulation", "Mixergy", "Buffer Tanks"])
                .keywords(&["trunking", "insulation", "mixergy", "buffer tank"]),
            PartitionRule::new("extras_and_charges")
                .sections(&["Extras", "Delivery", "Assessment", "Premium Install"])
                .keywords(&["delivery charge", "assessment", "premium install", "cashback"]),
            PartitionRule::new("price_alignment").sections(&["Price Alignment"]),
        ];

        Self { rules }
    }

    /// Parse and validate a table from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check names are present, unique and not reserved, and every rule can match
    /// without any blank label matching everything.
    pub fn validate(&self) -> std::result::Result<(), RuleError> {
        let mut seen = HashSet::new();

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(RuleError::EmptyName(index));
            }
            if rule.name == UNCLASSIFIED {
                return Err(RuleError::ReservedName(rule.name.clone()));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(RuleError::DuplicateName(rule.name.clone()));
            }
            if rule.section_labels.is_empty()
                && rule.subsection_labels.is_empty()
                && rule.keywords.is_empty()
            {
                return Err(RuleError::NoMatchCriteria(rule.name.clone()));
            }
            if rule
                .section_labels
                .iter()
                .chain(&rule.subsection_labels)
                .chain(&rule.keywords)
                .any(|label| label.trim().is_empty())
            {
                return Err(RuleError::EmptyLabel(rule.name.clone()));
            }
        }

        Ok(())
    }

    /// Partition names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PartitionRuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricebookError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = PartitionRuleTable::builtin();
        assert_eq!(table.validate(), Ok(()));
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec![
                "core_packs",
                "electrics_and_waste",
                "controls_and_stats",
                "smart_hive",
                "boilers_combi_ng",
                "boilers_combi_lpg",
                "boilers_other",
                "heat_pumps_and_ashp_labour",
                "radiators_and_valves",
                "flues_worcester",
                "heat_pump_accessories",
                "extras_and_charges",
                "price_alignment",
            ]
        );
    }

    #[test]
    fn test_json_export_loads_back() {
        let table = PartitionRuleTable::builtin();
        let json = table.to_json_pretty().unwrap();
        assert_eq!(PartitionRuleTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_missing_label_lists_default_to_empty() {
        let table = PartitionRuleTable::from_json(
            r#"{"rules": [{"name": "misc", "keywords": ["sundry"]}]}"#,
        )
        .unwrap();
        assert!(table.rules[0].section_labels.is_empty());
        assert_eq!(table.rules[0].keywords, vec!["sundry".to_string()]);
    }

    #[test]
    fn test_validation_errors() {
        let dup = PartitionRuleTable::new(vec![
            PartitionRule::new("a").sections(&["A"]),
            PartitionRule::new("a").sections(&["B"]),
        ]);
        assert_eq!(dup.unwrap_err(), RuleError::DuplicateName("a".to_string()));

        let reserved = PartitionRuleTable::new(vec![PartitionRule::new(UNCLASSIFIED).sections(&["A"])]);
        assert!(matches!(reserved, Err(RuleError::ReservedName(_))));

        let empty = PartitionRuleTable::new(vec![PartitionRule::new(" ").sections(&["A"])]);
        assert_eq!(empty.unwrap_err(), RuleError::EmptyName(0));

        let inert = PartitionRuleTable::new(vec![PartitionRule::new("inert")]);
        assert_eq!(inert.unwrap_err(), RuleError::NoMatchCriteria("inert".to_string()));
    }

    #[test]
    fn test_blank_labels_rejected() {
        let blank_keyword = PartitionRuleTable::from_json(
            r#"{"rules": [{"name": "spares", "keywords": ["spare", ""]}]}"#,
        );
        assert!(matches!(
            blank_keyword,
            Err(PricebookError::Rules(RuleError::EmptyLabel(name))) if name == "spares"
        ));

        let blank_section =
            PartitionRuleTable::new(vec![PartitionRule::new("labour").sections(&["Labour", "  "])]);
        assert_eq!(blank_section.unwrap_err(), RuleError::EmptyLabel("labour".to_string()));
    }

    #[test]
    fn test_from_file_rejects_invalid_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"rules": [{"name": "unclassified", "keywords": ["x"]}]}"#)
            .unwrap();

        let err = PartitionRuleTable::from_file(&path).unwrap_err();
        assert!(matches!(err, PricebookError::Rules(RuleError::ReservedName(_))));
    }
}
