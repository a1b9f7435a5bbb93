//! Section/subsection state carried across the whole document.

use tracing::{debug, info};

use super::rules::headings::{clean_heading, is_major_section};
use crate::models::record::SectionState;

/// How a heading changed the section state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionChange {
    /// New top-level section; the subsection was reset.
    Section(String),
    /// New subsection within the current section.
    Subsection(String),
}

/// Tracks the current section and subsection.
///
/// Only headings move the state. It is never reset between pages, since
/// sections routinely continue over several pages.
#[derive(Debug, Clone, Default)]
pub struct SectionTracker {
    state: SectionState,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume tracking from an existing state.
    pub fn from_state(state: SectionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SectionState {
        &self.state
    }

    pub fn into_state(self) -> SectionState {
        self.state
    }

    /// Apply a line already classified as a heading.
    pub fn apply_heading(&mut self, line: &str) -> SectionChange {
        let label = clean_heading(line);

        if is_major_section(label) || self.state.current_section.is_empty() {
            self.state.current_section = label.to_string();
            self.state.current_subsection.clear();
            info!("Section: {}", label);
            SectionChange::Section(label.to_string())
        } else {
            self.state.current_subsection = label.to_string();
            debug!("Subsection: {}", label);
            SectionChange::Subsection(label.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_then_subsection() {
        let mut tracker = SectionTracker::new();
        tracker.apply_heading("BOILERS0");
        tracker.apply_heading("Combi Natural Gas0");

        assert_eq!(tracker.state(), &SectionState::new("BOILERS", "Combi Natural Gas"));
    }

    #[test]
    fn test_first_heading_always_starts_section() {
        let mut tracker = SectionTracker::new();
        let change = tracker.apply_heading("Radiator Valves");

        assert_eq!(change, SectionChange::Section("Radiator Valves".to_string()));
        assert_eq!(tracker.state().current_subsection, "");
    }

    #[test]
    fn test_major_marker_resets_subsection() {
        let mut tracker = SectionTracker::from_state(SectionState::new("BOILERS", "Combi LPG"));
        let change = tracker.apply_heading("Smart / Hive0");

        assert_eq!(change, SectionChange::Section("Smart / Hive".to_string()));
        assert_eq!(tracker.into_state(), SectionState::new("Smart / Hive", ""));
    }

    #[test]
    fn test_subsections_replace_each_other() {
        let mut tracker = SectionTracker::new();
        tracker.apply_heading("BOILERS");
        tracker.apply_heading("Combi LPG");
        let change = tracker.apply_heading("System Natural Gas0");

        assert_eq!(change, SectionChange::Subsection("System Natural Gas".to_string()));
        assert_eq!(tracker.state(), &SectionState::new("BOILERS", "System Natural Gas"));
    }
}
