//! Line stream orchestration.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::classifier::{LineClass, LineClassifier};
use super::router::{MatchTier, Router};
use super::row::RowParser;
use super::rules::PartitionRuleTable;
use super::tracker::{SectionChange, SectionTracker};
use crate::error::Result;
use crate::models::config::PricebookConfig;
use crate::models::record::{Partitions, RawLine, SectionState, UNCLASSIFIED};

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line or layout artifact.
    Skipped,
    /// Heading that moved the section state.
    Heading(SectionChange),
    /// Item row stored in a partition.
    Routed { partition: String, tier: MatchTier },
    /// Candidate row the parser rejected as noise.
    Rejected,
}

/// Line counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub lines: usize,
    pub skipped: usize,
    pub headings: usize,
    pub rejected: usize,
    pub records: usize,
}

/// Data-candidate lines read under one section state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    /// Section state in effect for every line of the span.
    pub state: SectionState,
    /// Candidate lines, in document order.
    pub lines: Vec<RawLine>,
}

/// Folds classifier, tracker, parser and router over a line stream.
///
/// The section state carries over between calls, so a document can be fed
/// page by page.
pub struct Pipeline {
    classifier: LineClassifier,
    tracker: SectionTracker,
    parser: RowParser,
    router: Router,
    partitions: Partitions,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(table: PartitionRuleTable) -> Self {
        Self::with_router(Router::new(&table))
    }

    pub fn with_router(router: Router) -> Self {
        Self {
            classifier: LineClassifier::new(),
            tracker: SectionTracker::new(),
            parser: RowParser::new(),
            router,
            partitions: Partitions::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Build a pipeline with the configured rule table.
    pub fn from_config(config: &PricebookConfig) -> Result<Self> {
        Ok(Self::new(config.rule_table()?))
    }

    pub fn section_state(&self) -> &SectionState {
        self.tracker.state()
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn partitions(&self) -> &Partitions {
        &self.partitions
    }

    /// Process a single line.
    pub fn process_line(&mut self, line: &RawLine) -> LineOutcome {
        self.stats.lines += 1;

        match self.classifier.classify(&line.text) {
            LineClass::Skip => {
                self.stats.skipped += 1;
                LineOutcome::Skipped
            }
            LineClass::Heading => {
                self.stats.headings += 1;
                LineOutcome::Heading(self.tracker.apply_heading(&line.text))
            }
            LineClass::DataCandidate => {
                let Some(record) = self.parser.parse(&line.text, self.tracker.state()) else {
                    self.stats.rejected += 1;
                    return LineOutcome::Rejected;
                };

                let found = self.router.resolve(&record.section, &record.subsection);
                log_route(line, &record.component_id, found.partition, found.tier);

                let outcome = LineOutcome::Routed {
                    partition: found.partition.to_string(),
                    tier: found.tier,
                };
                self.partitions.push(found.partition, record);
                self.stats.records += 1;
                outcome
            }
        }
    }

    /// Process lines strictly in order.
    pub fn process_lines<'a, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = &'a RawLine>,
    {
        for line in lines {
            self.process_line(line);
        }
    }

    /// Resolve section spans serially, then parse and route spans in parallel.
    ///
    /// Produces the same partitions as [`Pipeline::process_lines`].
    pub fn process_parallel(&mut self, lines: &[RawLine]) {
        let spans = split_spans(&self.classifier, &mut self.tracker, &mut self.stats, lines);
        debug!("Resolved {} section spans", spans.len());

        let parser = &self.parser;
        let router = &self.router;
        let routed: Vec<(Partitions, usize)> = spans
            .par_iter()
            .map(|span| route_span(parser, router, span))
            .collect();

        for (partitions, rejected) in routed {
            self.stats.rejected += rejected;
            self.stats.records += partitions.total_records();
            self.partitions.extend(partitions);
        }
    }

    /// Process lines, in parallel when `parallel` is set.
    pub fn process(&mut self, lines: &[RawLine], parallel: bool) {
        if parallel {
            self.process_parallel(lines);
        } else {
            self.process_lines(lines);
        }
    }

    /// Finish the run and hand over the partitions.
    pub fn finish(self) -> Partitions {
        let stats = &self.stats;
        info!(
            "Processed {} lines: {} headings, {} records in {} partitions ({} skipped, {} rejected)",
            stats.lines,
            stats.headings,
            stats.records,
            self.partitions.len(),
            stats.skipped,
            stats.rejected
        );

        let unclassified = self.partitions.unclassified_count();
        if unclassified > 0 {
            warn!("{} records could not be classified", unclassified);
        }

        self.partitions
    }
}

/// Split lines into spans of constant section state, from the tracker's current state.
///
/// Headings and skipped lines are consumed; only data candidates land in spans.
pub fn resolve_sections(lines: &[RawLine]) -> Vec<SectionSpan> {
    let mut tracker = SectionTracker::new();
    let mut stats = PipelineStats::default();
    split_spans(&LineClassifier::new(), &mut tracker, &mut stats, lines)
}

fn split_spans(
    classifier: &LineClassifier,
    tracker: &mut SectionTracker,
    stats: &mut PipelineStats,
    lines: &[RawLine],
) -> Vec<SectionSpan> {
    let mut spans = Vec::new();
    let mut current = SectionSpan {
        state: tracker.state().clone(),
        lines: Vec::new(),
    };

    for line in lines {
        stats.lines += 1;
        match classifier.classify(&line.text) {
            LineClass::Skip => stats.skipped += 1,
            LineClass::Heading => {
                stats.headings += 1;
                tracker.apply_heading(&line.text);
                let next = SectionSpan {
                    state: tracker.state().clone(),
                    lines: Vec::new(),
                };
                let done = std::mem::replace(&mut current, next);
                if !done.lines.is_empty() {
                    spans.push(done);
                }
            }
            LineClass::DataCandidate => current.lines.push(line.clone()),
        }
    }

    if !current.lines.is_empty() {
        spans.push(current);
    }

    spans
}

fn route_span(parser: &RowParser, router: &Router, span: &SectionSpan) -> (Partitions, usize) {
    let mut partitions = Partitions::new();
    let mut rejected = 0;

    for line in &span.lines {
        match parser.parse(&line.text, &span.state) {
            Some(record) => {
                let found = router.resolve(&record.section, &record.subsection);
                log_route(line, &record.component_id, found.partition, found.tier);
                partitions.push(found.partition, record);
            }
            None => rejected += 1,
        }
    }

    (partitions, rejected)
}

fn log_route(line: &RawLine, component_id: &str, partition: &str, tier: MatchTier) {
    if partition == UNCLASSIFIED {
        debug!(
            "Unclassified record {} at line {} (page {:?})",
            component_id, line.position, line.page
        );
    } else {
        trace!("{} -> {} ({:?})", component_id, partition, tier);
    }
}
