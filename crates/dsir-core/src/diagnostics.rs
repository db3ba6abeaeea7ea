//! Injected diagnostics
//!
//! A conversion never logs through global state of its own: the caller
//! hands in a [`DiagnosticSink`]. [`TracingSink`] forwards to `tracing`,
//! [`CollectingSink`] keeps everything for inspection.

use crate::error::NodeIssue;
use crate::walker::WalkStats;
use std::fmt::{self, Display, Formatter};

/// Stage of a single conversion run
///
/// Runs move strictly forward: `Start → Walking → Collecting → Assembling → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConversionPhase {
    /// Input accepted, roots selected
    Start,
    /// Walker driving extraction, interning and node building
    Walking,
    /// Image references being projected out of the built tree
    Collecting,
    /// Final envelope being put together
    Assembling,
    /// Output ready
    Done,
}

impl ConversionPhase {
    /// Phase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Walking => "walking",
            Self::Collecting => "collecting",
            Self::Assembling => "assembling",
            Self::Done => "done",
        }
    }
}

impl Display for ConversionPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Walker counters
    pub walk: WalkStats,
    /// Distinct style records
    pub styles: usize,
    /// Image references handed off
    pub images: usize,
}

/// Receiver of recoverable issues and phase transitions
pub trait DiagnosticSink {
    /// A node-local problem was recovered from
    fn issue(&mut self, issue: NodeIssue);

    /// The conversion entered `phase`
    fn phase(&mut self, _phase: ConversionPhase) {}

    /// The conversion completed
    fn finished(&mut self, _summary: &ConversionSummary) {}
}

/// Sink that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn issue(&mut self, issue: NodeIssue) {
        tracing::warn!("{}", issue);
    }

    fn phase(&mut self, phase: ConversionPhase) {
        tracing::debug!("Conversion phase: {}", phase);
    }

    fn finished(&mut self, summary: &ConversionSummary) {
        tracing::info!(
            nodes = summary.walk.visited,
            malformed = summary.walk.skipped_malformed,
            hidden = summary.walk.skipped_hidden,
            truncated = summary.walk.truncated,
            styles = summary.styles,
            images = summary.images,
            "Conversion complete"
        );
    }
}

/// Sink that records everything it receives
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Issues in report order
    pub issues: Vec<NodeIssue>,
    /// Phases in entry order
    pub phases: Vec<ConversionPhase>,
    /// Summary of the last completed run
    pub summary: Option<ConversionSummary>,
}

impl CollectingSink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn issue(&mut self, issue: NodeIssue) {
        self.issues.push(issue);
    }

    fn phase(&mut self, phase: ConversionPhase) {
        self.phases.push(phase);
    }

    fn finished(&mut self, summary: &ConversionSummary) {
        self.summary = Some(*summary);
    }
}
