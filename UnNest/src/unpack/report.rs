//! Per-archive outcome reporting
//!
//! Every archive candidate the driver touches produces exactly one
//! [`ArchiveOutcome`]; the ordered stream of outcomes is the contract the
//! surrounding CLI renders. Dry-run produces the same stream as a real run.

use std::fmt;
use std::path::PathBuf;

/// Why an archive was skipped rather than extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The archive's identity was already processed in this run.
    AlreadyProcessed,
    /// The computed destination folder already exists.
    DestinationExists,
    /// The suffix is recognized but no decoder is compiled in.
    UnsupportedFormat,
    /// The recursion depth or total-archive cap was reached.
    LimitReached,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AlreadyProcessed => "already processed",
            Self::DestinationExists => "destination exists",
            Self::UnsupportedFormat => "format unsupported in this build",
            Self::LimitReached => "recursion limit reached",
        };
        f.write_str(text)
    }
}

/// Terminal status of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// Extracted and committed (or, in dry-run, would have been).
    Extracted {
        /// The destination folder the contents went to.
        destination: PathBuf,
    },
    /// Deliberately not extracted.
    Skipped(SkipReason),
    /// Validation or I/O failure; nothing was committed.
    Failed(String),
}

/// One archive's result within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// The archive path (the would-be path for dry-run nested discoveries).
    pub archive: PathBuf,
    /// What happened to it.
    pub status: ArchiveStatus,
}

/// Summary of a whole recursive run.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Ordered per-archive outcomes.
    pub outcomes: Vec<ArchiveOutcome>,
    /// Number of archives extracted.
    pub extracted: usize,
    /// Number of archives skipped.
    pub skipped: usize,
    /// Number of archives that failed.
    pub failed: usize,
}

impl UnpackReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome, updating the counters.
    pub fn record(&mut self, outcome: ArchiveOutcome) {
        match outcome.status {
            ArchiveStatus::Extracted { .. } => self.extracted += 1,
            ArchiveStatus::Skipped(_) => self.skipped += 1,
            ArchiveStatus::Failed(_) => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Whether the run finished without any failed archive.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
