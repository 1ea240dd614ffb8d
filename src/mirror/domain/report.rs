//! Per-run reconciliation outcomes.

use serde::Serialize;
use std::fmt;

/// Sync state of one source record within a run.
///
/// Every record starts `Pending` and ends the run in exactly one of the
/// other states. Nothing is persisted between runs, so `attempts` counts
/// tries within the current run only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecordState {
    /// Not processed yet.
    Pending,
    /// Created or updated on the target side.
    Synced,
    /// Already up to date, or not eligible.
    Skipped,
    /// A remote call for this record failed.
    Failed {
        /// Tries made this run.
        attempts: u32,
    },
}

impl RecordState {
    /// Moves a pending record to `Synced`; settled states are kept.
    #[must_use]
    pub const fn synced(self) -> Self {
        match self {
            Self::Pending => Self::Synced,
            settled => settled,
        }
    }

    /// Moves a pending record to `Skipped`; settled states are kept.
    #[must_use]
    pub const fn skipped(self) -> Self {
        match self {
            Self::Pending => Self::Skipped,
            settled => settled,
        }
    }

    /// Records a failed try, counting repeats.
    #[must_use]
    pub const fn failed(self) -> Self {
        match self {
            Self::Failed { attempts } => Self::Failed {
                attempts: attempts.saturating_add(1),
            },
            Self::Pending | Self::Synced | Self::Skipped => Self::Failed { attempts: 1 },
        }
    }

    /// Returns `true` once the record left `Pending`.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One record that could not be synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    record: String,
    message: String,
}

impl ItemFailure {
    /// Creates a failure entry.
    #[must_use]
    pub fn new(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Returns the failing record's label.
    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.record, self.message)
    }
}

/// Final state of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// Record label.
    pub record: String,
    /// Final state.
    #[serde(flatten)]
    pub state: RecordState,
}

/// Counters and failures accumulated over one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    created: u32,
    updated: u32,
    skipped: u32,
    completed: u32,
    errors: Vec<ItemFailure>,
    records: Vec<RecordOutcome>,
}

impl SyncReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a created target.
    pub const fn record_created(&mut self) {
        self.created = self.created.saturating_add(1);
    }

    /// Counts an updated target.
    pub const fn record_updated(&mut self) {
        self.updated = self.updated.saturating_add(1);
    }

    /// Counts a skipped record.
    pub const fn record_skipped(&mut self) {
        self.skipped = self.skipped.saturating_add(1);
    }

    /// Counts a record driven to its terminal state.
    pub const fn record_completed(&mut self) {
        self.completed = self.completed.saturating_add(1);
    }

    /// Appends a per-item failure.
    pub fn record_error(&mut self, failure: ItemFailure) {
        self.errors.push(failure);
    }

    /// Stores the final state of one record.
    pub fn settle(&mut self, record: impl Into<String>, state: RecordState) {
        self.records.push(RecordOutcome {
            record: record.into(),
            state,
        });
    }

    /// Returns the number of created targets.
    #[must_use]
    pub const fn created(&self) -> u32 {
        self.created
    }

    /// Returns the number of updated targets.
    #[must_use]
    pub const fn updated(&self) -> u32 {
        self.updated
    }

    /// Returns the number of skipped records.
    #[must_use]
    pub const fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Returns the number of records driven to a terminal state.
    #[must_use]
    pub const fn completed(&self) -> u32 {
        self.completed
    }

    /// Returns the per-item failures.
    #[must_use]
    pub fn errors(&self) -> &[ItemFailure] {
        &self.errors
    }

    /// Returns the per-record final states in processing order.
    #[must_use]
    pub fn records(&self) -> &[RecordOutcome] {
        &self.records
    }

    /// Returns the final state recorded for `record`.
    #[must_use]
    pub fn state_of(&self, record: &str) -> Option<RecordState> {
        self.records
            .iter()
            .find(|outcome| outcome.record == record)
            .map(|outcome| outcome.state)
    }

    /// Returns `true` when no item failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} updated={} skipped={} completed={} errors={}",
            self.created,
            self.updated,
            self.skipped,
            self.completed,
            self.errors.len()
        )
    }
}
