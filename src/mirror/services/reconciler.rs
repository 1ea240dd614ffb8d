//! Batch reconciliation shared by every mirror direction.

use crate::mirror::{
    domain::{ItemFailure, LinkIndex, Linkable, RecordState, SyncReport},
    ports::RemoteResult,
};
use async_trait::async_trait;
use tracing::{info, warn};

/// One direction of mirroring: how source records become target records.
#[async_trait]
pub trait MirrorDirection: Send + Sync {
    /// Records read from the source system.
    type Source: Linkable + Send + Sync;
    /// Records held by the target system.
    type Target: Linkable + Send + Sync;

    /// Identifies a source record in logs and reports.
    fn record_label(&self, source: &Self::Source) -> String;

    /// Returns the title a created target would carry.
    fn title<'a>(&self, source: &'a Self::Source) -> &'a str;

    /// Returns `true` when the linked target is stale.
    fn needs_update(&self, target: &Self::Target, source: &Self::Source) -> bool;

    /// Creates the counterpart of an unlinked source record.
    async fn create(&self, source: &Self::Source) -> RemoteResult<Self::Target>;

    /// Re-sends the full desired field set to a stale target.
    async fn update(&self, target: &Self::Target, source: &Self::Source) -> RemoteResult<()>;

    /// Writes the new target's cross-reference back onto the source.
    async fn after_create(
        &self,
        _source: &Self::Source,
        _target: &Self::Target,
    ) -> RemoteResult<()> {
        Ok(())
    }
}

/// Link, detect, then create, update, or skip each record of a batch.
///
/// Records are processed one at a time in batch order. A failure is
/// recorded against its record and the batch continues.
#[derive(Debug, Clone)]
pub struct Reconciler<D> {
    direction: D,
}

impl<D: MirrorDirection> Reconciler<D> {
    /// Creates a reconciler for the given direction.
    #[must_use]
    pub const fn new(direction: D) -> Self {
        Self { direction }
    }

    /// Returns the direction.
    #[must_use]
    pub const fn direction(&self) -> &D {
        &self.direction
    }

    /// Reconciles `sources` against the targets in `index`.
    ///
    /// Every created target is added to `index`, so a record appearing
    /// twice in one batch links to the target created for its first
    /// appearance.
    pub async fn reconcile(
        &self,
        sources: &[D::Source],
        index: &mut LinkIndex<D::Target>,
    ) -> SyncReport {
        let mut report = SyncReport::new();
        for source in sources {
            let label = self.direction.record_label(source);
            let state = match index.link(source) {
                Some(target) => self.refresh(&label, target, source, &mut report).await,
                None => self.create(&label, source, index, &mut report).await,
            };
            report.settle(label, state);
        }
        info!(%report, "reconciliation finished");
        report
    }

    async fn refresh(
        &self,
        label: &str,
        target: &D::Target,
        source: &D::Source,
        report: &mut SyncReport,
    ) -> RecordState {
        if !self.direction.needs_update(target, source) {
            report.record_skipped();
            return RecordState::Pending.skipped();
        }
        match self.direction.update(target, source).await {
            Ok(()) => {
                info!(record = label, "updated linked record");
                report.record_updated();
                RecordState::Pending.synced()
            }
            Err(err) => {
                warn!(record = label, error = %err, "update failed");
                report.record_error(ItemFailure::new(label, err.to_string()));
                RecordState::Pending.failed()
            }
        }
    }

    async fn create(
        &self,
        label: &str,
        source: &D::Source,
        index: &mut LinkIndex<D::Target>,
        report: &mut SyncReport,
    ) -> RecordState {
        if self.direction.title(source).trim().is_empty() {
            warn!(record = label, "skipping record without a title");
            report.record_skipped();
            return RecordState::Pending.skipped();
        }
        let target = match self.direction.create(source).await {
            Ok(target) => target,
            Err(err) => {
                warn!(record = label, error = %err, "create failed");
                report.record_error(ItemFailure::new(label, err.to_string()));
                return RecordState::Pending.failed();
            }
        };
        info!(record = label, "created counterpart record");
        report.record_created();
        let mut state = RecordState::Pending.synced();
        if let Err(err) = self.direction.after_create(source, &target).await {
            warn!(record = label, error = %err, "cross-reference write-back failed");
            report.record_error(ItemFailure::new(
                label,
                format!("cross-reference write-back failed: {err}"),
            ));
            state = state.failed();
        }
        index.insert(target);
        state
    }
}
