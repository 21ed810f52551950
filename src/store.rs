use std::sync::Arc;

use tokio::sync::watch;

use crate::job::JobSnapshot;

/// Holds the one current [`JobSnapshot`].
///
/// Snapshots are immutable and published as a whole by swapping an `Arc`,
/// so a reader holds either the old list or the new one, never a mix.
/// Readers only clone the `Arc` and never wait on a refresh in progress.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Arc<JobSnapshot>>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Start with an empty snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(JobSnapshot::default())
    }

    pub fn with_snapshot(snapshot: JobSnapshot) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(snapshot));
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Arc<JobSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn replace(&self, snapshot: JobSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }
}
