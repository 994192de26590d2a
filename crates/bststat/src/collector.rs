//! Snapshot collection for the display operation.
//!
//! Sync failures and read failures break out differently. A sync latches one
//! counter kind for every port and queue, so after the first failed sync no
//! further kinds are synced, but every kind is still read from whatever was
//! latched last. A failed read only abandons the remaining queues of that
//! kind.

use sonic_sai::{BstGateway, CosQueue, PortNumber};
use tracing::{debug, warn};

use crate::catalog;
use crate::error::{BstError, Result};
use crate::snapshot::{CounterCell, StatsSnapshot, SyncFailure};

/// Reads the full [counter kind x queue] matrix of a port.
pub struct StatsSnapshotCollector<'a, G: BstGateway + ?Sized> {
    gateway: &'a mut G,
}

impl<'a, G: BstGateway + ?Sized> StatsSnapshotCollector<'a, G> {
    pub fn new(gateway: &'a mut G) -> Self {
        Self { gateway }
    }

    /// Syncs and reads every catalog counter of `port`.
    ///
    /// # Errors
    ///
    /// Returns [`BstError::PortResolution`] if the port cannot be resolved; no
    /// counter is touched in that case. Sync and read failures are recorded
    /// in the returned snapshot instead.
    pub fn collect(&mut self, port: PortNumber) -> Result<StatsSnapshot> {
        let gport = self.gateway.resolve_port(port).map_err(|source| {
            warn!(port = port.get(), rc = source.code(), "Failed to resolve port");
            BstError::PortResolution { port, source }
        })?;
        debug!(port = port.get(), %gport, "Collecting BST counters");

        let mut snapshot = StatsSnapshot::new(port, gport);
        let kinds = catalog::counters();

        for (i, kind) in kinds.iter().enumerate() {
            if let Err(error) = self.gateway.stat_sync(kind.id) {
                warn!(
                    counter = kind.name,
                    rc = error.code(),
                    "Failed to sync BST counter, skipping remaining syncs"
                );
                snapshot.record_sync_failure(SyncFailure {
                    kind: *kind,
                    error,
                    unsynced: kinds[i + 1..].to_vec(),
                });
                break;
            }
        }

        for (row, kind) in kinds.iter().enumerate() {
            for queue in CosQueue::all() {
                match self.gateway.stat_get(gport, queue, kind.id) {
                    Ok(value) => snapshot.set(row, queue, CounterCell::Value(value)),
                    Err(error) => {
                        warn!(
                            port = port.get(),
                            counter = kind.name,
                            queue = queue.index(),
                            rc = error.code(),
                            "Failed to read BST counter"
                        );
                        snapshot.set(row, queue, CounterCell::Failed(error));
                        break;
                    }
                }
            }
        }

        debug!(
            port = port.get(),
            populated = snapshot.populated(),
            complete = snapshot.is_complete(),
            "BST snapshot collected"
        );
        Ok(snapshot)
    }
}
