//! Per-port BST statistics snapshot.
//!
//! A snapshot is a [counter kind x CoS queue] matrix kept in catalog order and
//! ascending queue order. Cells the device never reported stay `NotRead`,
//! which is distinct from a reported zero.

use sonic_sai::{BstStatId, CosQueue, PortNumber, PortOid, SaiError, NUM_COS_QUEUES};

use crate::catalog::{self, CounterKind};

/// One (counter kind, queue) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterCell {
    /// Occupancy reported by the device.
    Value(u64),
    /// The device rejected the read.
    Failed(SaiError),
    /// Skipped after an earlier failure for the same counter kind.
    NotRead,
}

impl CounterCell {
    pub fn value(&self) -> Option<u64> {
        match self {
            CounterCell::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// All queues of one counter kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    kind: CounterKind,
    cells: [CounterCell; NUM_COS_QUEUES],
}

impl SnapshotRow {
    fn new(kind: CounterKind) -> Self {
        Self {
            kind,
            cells: std::array::from_fn(|_| CounterCell::NotRead),
        }
    }

    pub fn kind(&self) -> &CounterKind {
        &self.kind
    }

    /// Cells indexed by queue.
    pub fn cells(&self) -> &[CounterCell] {
        &self.cells
    }

    pub fn cell(&self, queue: CosQueue) -> &CounterCell {
        &self.cells[queue.index()]
    }

    /// The queue whose read failed, if any.
    pub fn failure(&self) -> Option<(CosQueue, &SaiError)> {
        CosQueue::all().find_map(|q| match self.cell(q) {
            CounterCell::Failed(err) => Some((q, err)),
            _ => None,
        })
    }

    /// Queues that were never read.
    pub fn not_read(&self) -> Vec<CosQueue> {
        CosQueue::all()
            .filter(|q| matches!(self.cell(*q), CounterCell::NotRead))
            .collect()
    }
}

/// A counter sync that failed, and every kind left unsynced behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub kind: CounterKind,
    pub error: SaiError,
    /// Kinds after `kind` in catalog order; their reads use older latched values.
    pub unsynced: Vec<CounterKind>,
}

/// BST counters of one port for one display request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    port: PortNumber,
    gport: PortOid,
    rows: Vec<SnapshotRow>,
    sync_failure: Option<SyncFailure>,
}

impl StatsSnapshot {
    /// Creates a snapshot with every catalog cell `NotRead`.
    pub fn new(port: PortNumber, gport: PortOid) -> Self {
        Self {
            port,
            gport,
            rows: catalog::counters().iter().copied().map(SnapshotRow::new).collect(),
            sync_failure: None,
        }
    }

    pub fn port(&self) -> PortNumber {
        self.port
    }

    pub fn gport(&self) -> PortOid {
        self.gport
    }

    /// Rows in catalog order.
    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn sync_failure(&self) -> Option<&SyncFailure> {
        self.sync_failure.as_ref()
    }

    pub(crate) fn record_sync_failure(&mut self, failure: SyncFailure) {
        self.sync_failure = Some(failure);
    }

    pub(crate) fn set(&mut self, row: usize, queue: CosQueue, cell: CounterCell) {
        if let Some(r) = self.rows.get_mut(row) {
            r.cells[queue.index()] = cell;
        }
    }

    pub fn cell(&self, stat: BstStatId, queue: CosQueue) -> Option<&CounterCell> {
        self.rows
            .iter()
            .find(|r| r.kind.id == stat)
            .map(|r| r.cell(queue))
    }

    /// Value read for a cell, `None` if it failed or was not read.
    pub fn value(&self, stat: BstStatId, queue: CosQueue) -> Option<u64> {
        self.cell(stat, queue).and_then(CounterCell::value)
    }

    /// Number of cells holding a device value.
    pub fn populated(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| c.value().is_some())
            .count()
    }

    /// Returns true if every cell was read after a successful sync.
    pub fn is_complete(&self) -> bool {
        self.sync_failure.is_none() && self.populated() == self.rows.len() * NUM_COS_QUEUES
    }

    /// Every failed read as (kind, queue, error).
    pub fn read_failures(&self) -> Vec<(CounterKind, CosQueue, &SaiError)> {
        self.rows
            .iter()
            .filter_map(|r| r.failure().map(|(q, e)| (r.kind, q, e)))
            .collect()
    }
}
