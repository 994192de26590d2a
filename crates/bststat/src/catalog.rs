//! BST counter catalog.
//!
//! The catalog order is the sync order, the read order and the display order.

use sonic_sai::BstStatId;

/// A BST counter kind with its console label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterKind {
    pub id: BstStatId,
    pub name: &'static str,
}

/// Counters reported for every port, in catalog order.
pub const COUNTER_CATALOG: [CounterKind; 4] = [
    CounterKind {
        id: BstStatId::Ucast,
        name: "BstStatIdUcast",
    },
    CounterKind {
        id: BstStatId::Mcast,
        name: "BstStatIdMcast",
    },
    CounterKind {
        id: BstStatId::PriGroupShared,
        name: "BstStatIdPriGroupShared",
    },
    CounterKind {
        id: BstStatId::PriGroupHeadroom,
        name: "BstStatIdPriGroupHeadroom",
    },
];

/// Returns the catalog entries in order.
pub fn counters() -> &'static [CounterKind] {
    &COUNTER_CATALOG
}
