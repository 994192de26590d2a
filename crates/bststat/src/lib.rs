//! Buffer statistics tracking (BST) console
//!
//! Reads and clears per-port, per-CoS-queue buffer occupancy counters of a
//! switch through the [`sonic_sai::BstGateway`] capability, driven by a
//! menu-based operator session.
//!
//! - [`catalog`]: the fixed, ordered set of counter kinds
//! - [`collector`]: sync and read of one port's counter matrix
//! - [`clear`]: clearing of one port's counter matrix
//! - [`session`]: the operator menu state machine
//! - [`startup`]: driver bring-up before the menu starts

pub mod catalog;
pub mod clear;
pub mod collector;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod startup;

#[cfg(test)]
mod testing;

pub use catalog::{CounterKind, COUNTER_CATALOG};
pub use clear::{ClearFailure, ClearResult, StatsClearOperator};
pub use collector::StatsSnapshotCollector;
pub use config::BstConfig;
pub use error::{BstError, Result, StartupStep};
pub use input::{parse_numeric, read_numeric, NumericInput, MAX_DIGITS};
pub use session::{Intent, InteractiveSession, SessionState};
pub use snapshot::{CounterCell, SnapshotRow, StatsSnapshot, SyncFailure};
pub use startup::bring_up;
