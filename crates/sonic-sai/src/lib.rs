//! Safe Rust bindings for the SAI buffer statistics tracking (BST) surface.
//!
//! This crate wraps the parts of the switch driver a BST statistics tool
//! needs behind capability traits, with type-safe object IDs so a switch ID
//! can never be passed where a port handle is expected.
//!
//! # Architecture
//!
//! - [`types`]: typed object IDs, port numbers, CoS queues and BST stat ids
//! - [`error`]: status codes and the [`SaiError`] type
//! - [`api`]: capability traits ([`BstGateway`], [`SwitchDriver`], [`DiagShell`])
//! - [`sim`]: an in-memory switch implementing every trait
//!
//! # Example
//!
//! ```
//! use sonic_sai::sim::{SimConfig, SimulatedSwitch};
//! use sonic_sai::{BstGateway, BstStatId, CosQueue, PortNumber, SaiResult, SwitchDriver};
//!
//! fn peak_ucast(dev: &mut impl BstGateway, port: PortNumber) -> SaiResult<u64> {
//!     let gport = dev.resolve_port(port)?;
//!     dev.stat_sync(BstStatId::Ucast)?;
//!     let mut peak = 0;
//!     for queue in CosQueue::all() {
//!         peak = peak.max(dev.stat_get(gport, queue, BstStatId::Ucast)?);
//!     }
//!     Ok(peak)
//! }
//!
//! let mut sim = SimulatedSwitch::new(SimConfig::default());
//! sim.driver_init().unwrap();
//! assert_eq!(peak_ucast(&mut sim, PortNumber::new(1)).unwrap(), 0);
//! ```

pub mod api;
pub mod error;
pub mod sim;
pub mod types;

pub use api::{BstGateway, DiagShell, PortConfig, SwitchDriver};
pub use error::{SaiError, SaiResult, SaiStatus};
pub use types::{
    BstStatId, CosQueue, PortKind, PortNumber, PortOid, RawSaiObjectId, SaiObjectId,
    SaiObjectKind, SwitchKind, SwitchOid, VlanId, NUM_BST_STATS, NUM_COS_QUEUES,
};
