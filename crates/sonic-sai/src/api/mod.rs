//! Safe capability traits over the switch driver.
//!
//! Each submodule defines the calls one consumer needs from the device, so
//! that a hardware-backed driver and [`crate::sim::SimulatedSwitch`] are
//! interchangeable:
//!
//! - [`bst`]: port resolution and BST counter sync/get/clear
//! - [`switch`]: driver bring-up, default VLAN membership, BST enable and the
//!   diagnostic shell

pub mod bst;
pub mod switch;

pub use bst::BstGateway;
pub use switch::{DiagShell, PortConfig, SwitchDriver};
