//! Switch driver bring-up and diagnostics.

use std::io::{BufRead, Write};

use crate::error::SaiResult;
use crate::types::{PortNumber, VlanId};

/// Port configuration reported by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortConfig {
    /// Front-panel ethernet ports.
    pub ethernet: Vec<PortNumber>,
    /// CPU port(s).
    pub cpu: Vec<PortNumber>,
}

impl PortConfig {
    /// Returns true if no ethernet ports are present.
    pub fn is_empty(&self) -> bool {
        self.ethernet.is_empty()
    }
}

/// Driver operations needed before statistics can be served.
pub trait SwitchDriver {
    /// Initializes the switch driver and the attached unit.
    fn driver_init(&mut self) -> SaiResult<()>;

    /// Returns the port configuration of the unit.
    fn port_config(&self) -> SaiResult<PortConfig>;

    /// Adds `ports` to `vlan`; ports also present in `untagged` egress untagged.
    fn vlan_port_add(
        &mut self,
        vlan: VlanId,
        ports: &[PortNumber],
        untagged: &[PortNumber],
    ) -> SaiResult<()>;

    /// Enables or disables the buffer statistics tracking feature.
    fn set_bst_enable(&mut self, enable: bool) -> SaiResult<()>;
}

/// Interactive vendor diagnostic shell.
pub trait DiagShell {
    /// Runs the shell on the operator's console until the operator leaves it.
    ///
    /// Blocks for the whole shell session.
    fn launch_shell(&mut self, input: &mut dyn BufRead, output: &mut dyn Write) -> SaiResult<()>;
}
