//! Buffer statistics tracking (BST) counter access.
//!
//! BST counters live in hardware and must be latched into the software
//! readable cache with [`BstGateway::stat_sync`] before they can be read.
//! A sync is per stat id and covers every port and queue at once.

use crate::error::SaiResult;
use crate::types::{BstStatId, CosQueue, PortNumber, PortOid};

/// Device operations the BST statistics core depends on.
pub trait BstGateway {
    /// Maps an operator-facing port number to the device port handle (gport).
    ///
    /// # Errors
    ///
    /// Returns an error if the port does not exist on this unit.
    fn resolve_port(&self, port: PortNumber) -> SaiResult<PortOid>;

    /// Latches the current hardware value of `stat` for all ports and queues.
    fn stat_sync(&mut self, stat: BstStatId) -> SaiResult<()>;

    /// Reads the last latched value of one (port, queue, stat) cell.
    fn stat_get(&self, gport: PortOid, queue: CosQueue, stat: BstStatId) -> SaiResult<u64>;

    /// Resets one (port, queue, stat) cell to zero in hardware.
    fn stat_clear(&mut self, gport: PortOid, queue: CosQueue, stat: BstStatId) -> SaiResult<()>;
}
