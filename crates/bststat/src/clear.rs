//! Counter clearing for the clear operation.
//!
//! Clearing writes straight to hardware, so no sync precedes it. A failed
//! clear abandons the remaining queues of that counter kind and moves on to
//! the next kind.

use sonic_sai::{BstGateway, CosQueue, PortNumber, PortOid, SaiError};
use tracing::{debug, warn};

use crate::catalog::{self, CounterKind};
use crate::error::{BstError, Result};

/// A clear that the device rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearFailure {
    pub kind: CounterKind,
    pub queue: CosQueue,
    pub error: SaiError,
}

/// Outcome of clearing one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearResult {
    pub port: PortNumber,
    pub gport: PortOid,
    /// Kinds whose queues were all cleared, in catalog order.
    pub cleared: Vec<CounterKind>,
    /// At most one failure per kind, in catalog order.
    pub failures: Vec<ClearFailure>,
}

impl ClearResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Clears the full [counter kind x queue] matrix of a port.
pub struct StatsClearOperator<'a, G: BstGateway + ?Sized> {
    gateway: &'a mut G,
}

impl<'a, G: BstGateway + ?Sized> StatsClearOperator<'a, G> {
    pub fn new(gateway: &'a mut G) -> Self {
        Self { gateway }
    }

    /// Clears every catalog counter of `port`.
    ///
    /// # Errors
    ///
    /// Returns [`BstError::PortResolution`] if the port cannot be resolved.
    pub fn clear(&mut self, port: PortNumber) -> Result<ClearResult> {
        let gport = self.gateway.resolve_port(port).map_err(|source| {
            warn!(port = port.get(), rc = source.code(), "Failed to resolve port");
            BstError::PortResolution { port, source }
        })?;

        let mut result = ClearResult {
            port,
            gport,
            cleared: Vec::new(),
            failures: Vec::new(),
        };

        'kinds: for kind in catalog::counters() {
            for queue in CosQueue::all() {
                if let Err(error) = self.gateway.stat_clear(gport, queue, kind.id) {
                    warn!(
                        port = port.get(),
                        counter = kind.name,
                        queue = queue.index(),
                        rc = error.code(),
                        "Failed to clear BST counter"
                    );
                    result.failures.push(ClearFailure {
                        kind: *kind,
                        queue,
                        error,
                    });
                    continue 'kinds;
                }
            }
            result.cleared.push(*kind);
        }

        debug!(
            port = port.get(),
            cleared = result.cleared.len(),
            failed = result.failures.len(),
            "BST counters cleared"
        );
        Ok(result)
    }
}
