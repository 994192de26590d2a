//! Shared unit-test doubles.

use mockall::mock;
use sonic_sai::{BstGateway, BstStatId, CosQueue, PortNumber, PortOid, SaiResult};

mock! {
    pub Gateway {}

    impl BstGateway for Gateway {
        fn resolve_port(&self, port: PortNumber) -> SaiResult<PortOid>;
        fn stat_sync(&mut self, stat: BstStatId) -> SaiResult<()>;
        fn stat_get(&self, gport: PortOid, queue: CosQueue, stat: BstStatId) -> SaiResult<u64>;
        fn stat_clear(&mut self, gport: PortOid, queue: CosQueue, stat: BstStatId) -> SaiResult<()>;
    }
}

/// Gport the mock hands out for `port`.
pub fn gport(port: PortNumber) -> PortOid {
    PortOid::from_raw_unchecked(0x1_0000_0000_0000 | u64::from(port.get()))
}
