//! In-memory switch used when no hardware SDK is linked.
//!
//! `SimulatedSwitch` keeps two counter banks per port: the live hardware
//! occupancy and the latched copy that `stat_get` reads. `stat_sync` copies
//! one stat id from live to latched across every port, the same way the
//! hardware latch does. Faults can be injected per operation so callers can
//! exercise their error paths.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{BufRead, Write};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{BstGateway, DiagShell, PortConfig, SwitchDriver};
use crate::error::{SaiError, SaiResult, SaiStatus};
use crate::types::{
    BstStatId, CosQueue, PortNumber, PortOid, RawSaiObjectId, SwitchOid, VlanId, NUM_BST_STATS,
    NUM_COS_QUEUES,
};

const SWITCH_OID_BASE: RawSaiObjectId = 0x0021_0000_0000_0000;
const PORT_OID_BASE: RawSaiObjectId = 0x0001_0000_0000_0000;
const PORT_OID_MASK: RawSaiObjectId = 0x0000_0000_ffff_ffff;

/// Probability that a queue sees a new peak on a traffic tick.
const TRAFFIC_BURST_PROBABILITY: f64 = 0.25;

type CounterBank = [[u64; NUM_COS_QUEUES]; NUM_BST_STATS];

/// Simulated device parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Unit number of the switch.
    pub unit: u32,
    /// Number of front-panel ports, numbered from 1.
    pub ports: u32,
    /// Generate buffer occupancy on every sync while BST is enabled.
    pub traffic: bool,
    /// Seed for the traffic generator.
    pub seed: u64,
    /// Upper bound of generated occupancy, in cells.
    pub max_cells: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            unit: 0,
            ports: 32,
            traffic: false,
            seed: 0,
            max_cells: 4096,
        }
    }
}

/// Operation that should fail on the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimFault {
    DriverInit,
    PortConfig,
    VlanPortAdd,
    BstEnable,
    Sync(BstStatId),
    Get {
        port: PortNumber,
        queue: CosQueue,
        stat: BstStatId,
    },
    Clear {
        port: PortNumber,
        queue: CosQueue,
        stat: BstStatId,
    },
}

/// In-memory switch implementing every device capability trait.
pub struct SimulatedSwitch {
    config: SimConfig,
    switch_id: SwitchOid,
    initialized: bool,
    bst_enabled: bool,
    live: BTreeMap<PortNumber, CounterBank>,
    latched: BTreeMap<PortNumber, CounterBank>,
    vlans: BTreeMap<u16, BTreeSet<PortNumber>>,
    faults: HashMap<SimFault, SaiStatus>,
    rng: StdRng,
    ops: Cell<usize>,
}

impl std::fmt::Debug for SimulatedSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSwitch")
            .field("switch_id", &self.switch_id)
            .field("ports", &self.live.len())
            .field("initialized", &self.initialized)
            .field("bst_enabled", &self.bst_enabled)
            .field("faults", &self.faults.len())
            .finish()
    }
}

impl SimulatedSwitch {
    /// Creates an uninitialized simulated switch.
    pub fn new(config: SimConfig) -> Self {
        let empty: CounterBank = [[0; NUM_COS_QUEUES]; NUM_BST_STATS];
        let live: BTreeMap<_, _> = (1..=config.ports)
            .map(|p| (PortNumber::new(p), empty))
            .collect();

        Self {
            switch_id: SwitchOid::from_raw_unchecked(
                SWITCH_OID_BASE | RawSaiObjectId::from(config.unit),
            ),
            rng: StdRng::seed_from_u64(config.seed),
            latched: live.clone(),
            live,
            config,
            initialized: false,
            bst_enabled: false,
            vlans: BTreeMap::new(),
            faults: HashMap::new(),
            ops: Cell::new(0),
        }
    }

    /// Returns the switch object ID of this unit.
    pub fn switch_id(&self) -> SwitchOid {
        self.switch_id
    }

    /// Returns true once `driver_init` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns true if BST tracking is enabled.
    pub fn bst_enabled(&self) -> bool {
        self.bst_enabled
    }

    /// Number of BST gateway calls served so far, failed ones included.
    pub fn op_count(&self) -> usize {
        self.ops.get()
    }

    /// Members of `vlan` in port order.
    pub fn vlan_members(&self, vlan: VlanId) -> Vec<PortNumber> {
        self.vlans
            .get(&vlan.get())
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Makes `fault` fail with `status` until cleared.
    pub fn inject_fault(&mut self, fault: SimFault, status: SaiStatus) {
        self.faults.insert(fault, status);
    }

    /// Removes all injected faults.
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Sets the live hardware occupancy of one cell.
    ///
    /// The value becomes visible to `stat_get` after the next sync of `stat`.
    pub fn set_occupancy(
        &mut self,
        port: PortNumber,
        queue: CosQueue,
        stat: BstStatId,
        cells: u64,
    ) -> SaiResult<()> {
        let bank = self
            .live
            .get_mut(&port)
            .ok_or_else(|| SaiError::not_found(format!("port {}", port)))?;
        bank[stat.bank_index()][queue.index()] = cells;
        Ok(())
    }

    fn check_fault(&self, fault: SimFault) -> SaiResult<()> {
        match self.faults.get(&fault) {
            Some(status) => {
                debug!("Injected fault {:?} -> {}", fault, status);
                status.into_result()
            }
            None => Ok(()),
        }
    }

    fn ensure_initialized(&self) -> SaiResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(SaiError::Uninitialized)
        }
    }

    fn count_op(&self) {
        self.ops.set(self.ops.get() + 1);
    }

    fn port_of(&self, gport: PortOid) -> SaiResult<PortNumber> {
        let raw = gport.as_raw();
        if raw & !PORT_OID_MASK != PORT_OID_BASE {
            return Err(SaiError::from_status(SaiStatus::InvalidObjectId));
        }
        let port = PortNumber::new((raw & PORT_OID_MASK) as u32);
        if self.live.contains_key(&port) {
            Ok(port)
        } else {
            Err(SaiError::from_status(SaiStatus::InvalidObjectId))
        }
    }

    fn generate_traffic(&mut self, stat: BstStatId) {
        let max_cells = self.config.max_cells;
        for bank in self.live.values_mut() {
            for cell in bank[stat.bank_index()].iter_mut() {
                if self.rng.gen_bool(TRAFFIC_BURST_PROBABILITY) {
                    let sample = self.rng.gen_range(0..=max_cells);
                    *cell = (*cell).max(sample);
                }
            }
        }
    }
}

impl SwitchDriver for SimulatedSwitch {
    fn driver_init(&mut self) -> SaiResult<()> {
        self.check_fault(SimFault::DriverInit)?;
        self.initialized = true;
        info!(
            "Simulated switch {} initialized with {} ports",
            self.switch_id,
            self.live.len()
        );
        Ok(())
    }

    fn port_config(&self) -> SaiResult<PortConfig> {
        self.ensure_initialized()?;
        self.check_fault(SimFault::PortConfig)?;
        Ok(PortConfig {
            ethernet: self.live.keys().copied().collect(),
            cpu: vec![PortNumber::new(0)],
        })
    }

    fn vlan_port_add(
        &mut self,
        vlan: VlanId,
        ports: &[PortNumber],
        untagged: &[PortNumber],
    ) -> SaiResult<()> {
        self.ensure_initialized()?;
        self.check_fault(SimFault::VlanPortAdd)?;
        if let Some(bad) = ports
            .iter()
            .chain(untagged)
            .find(|p| !self.live.contains_key(p))
        {
            warn!("Cannot add port {} to VLAN {}: no such port", bad, vlan);
            return Err(SaiError::from_status(SaiStatus::InvalidPortNumber));
        }
        self.vlans
            .entry(vlan.get())
            .or_default()
            .extend(ports.iter().copied());
        debug!("Added {} ports to VLAN {}", ports.len(), vlan);
        Ok(())
    }

    fn set_bst_enable(&mut self, enable: bool) -> SaiResult<()> {
        self.ensure_initialized()?;
        self.check_fault(SimFault::BstEnable)?;
        self.bst_enabled = enable;
        info!("BST tracking {}", if enable { "enabled" } else { "disabled" });
        Ok(())
    }
}

impl BstGateway for SimulatedSwitch {
    fn resolve_port(&self, port: PortNumber) -> SaiResult<PortOid> {
        self.count_op();
        self.ensure_initialized()?;
        if self.live.contains_key(&port) {
            Ok(PortOid::from_raw_unchecked(
                PORT_OID_BASE | RawSaiObjectId::from(port.get()),
            ))
        } else {
            Err(SaiError::from_status(SaiStatus::InvalidPortNumber))
        }
    }

    fn stat_sync(&mut self, stat: BstStatId) -> SaiResult<()> {
        self.count_op();
        self.ensure_initialized()?;
        self.check_fault(SimFault::Sync(stat))?;
        if self.config.traffic && self.bst_enabled {
            self.generate_traffic(stat);
        }
        let index = stat.bank_index();
        for (port, bank) in &self.live {
            if let Some(latched) = self.latched.get_mut(port) {
                latched[index] = bank[index];
            }
        }
        Ok(())
    }

    fn stat_get(&self, gport: PortOid, queue: CosQueue, stat: BstStatId) -> SaiResult<u64> {
        self.count_op();
        self.ensure_initialized()?;
        let port = self.port_of(gport)?;
        self.check_fault(SimFault::Get { port, queue, stat })?;
        self.latched
            .get(&port)
            .map(|bank| bank[stat.bank_index()][queue.index()])
            .ok_or_else(|| SaiError::internal(format!("no latched bank for port {}", port)))
    }

    fn stat_clear(&mut self, gport: PortOid, queue: CosQueue, stat: BstStatId) -> SaiResult<()> {
        self.count_op();
        self.ensure_initialized()?;
        let port = self.port_of(gport)?;
        self.check_fault(SimFault::Clear { port, queue, stat })?;
        for bank in [self.live.get_mut(&port), self.latched.get_mut(&port)]
            .into_iter()
            .flatten()
        {
            bank[stat.bank_index()][queue.index()] = 0;
        }
        Ok(())
    }
}

const SHELL_HELP: &str = "\
Commands:
  ports        List front-panel ports and their gport handles
  vlans        List VLAN membership
  bst          Show BST tracking state
  help         Show this help
  exit, quit   Leave the diagnostic shell
";

impl DiagShell for SimulatedSwitch {
    fn launch_shell(&mut self, input: &mut dyn BufRead, output: &mut dyn Write) -> SaiResult<()> {
        let io_err = |e: std::io::Error| SaiError::internal(format!("diag shell I/O: {}", e));
        info!("Entering diagnostic shell on unit {}", self.config.unit);

        let mut line = String::new();
        loop {
            write!(output, "BCM.{}> ", self.config.unit).map_err(io_err)?;
            output.flush().map_err(io_err)?;

            line.clear();
            if input.read_line(&mut line).map_err(io_err)? == 0 {
                writeln!(output).map_err(io_err)?;
                break;
            }

            match line.trim() {
                "" => {}
                "exit" | "quit" => break,
                "help" | "?" => write!(output, "{}", SHELL_HELP).map_err(io_err)?,
                "ports" | "ps" => {
                    for port in self.live.keys() {
                        let gport = PORT_OID_BASE | RawSaiObjectId::from(port.get());
                        writeln!(output, "  port {:>3}  gport 0x{:016x}", port, gport)
                            .map_err(io_err)?;
                    }
                }
                "vlans" => {
                    for (vlan, members) in &self.vlans {
                        writeln!(output, "  vlan {:>4}  {} ports", vlan, members.len())
                            .map_err(io_err)?;
                    }
                }
                "bst" => {
                    writeln!(
                        output,
                        "  BST tracking: {}",
                        if self.bst_enabled { "enabled" } else { "disabled" }
                    )
                    .map_err(io_err)?;
                    for stat in BstStatId::ALL {
                        writeln!(output, "  {:?}: {}", stat, stat.sai_stat_name())
                            .map_err(io_err)?;
                    }
                }
                other => writeln!(output, "Unknown command: {}", other).map_err(io_err)?,
            }
        }

        info!("Leaving diagnostic shell");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ready_switch() -> SimulatedSwitch {
        let mut sim = SimulatedSwitch::new(SimConfig {
            ports: 4,
            ..SimConfig::default()
        });
        sim.driver_init().unwrap();
        sim
    }

    fn q(index: usize) -> CosQueue {
        CosQueue::new(index).unwrap()
    }

    #[test]
    fn test_requires_init() {
        let sim = SimulatedSwitch::new(SimConfig::default());
        assert_eq!(
            sim.resolve_port(PortNumber::new(1)),
            Err(SaiError::Uninitialized)
        );
        assert!(sim.port_config().is_err());
    }

    #[test]
    fn test_resolve_port() {
        let sim = ready_switch();
        let gport = sim.resolve_port(PortNumber::new(3)).unwrap();
        assert_eq!(gport.as_raw(), PORT_OID_BASE | 3);

        let err = sim.resolve_port(PortNumber::new(5)).unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidPortNumber);
        assert!(sim.resolve_port(PortNumber::new(0)).is_err());
    }

    #[test]
    fn test_get_returns_latched_value_until_sync() {
        let mut sim = ready_switch();
        let port = PortNumber::new(2);
        let gport = sim.resolve_port(port).unwrap();
        sim.set_occupancy(port, q(1), BstStatId::Mcast, 77).unwrap();

        assert_eq!(sim.stat_get(gport, q(1), BstStatId::Mcast), Ok(0));
        sim.stat_sync(BstStatId::Ucast).unwrap();
        assert_eq!(sim.stat_get(gport, q(1), BstStatId::Mcast), Ok(0));
        sim.stat_sync(BstStatId::Mcast).unwrap();
        assert_eq!(sim.stat_get(gport, q(1), BstStatId::Mcast), Ok(77));
    }

    #[test]
    fn test_clear_zeroes_live_and_latched() {
        let mut sim = ready_switch();
        let port = PortNumber::new(1);
        let gport = sim.resolve_port(port).unwrap();
        sim.set_occupancy(port, q(0), BstStatId::Ucast, 10).unwrap();
        sim.stat_sync(BstStatId::Ucast).unwrap();

        sim.stat_clear(gport, q(0), BstStatId::Ucast).unwrap();
        assert_eq!(sim.stat_get(gport, q(0), BstStatId::Ucast), Ok(0));
        sim.stat_sync(BstStatId::Ucast).unwrap();
        assert_eq!(sim.stat_get(gport, q(0), BstStatId::Ucast), Ok(0));
    }

    #[test]
    fn test_foreign_gport_rejected() {
        let sim = ready_switch();
        let bogus = PortOid::from_raw_unchecked(0x0002_0000_0000_0001);
        let err = sim.stat_get(bogus, q(0), BstStatId::Ucast).unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    }

    #[test]
    fn test_injected_faults() {
        let mut sim = ready_switch();
        let port = PortNumber::new(1);
        let gport = sim.resolve_port(port).unwrap();
        sim.inject_fault(SimFault::Sync(BstStatId::Mcast), SaiStatus::Failure);
        sim.inject_fault(
            SimFault::Get {
                port,
                queue: q(4),
                stat: BstStatId::Ucast,
            },
            SaiStatus::NotExecuted,
        );

        assert!(sim.stat_sync(BstStatId::Ucast).is_ok());
        assert_eq!(
            sim.stat_sync(BstStatId::Mcast).unwrap_err().status(),
            SaiStatus::Failure
        );
        assert!(sim.stat_get(gport, q(3), BstStatId::Ucast).is_ok());
        assert_eq!(
            sim.stat_get(gport, q(4), BstStatId::Ucast)
                .unwrap_err()
                .status(),
            SaiStatus::NotExecuted
        );

        sim.clear_faults();
        assert!(sim.stat_sync(BstStatId::Mcast).is_ok());
    }

    #[test]
    fn test_op_count() {
        let mut sim = ready_switch();
        assert_eq!(sim.op_count(), 0);
        let gport = sim.resolve_port(PortNumber::new(1)).unwrap();
        sim.stat_sync(BstStatId::Ucast).unwrap();
        let _ = sim.stat_get(gport, q(0), BstStatId::Ucast);
        assert_eq!(sim.op_count(), 3);
    }

    #[test]
    fn test_traffic_generation_is_seeded() {
        let config = SimConfig {
            ports: 2,
            traffic: true,
            seed: 7,
            ..SimConfig::default()
        };
        let read_all = |config: &SimConfig| {
            let mut sim = SimulatedSwitch::new(config.clone());
            sim.driver_init().unwrap();
            sim.set_bst_enable(true).unwrap();
            sim.stat_sync(BstStatId::Ucast).unwrap();
            let gport = sim.resolve_port(PortNumber::new(1)).unwrap();
            CosQueue::all()
                .map(|q| sim.stat_get(gport, q, BstStatId::Ucast).unwrap())
                .collect::<Vec<_>>()
        };

        let first = read_all(&config);
        assert_eq!(first, read_all(&config));
        assert!(first.iter().all(|v| *v <= config.max_cells));
    }

    #[test]
    fn test_no_traffic_while_bst_disabled() {
        let mut sim = SimulatedSwitch::new(SimConfig {
            ports: 1,
            traffic: true,
            ..SimConfig::default()
        });
        sim.driver_init().unwrap();
        sim.stat_sync(BstStatId::Ucast).unwrap();
        let gport = sim.resolve_port(PortNumber::new(1)).unwrap();
        for queue in CosQueue::all() {
            assert_eq!(sim.stat_get(gport, queue, BstStatId::Ucast), Ok(0));
        }
    }

    #[test]
    fn test_default_vlan_membership() {
        let mut sim = ready_switch();
        let config = sim.port_config().unwrap();
        assert_eq!(config.ethernet.len(), 4);
        let vlan = VlanId::new(1).unwrap();
        sim.vlan_port_add(vlan, &config.ethernet, &config.ethernet)
            .unwrap();
        assert_eq!(sim.vlan_members(vlan), config.ethernet);

        let err = sim
            .vlan_port_add(vlan, &[PortNumber::new(99)], &[])
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidPortNumber);
    }

    #[test]
    fn test_diag_shell_session() {
        let mut sim = ready_switch();
        let mut input = "ports\nfoo\nexit\nports\n".as_bytes();
        let mut output = Vec::new();
        sim.launch_shell(&mut input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("BCM.0> "));
        assert!(text.contains("port   4  gport 0x0001000000000004"));
        assert!(text.contains("Unknown command: foo"));
        // Input after `exit` is left for the caller.
        assert_eq!(input, b"ports\n");
    }

    #[test]
    fn test_diag_shell_eof() {
        let mut sim = ready_switch();
        let mut input = "".as_bytes();
        let mut output = Vec::new();
        assert!(sim.launch_shell(&mut input, &mut output).is_ok());
    }
}
