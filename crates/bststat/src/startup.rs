//! Device bring-up before the menu starts.

use std::io::Write;

use sonic_sai::{SaiError, SwitchDriver, VlanId};
use tracing::{info, warn};

use crate::error::{BstError, Result, StartupStep};
use crate::render;

/// Adds every front-panel port of the unit to `vlan`, tagged and untagged.
pub fn default_vlan_config<D: SwitchDriver + ?Sized>(
    driver: &mut D,
    vlan: VlanId,
) -> sonic_sai::SaiResult<usize> {
    let ports = driver.port_config().map_err(|e| {
        warn!(rc = e.code(), "Failed to get port configuration: {}", e);
        e
    })?;
    driver
        .vlan_port_add(vlan, &ports.ethernet, &ports.ethernet)
        .map_err(|e| {
            warn!(vlan = vlan.get(), rc = e.code(), "Failed to add ports to VLAN: {}", e);
            e
        })?;
    Ok(ports.ethernet.len())
}

/// Initializes the driver, joins the default VLAN and enables BST tracking.
///
/// A default VLAN failure is reported and bring-up continues.
///
/// # Errors
///
/// Returns [`BstError::Startup`] if driver init or BST enable fails.
pub fn bring_up<D: SwitchDriver + ?Sized>(
    driver: &mut D,
    vlan: VlanId,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Initializing the system.")?;
    driver
        .driver_init()
        .or_else(|e| fail(out, StartupStep::DriverInit, e))?;

    writeln!(out, "Adding ports to default vlan.")?;
    match default_vlan_config(driver, vlan) {
        Ok(count) => info!(vlan = vlan.get(), ports = count, "Default VLAN configured"),
        Err(e) => fail(out, StartupStep::DefaultVlan, e)?,
    }

    driver
        .set_bst_enable(true)
        .or_else(|e| fail(out, StartupStep::BstEnable, e))?;
    writeln!(out, "BST feature is enabled.")?;
    out.flush()?;
    Ok(())
}

/// Reports a failed step; only fatal steps turn into an error.
fn fail(out: &mut impl Write, step: StartupStep, source: SaiError) -> Result<()> {
    render::write_error(out, step.description(), &source)?;
    if step.is_fatal() {
        return Err(BstError::Startup { step, source });
    }
    warn!(step = step.description(), rc = source.code(), "Continuing after startup failure");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_sai::sim::{SimConfig, SimFault, SimulatedSwitch};
    use sonic_sai::{PortNumber, SaiStatus};

    fn sim() -> SimulatedSwitch {
        SimulatedSwitch::new(SimConfig {
            ports: 4,
            ..SimConfig::default()
        })
    }

    fn vlan1() -> VlanId {
        VlanId::new(1).unwrap()
    }

    #[test]
    fn test_bring_up_success() {
        let mut dev = sim();
        let mut out = Vec::new();
        bring_up(&mut dev, vlan1(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Initializing the system.\nAdding ports to default vlan.\nBST feature is enabled.\n"
        );
        assert!(dev.is_initialized());
        assert!(dev.bst_enabled());
        assert_eq!(
            dev.vlan_members(vlan1()),
            (1..=4).map(PortNumber::new).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_driver_init_failure_is_fatal() {
        let mut dev = sim();
        dev.inject_fault(SimFault::DriverInit, SaiStatus::Failure);
        let mut out = Vec::new();

        let err = bring_up(&mut dev, vlan1(), &mut out).unwrap_err();
        assert!(matches!(
            err,
            BstError::Startup {
                step: StartupStep::DriverInit,
                ..
            }
        ));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Initializing the system.\n\nFailed to initialize the system, rc = -1 (SAI_STATUS_FAILURE).\n"
        );
    }

    #[test]
    fn test_vlan_failure_is_not_fatal() {
        let mut dev = sim();
        dev.inject_fault(SimFault::VlanPortAdd, SaiStatus::InvalidVlanId);
        let mut out = Vec::new();

        bring_up(&mut dev, vlan1(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to add default ports, rc = -11 (SAI_STATUS_INVALID_VLAN_ID)."));
        assert!(text.ends_with("BST feature is enabled.\n"));
        assert!(dev.bst_enabled());
    }

    #[test]
    fn test_bst_enable_failure_is_fatal() {
        let mut dev = sim();
        dev.inject_fault(SimFault::BstEnable, SaiStatus::NotSupported);
        let mut out = Vec::new();

        let err = bring_up(&mut dev, vlan1(), &mut out).unwrap_err();
        assert!(matches!(
            err,
            BstError::Startup {
                step: StartupStep::BstEnable,
                ..
            }
        ));
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Failed to Enable bst, rc = -2 (SAI_STATUS_NOT_SUPPORTED).\n"));
        assert!(!text.contains("BST feature is enabled."));
    }
}
