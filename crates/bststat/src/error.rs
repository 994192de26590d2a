//! Error types for bststat

use sonic_sai::{PortNumber, SaiError};
use thiserror::Error;

/// Startup step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    DriverInit,
    DefaultVlan,
    BstEnable,
}

impl StartupStep {
    /// Console description of the step.
    pub fn description(&self) -> &'static str {
        match self {
            StartupStep::DriverInit => "initialize the system",
            StartupStep::DefaultVlan => "add default ports",
            StartupStep::BstEnable => "Enable bst",
        }
    }

    /// Returns true if the session cannot start after this step fails.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StartupStep::DefaultVlan)
    }
}

/// BST statistics errors
#[derive(Error, Debug)]
pub enum BstError {
    /// Operator port could not be mapped to a device port
    #[error("Failed to resolve port {port}: {source}")]
    PortResolution {
        port: PortNumber,
        #[source]
        source: SaiError,
    },

    /// Device bring-up failed
    #[error("Failed to {}: {source}", step.description())]
    Startup {
        step: StartupStep,
        #[source]
        source: SaiError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Console I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bststat operations
pub type Result<T> = std::result::Result<T, BstError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sonic_sai::SaiStatus;

    #[test]
    fn test_port_resolution_display() {
        let err = BstError::PortResolution {
            port: PortNumber::new(99),
            source: SaiError::from_status(SaiStatus::InvalidPortNumber),
        };
        assert_eq!(
            err.to_string(),
            "Failed to resolve port 99: SAI operation failed: SAI_STATUS_INVALID_PORT_NUMBER"
        );
    }

    #[test]
    fn test_startup_fatality() {
        assert!(StartupStep::DriverInit.is_fatal());
        assert!(StartupStep::BstEnable.is_fatal());
        assert!(!StartupStep::DefaultVlan.is_fatal());
    }

    #[test]
    fn test_config_error() {
        let err = BstError::Config("ports must be > 0".to_string());
        assert_eq!(err.to_string(), "Configuration error: ports must be > 0");
    }
}
