//! Configuration file support for bststat
//!
//! Loads and validates bststat configuration from TOML files.
//! Default location: /etc/sonic/bststat.conf, overridden by `$BSTSTAT_CONFIG`.

use crate::error::{BstError, Result};
use serde::{Deserialize, Serialize};
use sonic_sai::sim::SimConfig;
use sonic_sai::VlanId;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/bststat.conf";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`]
pub const CONFIG_PATH_ENV: &str = "BSTSTAT_CONFIG";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Switch unit number
    #[serde(default)]
    pub unit: u32,

    /// VLAN every front-panel port joins at startup
    #[serde(default = "default_vlan")]
    pub default_vlan: u16,
}

/// Simulated device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Number of front-panel ports
    #[serde(default = "default_ports")]
    pub ports: u32,

    /// Generate buffer occupancy on every counter sync
    #[serde(default)]
    pub traffic: bool,

    /// Traffic generator seed
    #[serde(default)]
    pub seed: u64,

    /// Peak occupancy the traffic generator produces, in cells
    #[serde(default = "default_max_cells")]
    pub max_cells: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Complete bststat configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BstConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_vlan() -> u16 {
    1
}

fn default_ports() -> u32 {
    32
}

fn default_max_cells() -> u64 {
    4096
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            unit: 0,
            default_vlan: default_vlan(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ports: default_ports(),
            traffic: false,
            seed: 0,
            max_cells: default_max_cells(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BstConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content).map_err(|e| {
                    BstError::Config(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(BstError::Io(e)),
        }
    }

    /// Config file location: `$BSTSTAT_CONFIG` or the default path
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load and validate from [`BstConfig::path`]
    pub fn load() -> Result<Self> {
        let config = Self::load_or_default(Self::path())?;
        config.validate()?;
        Ok(config)
    }

    /// Default VLAN as a typed id
    pub fn default_vlan(&self) -> Result<VlanId> {
        VlanId::new(self.device.default_vlan).ok_or_else(|| {
            BstError::Config(format!(
                "default_vlan must be 1-4094, got {}",
                self.device.default_vlan
            ))
        })
    }

    /// Parameters for the simulated device
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            unit: self.device.unit,
            ports: self.simulator.ports,
            traffic: self.simulator.traffic,
            seed: self.simulator.seed,
            max_cells: self.simulator.max_cells,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.default_vlan()?;

        if self.simulator.ports == 0 {
            return Err(BstError::Config("ports must be > 0".to_string()));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(BstError::Config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BstConfig::default();
        assert_eq!(config.device.unit, 0);
        assert_eq!(config.device.default_vlan, 1);
        assert_eq!(config.simulator.ports, 32);
        assert!(!config.simulator.traffic);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sim_config_matches_simulator_defaults() {
        assert_eq!(BstConfig::default().sim_config(), SimConfig::default());
    }

    #[test]
    fn test_validate_zero_ports() {
        let mut config = BstConfig::default();
        config.simulator.ports = 0;
        assert!(matches!(config.validate(), Err(BstError::Config(_))));
    }

    #[test]
    fn test_validate_vlan_range() {
        let mut config = BstConfig::default();
        config.device.default_vlan = 0;
        assert!(config.validate().is_err());
        config.device.default_vlan = 4095;
        assert!(config.validate().is_err());
        config.device.default_vlan = 4094;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = BstConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[device]
unit = 1

[simulator]
ports = 8
traffic = true
seed = 42
"#;
        let config: BstConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.device.unit, 1);
        assert_eq!(config.simulator.ports, 8);
        assert!(config.simulator.traffic);
        // Unspecified values should use defaults
        assert_eq!(config.device.default_vlan, 1);
        assert_eq!(config.simulator.max_cells, 4096);
        assert_eq!(config.logging.level, "warn");

        let sim = config.sim_config();
        assert_eq!(sim.unit, 1);
        assert_eq!(sim.seed, 42);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = BstConfig::load_or_default(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.simulator.ports, 32);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulator\nports = 8").unwrap();

        let err = BstConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, BstError::Config(_)));
    }

    #[test]
    fn test_load_nonexistent_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BstConfig::load_or_default(dir.path().join("missing.conf")).unwrap();
        assert_eq!(config, BstConfig::default());
    }
}
