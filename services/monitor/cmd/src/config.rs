//! Configuration handling for the monitoring node.
//!
//! Settings come from an optional YAML file with environment-variable
//! overrides on top; command-line flags override both in `main`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::{info, warn};

/// Default datagram port for reports and configuration messages.
pub const DEFAULT_MONITOR_PORT: u16 = 6960;

/// Default size budget for one report datagram.
pub const DEFAULT_MAX_REPORT_BYTES: usize = 150;

/// Monitoring node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Listen address for configuration datagrams
    pub listen: SocketAddr,
    /// Collector address reports are sent to; reports are skipped when unset
    pub collector: Option<SocketAddr>,
    /// Size budget for one report datagram
    pub max_report_bytes: usize,
    /// Reporting interval in minutes until a configuration message arrives
    pub initial_interval_min: u32,
    /// Seed for the simulated diagnostics source
    pub sim_seed: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], DEFAULT_MONITOR_PORT)),
            collector: None,
            max_report_bytes: DEFAULT_MAX_REPORT_BYTES,
            initial_interval_min: 1,
            sim_seed: 1,
        }
    }
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    monitor: Option<NodeConfig>,
}

impl NodeConfig {
    /// Load configuration from file and environment variables.
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(content) = std::fs::read_to_string(&config_path) {
            match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root) => {
                    if let Some(monitor) = root.monitor {
                        config = monitor;
                    }
                    info!("Loaded configuration from {:?}", config_path.as_ref());
                }
                Err(err) => {
                    warn!(
                        "Failed to parse config file {:?} ({}), using defaults",
                        config_path.as_ref(),
                        err
                    );
                }
            }
        } else {
            warn!(
                "Config file {:?} not found, using defaults",
                config_path.as_ref()
            );
        }

        config.apply_environment_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides(&mut self) {
        if let Ok(listen) = std::env::var("MONITOR_LISTEN") {
            match listen.parse() {
                Ok(addr) => {
                    self.listen = addr;
                    info!("Listen address overridden by environment: {}", addr);
                }
                Err(_) => warn!("Ignoring invalid MONITOR_LISTEN: {}", listen),
            }
        }

        if let Ok(collector) = std::env::var("MONITOR_COLLECTOR") {
            match collector.parse() {
                Ok(addr) => {
                    self.collector = Some(addr);
                    info!("Collector address overridden by environment: {}", addr);
                }
                Err(_) => warn!("Ignoring invalid MONITOR_COLLECTOR: {}", collector),
            }
        }

        if let Ok(max_bytes) = std::env::var("MONITOR_MAX_REPORT_BYTES") {
            match max_bytes.parse() {
                Ok(bytes) => {
                    self.max_report_bytes = bytes;
                    info!("Report size budget overridden by environment: {}", bytes);
                }
                Err(_) => warn!("Ignoring invalid MONITOR_MAX_REPORT_BYTES: {}", max_bytes),
            }
        }
    }
}
