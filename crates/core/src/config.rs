//! Configuration management for netsweep

use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default number of concurrent probes
pub const DEFAULT_CONCURRENCY: usize = 32;

/// Default per-probe timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 300;

/// Default number of ping attempts per host
pub const DEFAULT_COUNT: u32 = 1;

/// Default interval between attempts to the same host
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Maximum number of addresses a single sweep may expand to
pub const MAX_SWEEP_HOSTS: usize = 65536;

/// Maximum allowed concurrency
pub const MAX_CONCURRENCY: usize = 1024;

/// Sweep configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Maximum number of concurrent probes
    pub concurrency: usize,
    /// Timeout for each ping attempt
    pub timeout: Duration,
    /// Number of ping attempts per host
    pub count: u32,
    /// Interval between attempts to the same host
    pub interval: Duration,
    /// Resolve hostname targets before sweeping
    pub resolve_hostnames: bool,
    /// Report hosts that did not respond
    pub include_down: bool,
    /// Upper bound on the number of addresses per sweep
    pub max_hosts: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            count: DEFAULT_COUNT,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            resolve_hostnames: true,
            include_down: false,
            max_hosts: MAX_SWEEP_HOSTS,
        }
    }
}

impl SweepConfig {
    /// Load configuration from a JSON or TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|_e| {
            Error::config(ConfigError::ConfigFileNotFound {
                path: path.as_ref().display().to_string(),
            })
        })?;

        let config: SweepConfig = match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content).map_err(|e| {
                Error::config(ConfigError::InvalidFormat {
                    reason: e.to_string(),
                })
            })?,
            _ => {
                return Err(Error::config(ConfigError::InvalidFormat {
                    reason: "Unsupported configuration file format".to_string(),
                }))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON or TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self).map_err(|e| {
                Error::config(ConfigError::InvalidFormat {
                    reason: e.to_string(),
                })
            })?,
            _ => {
                return Err(Error::config(ConfigError::InvalidFormat {
                    reason: "Unsupported configuration file format".to_string(),
                }))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(Error::config(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            }));
        }

        if self.timeout.is_zero() || self.timeout > Duration::from_secs(60) {
            return Err(Error::config(ConfigError::InvalidTimeout {
                value: self.timeout.as_millis() as u64,
            }));
        }

        if self.count == 0 || self.count > 10 {
            return Err(Error::config(ConfigError::InvalidCount { value: self.count }));
        }

        if self.max_hosts == 0 || self.max_hosts > MAX_SWEEP_HOSTS {
            return Err(Error::config(ConfigError::InvalidHostLimit {
                value: self.max_hosts,
            }));
        }

        Ok(())
    }
}
