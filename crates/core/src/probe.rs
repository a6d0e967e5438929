//! Ping probe implementation for netsweep
//!
//! Probes a single host by invoking the operating system's `ping` command
//! with a one-packet, bounded-timeout invocation. Using the system binary
//! avoids the raw-socket privileges an in-process ICMP implementation would
//! require.

use crate::config::SweepConfig;
use crate::error::{Error, Result};
use crate::types::{HostState, IpAddr};

use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::{Duration, Instant, SystemTime};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{trace, warn};

/// Extra time granted to the `ping` child process beyond its own timeout
/// before it is killed.
const WATCHDOG_SLACK: Duration = Duration::from_secs(2);

/// Ping probe options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingOptions {
    /// Timeout for each ping attempt
    pub timeout: Duration,
    /// Number of attempts per host
    pub count: u32,
    /// Interval between attempts
    pub interval: Duration,
}

impl Default for PingOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS),
            count: crate::config::DEFAULT_COUNT,
            interval: Duration::from_millis(crate::config::DEFAULT_INTERVAL_MS),
        }
    }
}

/// Builder for [`PingOptions`]
#[derive(Debug, Default)]
pub struct PingOptionsBuilder {
    options: PingOptions,
}

impl PingOptionsBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the number of attempts per host
    pub fn count(mut self, count: u32) -> Self {
        self.options.count = count;
        self
    }

    /// Set the interval between attempts
    pub fn interval(mut self, interval: Duration) -> Self {
        self.options.interval = interval;
        self
    }

    /// Build the options
    pub fn build(self) -> PingOptions {
        self.options
    }
}

/// Outcome of probing a single host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingOutcome {
    /// Probed address
    pub address: IpAddr,
    /// Host state after all attempts
    pub state: HostState,
    /// Average round-trip time over successful attempts
    ///
    /// Measured around the child process, so this is an upper bound on the
    /// true network RTT.
    pub response_time: Option<Duration>,
    /// Number of attempts sent
    pub attempts: u32,
    /// Timestamp of the probe
    pub timestamp: SystemTime,
}

/// Ping probe runner
#[derive(Debug, Clone)]
pub struct PingProbe {
    options: PingOptions,
}

impl PingProbe {
    /// Create a new probe with the given options
    pub fn new(options: PingOptions) -> Self {
        Self { options }
    }

    /// Create a probe from a sweep configuration
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(PingOptions {
            timeout: config.timeout,
            count: config.count,
            interval: config.interval,
        })
    }

    /// Probe options in use
    pub fn options(&self) -> &PingOptions {
        &self.options
    }

    /// Probe a single host
    ///
    /// The host is considered up if any attempt receives a reply.
    pub async fn probe(&self, address: IpAddr) -> Result<PingOutcome> {
        let mut rtts = Vec::new();

        for attempt in 0..self.options.count {
            if attempt > 0 {
                tokio::time::sleep(self.options.interval).await;
            }

            match self.ping_once(address).await? {
                Some(rtt) => {
                    trace!(
                        "ping {} attempt {}: reply in {:.2}ms",
                        address,
                        attempt + 1,
                        rtt.as_secs_f64() * 1000.0
                    );
                    rtts.push(rtt);
                }
                None => {
                    trace!("ping {} attempt {}: no reply", address, attempt + 1);
                }
            }
        }

        let state = if rtts.is_empty() {
            HostState::Down
        } else {
            HostState::Up
        };

        let response_time = if rtts.is_empty() {
            None
        } else {
            Some(rtts.iter().sum::<Duration>() / rtts.len() as u32)
        };

        Ok(PingOutcome {
            address,
            state,
            response_time,
            attempts: self.options.count,
            timestamp: SystemTime::now(),
        })
    }

    /// Send one ping and wait for the result
    ///
    /// Returns `Ok(Some(rtt))` on a reply, `Ok(None)` when the host did not
    /// answer within the timeout.
    async fn ping_once(&self, address: IpAddr) -> Result<Option<Duration>> {
        let (program, args) = ping_command(address, self.options.timeout);

        let start = Instant::now();
        let mut child = Command::new(program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::PingUnavailable
                } else {
                    Error::Io(e)
                }
            })?;

        // The ping binary enforces the timeout itself; the watchdog only
        // covers a hung child.
        let watchdog = self.options.timeout + WATCHDOG_SLACK;
        let status = match timeout(watchdog, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                warn!("ping {} did not exit within {:?}, killing", address, watchdog);
                let _ = child.kill().await;
                return Ok(None);
            }
        };

        if status.success() {
            Ok(Some(start.elapsed()))
        } else {
            Ok(None)
        }
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new(PingOptions::default())
    }
}

/// Build the OS-appropriate ping invocation for a single echo request
#[cfg(target_os = "windows")]
fn ping_command(address: IpAddr, timeout: Duration) -> (&'static str, Vec<String>) {
    // -n 1 => one echo request, -w <ms> => reply timeout in milliseconds
    (
        "ping",
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().max(1).to_string(),
            address.to_string(),
        ],
    )
}

/// Build the OS-appropriate ping invocation for a single echo request
#[cfg(not(target_os = "windows"))]
fn ping_command(address: IpAddr, timeout: Duration) -> (&'static str, Vec<String>) {
    // -c 1 => one echo request, -W <secs> => reply timeout in whole seconds
    // (rounded up, minimum 1s)
    let secs = ((timeout.as_millis() as u64 + 999) / 1000).max(1);

    let program = if address.is_ipv6() {
        if cfg!(any(target_os = "macos", target_os = "freebsd")) {
            "ping6"
        } else {
            "ping"
        }
    } else {
        "ping"
    };

    let mut args = Vec::new();
    if address.is_ipv6() && program == "ping" {
        args.push("-6".to_string());
    }
    args.extend([
        "-c".to_string(),
        "1".to_string(),
        "-W".to_string(),
        secs.to_string(),
        address.to_string(),
    ]);

    (program, args)
}
