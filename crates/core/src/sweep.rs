//! Sweep engine for netsweep
//!
//! Coordinates target expansion, the bounded worker pool, and result
//! aggregation for one sweep.

use crate::config::SweepConfig;
use crate::enumerate::expand_targets;
use crate::error::{Error, Result};
use crate::probe::PingProbe;
use crate::results::{HostResult, SweepResults};
use crate::types::{HostState, IpAddr, Target};

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Sweep engine
#[derive(Debug, Clone)]
pub struct SweepEngine {
    /// Configuration
    config: Arc<SweepConfig>,
    /// Ping probe runner
    probe: PingProbe,
}

impl SweepEngine {
    /// Create a new sweep engine with a validated configuration
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        let probe = PingProbe::from_config(&config);
        Ok(Self {
            config: Arc::new(config),
            probe,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Sweep all targets and report per-host states
    ///
    /// Probes run concurrently, bounded by `config.concurrency`. A failed
    /// probe marks its host `Unknown` and is recorded in the results; only a
    /// missing `ping` binary aborts the sweep.
    pub async fn sweep(&self, targets: &[Target]) -> Result<SweepResults> {
        let start = Instant::now();
        let mut results = SweepResults::new(targets);

        let targets = if self.config.resolve_hostnames {
            targets.to_vec()
        } else {
            targets
                .iter()
                .filter(|target| {
                    if matches!(target, Target::Hostname(_)) {
                        warn!("Hostname resolution disabled, skipping {}", target);
                        false
                    } else {
                        true
                    }
                })
                .cloned()
                .collect()
        };

        let ips = expand_targets(&targets, self.config.max_hosts).await?;
        info!(
            "Starting sweep of {} targets ({} hosts) with concurrency {}",
            targets.len(),
            ips.len(),
            self.config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = Vec::with_capacity(ips.len());

        for ip in ips {
            let probe = self.probe.clone();
            let semaphore = Arc::clone(&semaphore);

            let task = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| Error::internal("sweep semaphore closed"))?;
                probe.probe(ip).await
            });
            tasks.push((ip, task));
        }

        for (ip, task) in tasks {
            match task.await {
                Ok(Ok(outcome)) => {
                    info!("{} is {}", ip, outcome.state.to_string().to_uppercase());
                    results.add_host(HostResult {
                        address: outcome.address,
                        hostname: None,
                        state: outcome.state,
                        response_time: outcome.response_time,
                        attempts: outcome.attempts,
                        timestamp: outcome.timestamp,
                    });
                }
                Ok(Err(e)) if e.is_fatal() => {
                    return Err(e);
                }
                Ok(Err(e)) => {
                    warn!("Error pinging {}: {}", ip, e);
                    results.add_error(ip, &e);
                    results.add_host(unknown_host(ip, self.config.count));
                }
                Err(e) => {
                    warn!("Probe task for {} panicked: {}", ip, e);
                    results.add_error(ip, &Error::internal(e.to_string()));
                    results.add_host(unknown_host(ip, self.config.count));
                }
            }
        }

        results.finalize(start.elapsed());
        info!("Sweep finished: {}", results.summary_line());

        Ok(results)
    }
}

fn unknown_host(address: IpAddr, attempts: u32) -> HostResult {
    HostResult {
        address,
        hostname: None,
        state: HostState::Unknown,
        response_time: None,
        attempts,
        timestamp: std::time::SystemTime::now(),
    }
}
