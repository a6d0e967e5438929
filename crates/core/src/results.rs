//! Sweep results and data structures for netsweep

use crate::types::{HostState, IpAddr, Target};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Complete results of one sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    /// Unique sweep ID
    pub sweep_id: Uuid,
    /// Sweep metadata
    pub metadata: SweepMetadata,
    /// Per-host results
    pub hosts: Vec<HostResult>,
    /// Sweep statistics
    pub statistics: SweepStatistics,
    /// Per-host errors that did not abort the sweep
    pub errors: Vec<SweepError>,
}

/// Sweep metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepMetadata {
    /// Sweep start time
    pub start_time: SystemTime,
    /// Sweep end time
    pub end_time: Option<SystemTime>,
    /// Total sweep duration
    pub duration: Option<Duration>,
    /// netsweep version
    pub version: String,
    /// Target specifications as given
    pub targets: Vec<String>,
    /// Command line that started the sweep
    pub command_line: Option<String>,
}

/// Result for a single host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostResult {
    /// Host IP address
    pub address: IpAddr,
    /// Hostname the address was resolved from, if any
    pub hostname: Option<String>,
    /// Host state
    pub state: HostState,
    /// Average round-trip time over successful attempts
    pub response_time: Option<Duration>,
    /// Number of ping attempts sent
    pub attempts: u32,
    /// Timestamp of the probe
    pub timestamp: SystemTime,
}

/// Aggregate sweep statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepStatistics {
    /// Total hosts probed
    pub hosts_total: u32,
    /// Hosts that responded
    pub hosts_up: u32,
    /// Hosts that did not respond
    pub hosts_down: u32,
    /// Hosts whose probe failed
    pub hosts_unknown: u32,
    /// Total ping attempts sent
    pub probes_sent: u64,
    /// Total sweep time
    pub sweep_time: Duration,
    /// Average response time over responding hosts
    pub avg_response_time: Option<Duration>,
}

/// A non-fatal error recorded against a single host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepError {
    /// Host the error occurred on
    pub address: IpAddr,
    /// Error message
    pub message: String,
    /// Error category
    pub category: String,
    /// Timestamp of the error
    pub timestamp: SystemTime,
}

impl SweepResults {
    /// Create empty results for a new sweep
    pub fn new(targets: &[Target]) -> Self {
        Self {
            sweep_id: Uuid::new_v4(),
            metadata: SweepMetadata {
                start_time: SystemTime::now(),
                end_time: None,
                duration: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                targets: targets.iter().map(|t| t.to_string()).collect(),
                command_line: None,
            },
            hosts: Vec::new(),
            statistics: SweepStatistics::default(),
            errors: Vec::new(),
        }
    }

    /// Record the command line that started the sweep
    pub fn set_command_line<S: Into<String>>(&mut self, command_line: S) {
        self.metadata.command_line = Some(command_line.into());
    }

    /// Add a host result
    pub fn add_host(&mut self, host: HostResult) {
        self.hosts.push(host);
    }

    /// Record a non-fatal per-host error
    pub fn add_error(&mut self, address: IpAddr, error: &crate::Error) {
        self.errors.push(SweepError {
            address,
            message: error.to_string(),
            category: error.category().to_string(),
            timestamp: SystemTime::now(),
        });
    }

    /// Close the sweep and recompute statistics
    pub fn finalize(&mut self, duration: Duration) {
        self.metadata.end_time = Some(SystemTime::now());
        self.metadata.duration = Some(duration);

        self.hosts.sort_by_key(|h| h.address);

        let mut stats = SweepStatistics {
            hosts_total: self.hosts.len() as u32,
            sweep_time: duration,
            ..Default::default()
        };

        let mut rtt_sum = Duration::ZERO;
        let mut rtt_count = 0u32;

        for host in &self.hosts {
            stats.probes_sent += host.attempts as u64;
            match host.state {
                HostState::Up => stats.hosts_up += 1,
                HostState::Down => stats.hosts_down += 1,
                HostState::Unknown => stats.hosts_unknown += 1,
            }
            if let Some(rtt) = host.response_time {
                rtt_sum += rtt;
                rtt_count += 1;
            }
        }

        if rtt_count > 0 {
            stats.avg_response_time = Some(rtt_sum / rtt_count);
        }

        self.statistics = stats;
    }

    /// Hosts that responded
    pub fn hosts_up(&self) -> impl Iterator<Item = &HostResult> {
        self.hosts.iter().filter(|h| h.state == HostState::Up)
    }

    /// Number of hosts that responded
    pub fn up_count(&self) -> usize {
        self.hosts_up().count()
    }

    /// One-line summary in the style of the console report
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} hosts up ({:.1}s)",
            self.statistics.hosts_up,
            self.statistics.hosts_total,
            self.statistics.sweep_time.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(addr: &str, state: HostState, rtt_ms: Option<u64>) -> HostResult {
        HostResult {
            address: addr.parse().unwrap(),
            hostname: None,
            state,
            response_time: rtt_ms.map(Duration::from_millis),
            attempts: 1,
            timestamp: SystemTime::now(),
        }
    }

    #[test]
    fn test_finalize_statistics() {
        let targets = vec![Target::cidr("192.168.1.0".parse().unwrap(), 30)];
        let mut results = SweepResults::new(&targets);

        results.add_host(host("192.168.1.2", HostState::Down, None));
        results.add_host(host("192.168.1.1", HostState::Up, Some(10)));

        results.finalize(Duration::from_secs(2));

        assert_eq!(results.statistics.hosts_total, 2);
        assert_eq!(results.statistics.hosts_up, 1);
        assert_eq!(results.statistics.hosts_down, 1);
        assert_eq!(results.statistics.probes_sent, 2);
        assert_eq!(
            results.statistics.avg_response_time,
            Some(Duration::from_millis(10))
        );

        // finalize() orders hosts by address
        assert_eq!(results.hosts[0].address, "192.168.1.1".parse().unwrap());
        assert_eq!(results.up_count(), 1);
    }

    #[test]
    fn test_summary_line() {
        let mut results = SweepResults::new(&[]);
        results.add_host(host("10.0.0.1", HostState::Up, Some(5)));
        results.add_host(host("10.0.0.2", HostState::Down, None));
        results.finalize(Duration::from_millis(1500));

        assert_eq!(results.summary_line(), "1/2 hosts up (1.5s)");
    }

    #[test]
    fn test_error_recording() {
        let mut results = SweepResults::new(&[]);
        let addr = "10.0.0.1".parse().unwrap();
        results.add_error(addr, &crate::Error::timeout(300));

        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].category, "timeout");
        assert!(results.errors[0].message.contains("300ms"));
    }

    #[test]
    fn test_results_serialization() {
        let mut results = SweepResults::new(&[Target::ip("127.0.0.1".parse().unwrap())]);
        results.add_host(host("127.0.0.1", HostState::Up, Some(1)));
        results.finalize(Duration::from_millis(100));

        let json = serde_json::to_string(&results).unwrap();
        let deserialized: SweepResults = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.sweep_id, results.sweep_id);
        assert_eq!(deserialized.hosts.len(), 1);
        assert_eq!(deserialized.metadata.targets, vec!["127.0.0.1"]);
    }
}
