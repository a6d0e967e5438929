//! # netsweep Core
//!
//! Core engine for concurrent host discovery. Expands target
//! specifications (CIDR networks, IP ranges, hostnames) into individual
//! addresses, probes each one with the operating system's `ping` command
//! under a bounded worker pool, and aggregates per-host results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use netsweep_core::{SweepConfig, SweepEngine, Target};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SweepConfig::default();
//!     let engine = SweepEngine::new(config)?;
//!
//!     let targets = vec!["192.168.1.0/24".parse::<Target>()?];
//!     let results = engine.sweep(&targets).await?;
//!
//!     println!("{}", results.summary_line());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod enumerate;
pub mod error;
pub mod probe;
pub mod results;
pub mod sweep;
pub mod types;

// Re-export main types
pub use config::SweepConfig;
pub use error::{Error, Result};
pub use probe::{PingOptions, PingOptionsBuilder, PingOutcome, PingProbe};
pub use results::{HostResult, SweepResults, SweepStatistics};
pub use sweep::SweepEngine;
pub use types::{HostState, IpAddr, Target};

/// Current version of the netsweep core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
