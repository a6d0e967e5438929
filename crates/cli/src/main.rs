//! netsweep CLI - concurrent host discovery over CIDR ranges

mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use netsweep_core::{Error, SweepConfig, SweepEngine, Target};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use output::{OutputFormat, OutputManager};

/// netsweep - concurrent host discovery
#[derive(Parser, Debug)]
#[command(name = "netsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ping every host in a network range and report which ones answered")]
struct Cli {
    /// Targets to sweep (CIDR, single IP, IP range, or hostname)
    #[arg(value_name = "TARGET", required = true)]
    targets: Vec<String>,

    /// Maximum number of concurrent probes [default: 32]
    #[arg(short = 'c', long = "concurrency", value_name = "NUM")]
    concurrency: Option<usize>,

    /// Per-probe timeout in milliseconds [default: 300]
    #[arg(short = 't', long = "timeout", value_name = "MS")]
    timeout: Option<u64>,

    /// Ping attempts per host [default: 1]
    #[arg(long = "count", value_name = "NUM")]
    count: Option<u32>,

    /// Interval between attempts to the same host, in milliseconds [default: 1000]
    #[arg(long = "interval", value_name = "MS")]
    interval: Option<u64>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
    output_format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// Also list hosts that did not respond
    #[arg(long = "include-down")]
    include_down: bool,

    /// Load sweep settings from a JSON or TOML file
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli).context("Failed to initialize logging")?;
    debug!("CLI arguments: {:?}", cli);

    let config = build_config(&cli)?;
    let targets = parse_targets(&cli.targets)?;

    info!(
        "Sweeping {} target(s) with concurrency {} and timeout {:?}",
        targets.len(),
        config.concurrency,
        config.timeout
    );

    let include_down = cli.include_down || config.include_down;
    let engine = SweepEngine::new(config).context("Invalid sweep configuration")?;

    let mut results = match engine.sweep(&targets).await {
        Ok(results) => results,
        Err(e @ Error::PingUnavailable) => {
            eprintln!("{}", e.to_string().red().bold());
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Sweep failed"),
    };
    results.set_command_line(std::env::args().collect::<Vec<_>>().join(" "));

    let mut manager = OutputManager::new()
        .with_format(cli.output_format)
        .with_include_down(include_down);
    if let Some(file) = &cli.output_file {
        manager = manager.with_file(file.clone());
    }
    manager.write_report(&results)?;

    Ok(())
}

/// Initialize logging based on CLI arguments
fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = if cli.quiet {
        tracing::Level::ERROR
    } else {
        match cli.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(log_level)),
        )
        .init();

    Ok(())
}

/// Build the sweep configuration from an optional config file and CLI flags
///
/// Flags given on the command line override file settings.
fn build_config(cli: &Cli) -> Result<SweepConfig> {
    let mut config = match &cli.config {
        Some(path) => SweepConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => SweepConfig::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_ms) = cli.timeout {
        config.timeout = Duration::from_millis(timeout_ms);
    }
    if let Some(count) = cli.count {
        config.count = count;
    }
    if let Some(interval_ms) = cli.interval {
        config.interval = Duration::from_millis(interval_ms);
    }
    if cli.include_down {
        config.include_down = true;
    }

    config.validate().context("Invalid sweep settings")?;
    Ok(config)
}

/// Parse target strings into sweep targets
fn parse_targets(target_strs: &[String]) -> Result<Vec<Target>> {
    let mut targets = Vec::with_capacity(target_strs.len());
    for target_str in target_strs {
        let target = target_str
            .parse::<Target>()
            .with_context(|| format!("Failed to parse target: {}", target_str))?;
        targets.push(target);
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_args(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("netsweep").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_defaults() {
        let cli = cli_with_args(&["192.168.1.0/24"]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.concurrency, 32);
        assert_eq!(config.timeout, Duration::from_millis(300));
        assert_eq!(config.count, 1);
        assert_eq!(cli.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = cli_with_args(&[
            "192.168.1.0/24",
            "-c",
            "64",
            "-t",
            "500",
            "--count",
            "2",
            "--include-down",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.concurrency, 64);
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.count, 2);
        assert!(config.include_down);
    }

    #[test]
    fn test_output_format_aliases() {
        // The clap value parser accepts the same aliases as FromStr
        let cli = cli_with_args(&["192.168.1.0/24", "-o", "text"]);
        assert_eq!(cli.output_format, OutputFormat::Human);

        let cli = cli_with_args(&["192.168.1.0/24", "-o", "console"]);
        assert_eq!(cli.output_format, OutputFormat::Human);

        let cli = cli_with_args(&["192.168.1.0/24", "-o", "json"]);
        assert_eq!(cli.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_invalid_settings() {
        let cli = cli_with_args(&["192.168.1.0/24", "-c", "0"]);
        assert!(build_config(&cli).is_err());

        let cli = cli_with_args(&["192.168.1.0/24", "-t", "0"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_config_file_with_flag_override() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().with_extension("json");
        SweepConfig {
            concurrency: 16,
            ..Default::default()
        }
        .to_file(&path)
        .unwrap();

        let path_str = path.to_str().unwrap();
        let cli = cli_with_args(&["10.0.0.0/24", "--config", path_str]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.concurrency, 16);

        let cli = cli_with_args(&["10.0.0.0/24", "--config", path_str, "-c", "8"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.concurrency, 8);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_parse_targets() {
        let targets = parse_targets(&[
            "192.168.1.0/24".to_string(),
            "10.0.0.1".to_string(),
            "10.0.0.1-10.0.0.5".to_string(),
        ])
        .unwrap();
        assert_eq!(targets.len(), 3);
        assert!(matches!(targets[0], Target::Cidr { prefix: 24, .. }));

        assert!(parse_targets(&["10.0.0.0/99".to_string()]).is_err());
    }
}
