//! Output formatting for the netsweep CLI

use anyhow::{Context, Result};
use colored::*;
use netsweep_core::{HostState, SweepResults};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console report
    #[value(alias = "console", alias = "text")]
    Human,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Renders sweep results to the console or a file
pub struct OutputManager {
    format: OutputFormat,
    output_file: Option<PathBuf>,
    include_down: bool,
}

impl OutputManager {
    /// Create a new output manager with human console output
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Human,
            output_file: None,
            include_down: false,
        }
    }

    /// Set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write output to a file instead of stdout
    pub fn with_file<P: Into<PathBuf>>(mut self, file: P) -> Self {
        self.output_file = Some(file.into());
        self
    }

    /// Also list hosts that did not respond
    pub fn with_include_down(mut self, include_down: bool) -> Self {
        self.include_down = include_down;
        self
    }

    /// Render the results in the configured format
    pub fn write_report(&self, results: &SweepResults) -> Result<()> {
        let rendered = match self.format {
            // Color only makes sense on a terminal, not inside a file
            OutputFormat::Human => self.render_human(results, self.output_file.is_none()),
            OutputFormat::Json => serde_json::to_string_pretty(results)
                .context("Failed to serialize sweep results")?,
        };

        match &self.output_file {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                file.write_all(rendered.as_bytes())
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
                file.write_all(b"\n")?;
            }
            None => println!("{}", rendered),
        }

        Ok(())
    }

    /// Render the human-readable report
    fn render_human(&self, results: &SweepResults, color: bool) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "netsweep {} report for {}\n\n",
            results.metadata.version,
            results.metadata.targets.join(", ")
        ));

        for host in &results.hosts {
            if host.state != HostState::Up && !self.include_down {
                continue;
            }

            let state = if color {
                match host.state {
                    HostState::Up => "UP".green().bold().to_string(),
                    HostState::Down => "DOWN".red().to_string(),
                    HostState::Unknown => "UNKNOWN".yellow().to_string(),
                }
            } else {
                host.state.to_string().to_uppercase()
            };

            let rtt = host
                .response_time
                .map(|rtt| format!("  {:.2}ms", rtt.as_secs_f64() * 1000.0))
                .unwrap_or_default();

            out.push_str(&format!("{:<39} {}{}\n", host.address.to_string(), state, rtt));
        }

        out.push_str(&format!("\n{}", results.summary_line()));

        if !results.errors.is_empty() {
            out.push_str(&format!("\n{} probe errors:", results.errors.len()));
            for error in &results.errors {
                out.push_str(&format!("\n  {}: {}", error.address, error.message));
            }
        }

        out
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsweep_core::{HostResult, Target};
    use std::time::{Duration, SystemTime};
    use tempfile::NamedTempFile;

    fn sample_results() -> SweepResults {
        let mut results =
            SweepResults::new(&["192.0.2.0/30".parse::<Target>().unwrap()]);
        results.add_host(HostResult {
            address: "192.0.2.1".parse().unwrap(),
            hostname: None,
            state: HostState::Up,
            response_time: Some(Duration::from_millis(12)),
            attempts: 1,
            timestamp: SystemTime::now(),
        });
        results.add_host(HostResult {
            address: "192.0.2.2".parse().unwrap(),
            hostname: None,
            state: HostState::Down,
            response_time: None,
            attempts: 1,
            timestamp: SystemTime::now(),
        });
        results.finalize(Duration::from_millis(400));
        results
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_human_report_hides_down_hosts_by_default() {
        let manager = OutputManager::new();
        let report = manager.render_human(&sample_results(), false);

        assert!(report.contains("192.0.2.1"));
        assert!(!report.contains("192.0.2.2"));
        assert!(report.contains("1/2 hosts up"));
    }

    #[test]
    fn test_human_report_with_down_hosts() {
        let manager = OutputManager::new().with_include_down(true);
        let report = manager.render_human(&sample_results(), false);

        assert!(report.contains("192.0.2.1"));
        assert!(report.contains("UP"));
        assert!(report.contains("192.0.2.2"));
        assert!(report.contains("DOWN"));
        assert!(report.contains("12.00ms"));
    }

    #[test]
    fn test_json_report_to_file() {
        let file = NamedTempFile::new().unwrap();
        let manager = OutputManager::new()
            .with_format(OutputFormat::Json)
            .with_file(file.path().to_path_buf());

        manager.write_report(&sample_results()).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        let parsed: SweepResults = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.hosts.len(), 2);
        assert_eq!(parsed.statistics.hosts_up, 1);
    }

    #[test]
    fn test_human_report_to_file_is_plain() {
        let file = NamedTempFile::new().unwrap();
        let manager = OutputManager::new()
            .with_include_down(true)
            .with_file(file.path().to_path_buf());

        manager.write_report(&sample_results()).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        // No ANSI escapes in file output
        assert!(!written.contains('\x1b'));
        assert!(written.contains("DOWN"));
    }
}
