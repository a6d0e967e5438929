//! Error types for netsweep core

use thiserror::Error;

/// Result type alias for netsweep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netsweep operations
#[derive(Error, Debug)]
pub enum Error {
    /// Parsing and validation errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout errors
    #[error("Operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The system `ping` binary could not be found
    #[error("'ping' command not found on this system")]
    PingUnavailable,

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Parsing and validation errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid IP address: {address}")]
    InvalidIpAddress { address: String },

    #[error("Invalid CIDR notation: {cidr}")]
    InvalidCidr { cidr: String },

    #[error("Invalid IP range: {range}")]
    InvalidRange { range: String },

    #[error("Invalid hostname: {hostname}")]
    InvalidHostname { hostname: String },

    #[error("Invalid target: {target}")]
    InvalidTarget { target: String },

    #[error("Invalid JSON: {reason}")]
    InvalidJson { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid concurrency setting: {value}")]
    InvalidConcurrency { value: usize },

    #[error("Invalid timeout value: {value}ms")]
    InvalidTimeout { value: u64 },

    #[error("Invalid probe count: {value}")]
    InvalidCount { value: u32 },

    #[error("Invalid host limit: {value}")]
    InvalidHostLimit { value: usize },

    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },
}

impl Error {
    /// Create a new parse error
    pub fn parse<E: Into<ParseError>>(error: E) -> Self {
        Error::Parse(error.into())
    }

    /// Create a new configuration error
    pub fn config<E: Into<ConfigError>>(error: E) -> Self {
        Error::Config(error.into())
    }

    /// Create a timeout error
    pub fn timeout(timeout_ms: u64) -> Self {
        Error::Timeout { timeout_ms }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is related to configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Parse(_))
    }

    /// Check if this error should abort a whole sweep rather than a single host
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::PingUnavailable | Error::Config(_))
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Parse(_) => "parse",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Timeout { .. } => "timeout",
            Error::PingUnavailable => "ping_unavailable",
            Error::Internal { .. } => "internal",
        }
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(err: std::net::AddrParseError) -> Self {
        Error::parse(ParseError::InvalidIpAddress {
            address: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::parse(ParseError::InvalidJson {
            reason: err.to_string(),
        })
    }
}
