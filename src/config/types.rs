//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and library configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_CELLULAR_INTERFACE, MAX_REDIRECT_HOPS, NETWORK_ACQUISITION_TIMEOUT, PRODUCT_NAME,
    SDK_VERSION, SOCKET_READ_TIMEOUT_SECS, SYSFS_NET_ROOT, TCP_CONNECT_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Controls the time budgets of a check and the identity written into the
/// User-Agent header. Every field has a sensible default.
///
/// # Examples
///
/// ```
/// use cellular_check::CheckConfig;
/// use std::time::Duration;
///
/// let config = CheckConfig {
///     acquisition_timeout: Duration::from_secs(10),
///     ..Default::default()
/// };
/// assert_eq!(config.max_redirects, 10);
/// ```
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// How long to wait for the cellular network to become available
    pub acquisition_timeout: Duration,

    /// TCP connect timeout for each hop
    pub connect_timeout: Duration,

    /// Read timeout for each hop
    pub read_timeout: Duration,

    /// Maximum number of requests in one redirect chain
    pub max_redirects: usize,

    /// Product name for the User-Agent header
    pub product_name: String,

    /// Version for the User-Agent header
    pub sdk_version: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            acquisition_timeout: NETWORK_ACQUISITION_TIMEOUT,
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(SOCKET_READ_TIMEOUT_SECS),
            max_redirects: MAX_REDIRECT_HOPS,
            product_name: PRODUCT_NAME.to_string(),
            sdk_version: SDK_VERSION.to_string(),
        }
    }
}

/// Command-line interface of the `cellular_check` binary.
#[derive(Debug, Parser)]
#[command(name = "cellular_check", version, about = "Run phone checks over the cellular network")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Subcommands of the CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a check URL over cellular and follow its redirect chain
    Check(CheckCommand),
    /// Fetch a JSON document over cellular without following redirects
    Get(GetCommand),
}

/// Arguments of the `check` subcommand.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Check URL issued by the backend
    pub url: String,

    /// Bearer access token sent with the request
    #[arg(long)]
    pub access_token: Option<String>,

    /// Carrier operator code hint
    #[arg(long)]
    pub operator: Option<String>,

    /// Request id used for correlation
    #[arg(long)]
    pub request_id: Option<String>,

    /// PATCH the final JSON body back to the check URL
    #[arg(long)]
    pub patch_result: bool,
}

/// Arguments of the `get` subcommand.
#[derive(Debug, Args)]
pub struct GetCommand {
    /// URL returning a JSON document
    pub url: String,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct CommonOptions {
    /// Network interface that carries mobile data
    #[arg(long, global = true, default_value = DEFAULT_CELLULAR_INTERFACE)]
    pub interface: String,

    /// Directory listing the kernel's network interfaces
    #[arg(long, global = true, default_value = SYSFS_NET_ROOT, hide = true)]
    pub sysfs_root: PathBuf,

    /// Collect and print a protocol trace
    #[arg(long, global = true)]
    pub debug: bool,

    /// Mark requests as sandbox traffic
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Network acquisition timeout in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl CommonOptions {
    /// Builds the library configuration described by these options.
    pub fn check_config(&self) -> CheckConfig {
        CheckConfig {
            acquisition_timeout: Duration::from_millis(self.timeout_ms),
            ..Default::default()
        }
    }
}
