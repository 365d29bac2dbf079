//! cellular_check library: phone checks over the cellular network
//!
//! This library forces an HTTP(S) request onto the device's cellular (mobile
//! data) network instead of Wi-Fi, follows the redirect chain the carrier
//! issues, and reports the outcome. It speaks HTTP/1.1 over raw sockets so
//! that plain-HTTP carrier redirects, cookies and odd bodies are handled the
//! same way on every hop.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cellular_check::network::InterfaceProvider;
//! use cellular_check::{CellularCheck, CheckConfig, CheckRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! cellular_check::initialization::init_crypto_provider();
//! let provider = Arc::new(InterfaceProvider::new("wwan0", "/sys/class/net"));
//! let check = CellularCheck::new(provider, CheckConfig::default())?;
//!
//! let result = check.run(&CheckRequest::new("https://example.com/check/123").with_debug(true));
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! All calls block. The connectivity provider delivers its callbacks on its
//! own threads; `CellularCheck` serialises its invocations.

pub mod check;
pub mod config;
pub mod error_handling;
pub mod http;
pub mod initialization;
pub mod network;
pub mod trace;
pub mod user_agent;
mod utils;

// Re-export public API
pub use check::{CellularCheck, CheckRequest, CheckResult};
pub use config::{CheckConfig, LogFormat, LogLevel};
pub use error_handling::{CheckErrorCode, HttpError, InitializationError, ProviderError};
pub use network::{ConnectivityProvider, NetworkCallback, NetworkCoordinator};
pub use trace::{TraceCollector, TraceInfo};
