//! Error type definitions.
//!
//! This module defines the errors raised by the socket engine, the
//! connectivity provider, and initialization, plus the error codes that
//! appear in check results.

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// Errors raised while performing one HTTP exchange over a raw socket.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The URL could not be parsed or has no host.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL uses a scheme other than http or https.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The TCP connection could not be established.
    #[error("Connection to {host}:{port} failed: {message}")]
    Connect {
        /// Host that was dialled
        host: String,
        /// Port that was dialled
        port: u16,
        /// Underlying socket error
        message: String,
    },

    /// The TLS session could not be set up.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Reading or writing the socket failed.
    #[error("Socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server closed the connection without sending anything.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The redirect chain did not end within the hop limit.
    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),
}

/// Errors reported by a connectivity provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The network request could not be registered.
    #[error("Network request registration failed: {0}")]
    Registration(String),

    /// Binding the process to the network failed, e.g. because the network
    /// disappeared between the availability callback and the bind.
    #[error("Binding to network failed: {0}")]
    Bind(String),
}

/// Error codes that appear in the `error` field of a check result.
///
/// The serialized names are part of the public contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Serialize)]
pub enum CheckErrorCode {
    /// The cellular network could not be acquired
    #[serde(rename = "sdk_no_data_connectivity")]
    NoDataConnectivity,
    /// A socket, TLS, or I/O failure during the exchange
    #[serde(rename = "sdk_connection_error")]
    ConnectionError,
    /// The redirect chain exceeded the hop limit
    #[serde(rename = "sdk_redirect_error")]
    RedirectError,
    /// Anything else
    #[serde(rename = "sdk_error")]
    Generic,
}

impl std::fmt::Display for CheckErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CheckErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckErrorCode::NoDataConnectivity => "sdk_no_data_connectivity",
            CheckErrorCode::ConnectionError => "sdk_connection_error",
            CheckErrorCode::RedirectError => "sdk_redirect_error",
            CheckErrorCode::Generic => "sdk_error",
        }
    }
}
