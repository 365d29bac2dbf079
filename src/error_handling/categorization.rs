//! Error categorization.
//!
//! Maps socket engine errors onto the error codes reported to callers.

use super::types::{CheckErrorCode, HttpError};

/// Categorizes an `HttpError` into a `CheckErrorCode`.
///
/// Socket, TLS, and I/O failures at any hop are connection errors; an
/// exhausted redirect chain is a redirect error. URL problems cannot be blamed
/// on the network and fall back to the generic code.
///
/// # Arguments
///
/// * `error` - The `HttpError` to categorize
///
/// # Returns
///
/// The appropriate `CheckErrorCode` for the error.
pub fn categorize_http_error(error: &HttpError) -> CheckErrorCode {
    match error {
        HttpError::Connect { .. }
        | HttpError::Tls(_)
        | HttpError::Io(_)
        | HttpError::EmptyResponse(_) => CheckErrorCode::ConnectionError,
        HttpError::TooManyRedirects(_) => CheckErrorCode::RedirectError,
        HttpError::InvalidUrl(_) | HttpError::UnsupportedScheme(_) => CheckErrorCode::Generic,
    }
}

impl HttpError {
    /// Returns the check error code for this error.
    pub fn error_code(&self) -> CheckErrorCode {
        categorize_http_error(self)
    }
}
