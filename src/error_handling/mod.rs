//! Error handling.
//!
//! This module provides:
//! - Error type definitions for the socket engine, providers, and initialization
//! - The error codes reported in check results
//! - Categorization of engine errors into those codes
//!
//! Errors are categorized into:
//! - **Connectivity**: the cellular network was never acquired
//! - **Connection**: socket, TLS, or I/O failure at any hop
//! - **Redirect**: the redirect chain exceeded the hop limit
//! - **Generic**: anything else, including internal failures

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_http_error;
pub use types::{CheckErrorCode, HttpError, InitializationError, ProviderError};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_codes_are_unique() {
        let codes: Vec<&str> = CheckErrorCode::iter().map(|c| c.as_str()).collect();
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn test_error_code_wire_names() {
        assert_eq!(
            CheckErrorCode::NoDataConnectivity.as_str(),
            "sdk_no_data_connectivity"
        );
        assert_eq!(
            CheckErrorCode::ConnectionError.as_str(),
            "sdk_connection_error"
        );
        assert_eq!(CheckErrorCode::RedirectError.as_str(), "sdk_redirect_error");
        assert_eq!(CheckErrorCode::Generic.as_str(), "sdk_error");
    }

    #[test]
    fn test_error_code_serializes_to_wire_name() {
        for code in CheckErrorCode::iter() {
            let json = serde_json::to_string(&code).expect("code should serialize");
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(code.to_string(), code.as_str());
        }
    }

    #[test]
    fn test_categorize_connection_errors() {
        let connect = HttpError::Connect {
            host: "example.com".to_string(),
            port: 443,
            message: "connection refused".to_string(),
        };
        assert_eq!(connect.error_code(), CheckErrorCode::ConnectionError);

        let io = HttpError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));
        assert_eq!(io.error_code(), CheckErrorCode::ConnectionError);

        let empty = HttpError::EmptyResponse("example.com".to_string());
        assert_eq!(empty.error_code(), CheckErrorCode::ConnectionError);
    }

    #[test]
    fn test_categorize_redirect_and_generic_errors() {
        assert_eq!(
            HttpError::TooManyRedirects(10).error_code(),
            CheckErrorCode::RedirectError
        );
        assert_eq!(
            HttpError::InvalidUrl("nope".to_string()).error_code(),
            CheckErrorCode::Generic
        );
        assert_eq!(
            HttpError::UnsupportedScheme("ftp".to_string()).error_code(),
            CheckErrorCode::Generic
        );
    }

    #[test]
    fn test_connect_error_preserves_message() {
        let err = HttpError::Connect {
            host: "check.example.com".to_string(),
            port: 80,
            message: "network unreachable".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("check.example.com:80"));
        assert!(text.contains("network unreachable"));
    }
}
