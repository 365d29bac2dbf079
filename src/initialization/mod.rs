//! Process-wide initialization.
//!
//! This module provides functions to initialize shared resources:
//! - The logger
//! - The rustls crypto provider
//! - The TLS client configuration used by the socket engine

mod logger;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use rustls::{ClientConfig, RootCertStore};

// Re-export public API
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. This must be called before
/// any TLS connections are established.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}

/// Builds the TLS client configuration used for `https` hops.
///
/// Trusts the Mozilla root set from `webpki-roots` and sends no client
/// certificate. The configuration is built against the ring provider
/// directly so it works whether or not [`init_crypto_provider`] ran first.
///
/// # Errors
///
/// Returns `InitializationError::TlsConfigError` if the provider rejects the
/// default protocol versions.
pub fn init_tls_config() -> Result<Arc<ClientConfig>, crate::error_handling::InitializationError> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_crypto_provider_is_idempotent() {
        init_crypto_provider();
        init_crypto_provider();
        assert!(CryptoProvider::get_default().is_some());
    }

    #[test]
    fn test_init_tls_config_has_roots() {
        let config = init_tls_config().expect("TLS config should build");
        assert!(config.alpn_protocols.is_empty());
        assert!(!webpki_roots::TLS_SERVER_ROOTS.is_empty());
    }
}
