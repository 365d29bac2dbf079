//! Connectivity provider abstraction.
//!
//! A provider is the platform's connectivity service: it knows whether mobile
//! data is on, can be asked for a network matching a request, reports the
//! outcome through a callback on its own thread, and can bind the process to
//! a network.

use std::sync::Arc;
use std::time::Duration;

use crate::error_handling::ProviderError;
use crate::network::types::{NetworkHandle, NetworkInfo, NetworkRequest, RequestId};

/// Receiver of network request outcomes.
///
/// Methods may be called from any thread, at most once each per request for
/// `on_available`/`on_unavailable`, and possibly after the request has been
/// unregistered.
pub trait NetworkCallback: Send + Sync {
    /// A network matching the request is available.
    fn on_available(&self, network: NetworkHandle);

    /// No matching network could be found, or the native timeout expired.
    fn on_unavailable(&self);

    /// A previously available network went away.
    fn on_lost(&self, network: NetworkHandle) {
        log::warn!("Network {} lost", network.id);
    }
}

/// Platform connectivity service.
pub trait ConnectivityProvider: Send + Sync {
    /// Returns `true` if mobile data is switched on.
    fn is_mobile_data_enabled(&self) -> bool;

    /// Returns `true` if `request_network` honours its timeout argument by
    /// calling `on_unavailable` when it expires.
    fn supports_request_timeout(&self) -> bool;

    /// Registers a request for a network.
    ///
    /// `timeout` is `Some` only when `supports_request_timeout` is `true`.
    fn request_network(
        &self,
        request: &NetworkRequest,
        callback: Arc<dyn NetworkCallback>,
        timeout: Option<Duration>,
    ) -> Result<RequestId, ProviderError>;

    /// Unregisters a request. Unknown or already removed ids are ignored.
    fn unregister_network_callback(&self, id: RequestId);

    /// Binds the process to `network`, or unbinds it when `None`.
    fn bind_process_to_network(&self, network: Option<&NetworkHandle>)
        -> Result<(), ProviderError>;

    /// Lists known networks for diagnostics.
    fn networks(&self) -> Vec<NetworkInfo> {
        Vec::new()
    }
}
