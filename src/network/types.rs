//! Types shared by the coordinator and connectivity providers.

use strum_macros::EnumIter as EnumIterMacro;

/// Identifier of a registered network request.
pub type RequestId = u64;

/// Capabilities a requested network must offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Capability {
    /// Can reach the public internet
    Internet,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Internet => "internet",
        }
    }
}

/// Physical or virtual transport of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Transport {
    Cellular,
    Wifi,
    Bluetooth,
    Ethernet,
    Vpn,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Cellular => "cellular",
            Transport::Wifi => "wifi",
            Transport::Bluetooth => "bluetooth",
            Transport::Ethernet => "ethernet",
            Transport::Vpn => "vpn",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the coordinator asks a provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRequest {
    pub capabilities: Vec<Capability>,
    pub transports: Vec<Transport>,
    /// Transports the network must not use
    pub excluded_transports: Vec<Transport>,
}

impl NetworkRequest {
    /// Internet over cellular, explicitly excluding Wi-Fi and Bluetooth.
    pub fn cellular_internet() -> Self {
        Self {
            capabilities: vec![Capability::Internet],
            transports: vec![Transport::Cellular],
            excluded_transports: vec![Transport::Wifi, Transport::Bluetooth],
        }
    }

    /// Returns `true` if a network with `transports` satisfies this request.
    pub fn accepts(&self, transports: &[Transport]) -> bool {
        self.transports.iter().all(|t| transports.contains(t))
            && !self
                .excluded_transports
                .iter()
                .any(|t| transports.contains(t))
    }
}

/// Opaque reference to an acquired network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHandle {
    pub id: u64,
    /// Interface sockets should be bound to, if the provider knows it
    pub interface: Option<String>,
}

/// State of a `NetworkCoordinator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Idle,
    Requesting,
    Bound,
    Failed,
}

/// Description of one network, used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub name: String,
    pub transports: Vec<Transport>,
    pub capabilities: Vec<Capability>,
    /// Provider-specific state, e.g. `up` or `down`
    pub state: String,
    /// Hardware or network addresses
    pub addresses: Vec<String>,
}
