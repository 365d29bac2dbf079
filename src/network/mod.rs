//! Cellular network acquisition.
//!
//! This module provides:
//! - The `ConnectivityProvider` abstraction over the platform's connectivity service
//! - `NetworkCoordinator`, which acquires and releases the cellular network
//! - `InterfaceProvider`, a Linux provider backed by sysfs
//! - Diagnostics that dump the provider's networks into a trace

mod completion;
mod coordinator;
pub mod diagnostics;
mod interface;
mod provider;
mod types;

pub use completion::Completion;
pub use coordinator::NetworkCoordinator;
pub use interface::{classify_interface, InterfaceProvider};
pub use provider::{ConnectivityProvider, NetworkCallback};
pub use types::{
    AcquisitionState, Capability, NetworkHandle, NetworkInfo, NetworkRequest, RequestId,
    Transport,
};
