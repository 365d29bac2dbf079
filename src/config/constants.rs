//! Configuration constants.
//!
//! This module defines the constants used throughout the crate, including
//! timeouts, protocol limits, and the identifiers written into requests.

use std::time::Duration;

// Network acquisition
/// Time budget for obtaining a cellular network from the connectivity provider.
///
/// Providers with a native request timeout receive this value directly; the
/// coordinator runs a software timer of the same length for the others.
pub const NETWORK_ACQUISITION_TIMEOUT: Duration = Duration::from_secs(5);

/// Extra time the coordinator waits beyond a provider-native timeout.
///
/// Gives the provider's own "unavailable" callback a chance to arrive first
/// while still guaranteeing the caller is never blocked indefinitely.
pub const NATIVE_TIMEOUT_GRACE: Duration = Duration::from_millis(500);

/// Interval at which the interface provider polls sysfs for link state.
pub const INTERFACE_POLL_INTERVAL: Duration = Duration::from_millis(100);

// Socket timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Socket read timeout in seconds
/// Degraded cellular links can stall mid-response; this bounds every read.
pub const SOCKET_READ_TIMEOUT_SECS: u64 = 5;
/// Socket write timeout in seconds
pub const SOCKET_WRITE_TIMEOUT_SECS: u64 = 5;

// Redirect handling
/// Maximum number of requests issued while following one redirect chain.
/// A chain that still redirects on the last hop ends with a redirect error.
pub const MAX_REDIRECT_HOPS: usize = 10;

// Ports
/// Default port for `http` URLs
pub const PORT_HTTP: u16 = 80;
/// Default port for `https` URLs
pub const PORT_HTTPS: u16 = 443;

// Response limits
/// Maximum response size in bytes (2MB)
/// Reading stops once this many bytes have been received.
pub const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024;

/// Read buffer size used when draining a response stream.
pub const READ_CHUNK_SIZE: usize = 4096;

// Identification
/// Product name reported in the User-Agent header.
pub const PRODUCT_NAME: &str = "tru-sdk-rust";

/// Version reported in the User-Agent header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

// Content types
/// Content types whose bodies are collected by the response parser.
pub const JSON_CONTENT_TYPES: &[&str] = &[
    "application/json",
    "application/hal+json",
    "application/problem+json",
];

/// Content type used for POST bodies when the caller does not supply one.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type used for PATCH bodies.
pub const CONTENT_TYPE_JSON_PATCH: &str = "application/json-patch+json";

/// Accept header sent with GET requests.
pub const ACCEPT_GET: &str = "text/html,application/xhtml+xml,application/xml,*/*";

/// Accept header sent with POST and PATCH requests.
pub const ACCEPT_ANY: &str = "*/*";

// Sysfs
/// Default location of the kernel's network interface directory.
pub const SYSFS_NET_ROOT: &str = "/sys/class/net";

/// Default cellular interface name used by the CLI.
pub const DEFAULT_CELLULAR_INTERFACE: &str = "wwan0";

/// Directory holding DMI identification strings.
pub const SYSFS_DMI_ROOT: &str = "/sys/class/dmi/id";

/// File holding the running kernel release.
pub const KERNEL_RELEASE_PATH: &str = "/proc/sys/kernel/osrelease";

/// Substrings of DMI vendor/product names that identify a virtual machine.
pub const HYPERVISOR_MARKERS: &[&str] = &[
    "qemu",
    "kvm",
    "virtualbox",
    "vmware",
    "bochs",
    "virtual machine",
    "android sdk",
];
