//! Linux connectivity provider backed by sysfs.
//!
//! Treats one named interface (e.g. `wwan0`) as the cellular network. Mobile
//! data counts as enabled when the interface exists, and the network becomes
//! available once its `operstate` reads `up` (or `unknown`, which point-to-point
//! modem links report). Binding is done per socket through the interface name
//! carried in the `NetworkHandle`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::INTERFACE_POLL_INTERVAL;
use crate::error_handling::ProviderError;
use crate::network::provider::{ConnectivityProvider, NetworkCallback};
use crate::network::types::{
    Capability, NetworkHandle, NetworkInfo, NetworkRequest, RequestId, Transport,
};

const CELLULAR_PREFIXES: &[&str] = &["wwan", "rmnet", "ccmni", "wwp"];
const VPN_PREFIXES: &[&str] = &["tun", "tap", "wg", "ppp"];

/// Connectivity provider for a cellular modem interface.
pub struct InterfaceProvider {
    interface: String,
    sysfs_root: PathBuf,
    poll_interval: Duration,
    next_id: AtomicU64,
    registrations: Mutex<HashMap<RequestId, Arc<AtomicBool>>>,
    bound: Mutex<Option<NetworkHandle>>,
}

impl InterfaceProvider {
    /// Creates a provider for `interface` under `sysfs_root`
    /// (normally `/sys/class/net`).
    pub fn new(interface: impl Into<String>, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            interface: interface.into(),
            sysfs_root: sysfs_root.into(),
            poll_interval: INTERFACE_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
            registrations: Mutex::new(HashMap::new()),
            bound: Mutex::new(None),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The network the process is bound to, if any.
    pub fn bound_network(&self) -> Option<NetworkHandle> {
        self.bound
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Number of requests that are still registered.
    pub fn active_registrations(&self) -> usize {
        self.registrations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    fn interface_dir(&self) -> PathBuf {
        self.sysfs_root.join(&self.interface)
    }

    fn transports_of(&self, name: &str, dir: &Path) -> Vec<Transport> {
        if name == self.interface {
            return vec![Transport::Cellular];
        }
        classify_interface(name, dir)
    }
}

/// Returns `true` if the interface directory reports a usable link.
fn link_is_up(dir: &Path) -> bool {
    matches!(read_attr(dir, "operstate").as_deref(), Some("up") | Some("unknown"))
}

fn read_attr(dir: &Path, attr: &str) -> Option<String> {
    fs::read_to_string(dir.join(attr))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Guesses the transport of an interface from its name and sysfs layout.
pub fn classify_interface(name: &str, dir: &Path) -> Vec<Transport> {
    if CELLULAR_PREFIXES.iter().any(|p| name.starts_with(p)) {
        vec![Transport::Cellular]
    } else if name.starts_with("wl") || dir.join("wireless").is_dir() {
        vec![Transport::Wifi]
    } else if name.starts_with("bnep") || name.starts_with("bt") {
        vec![Transport::Bluetooth]
    } else if VPN_PREFIXES.iter().any(|p| name.starts_with(p)) {
        vec![Transport::Vpn]
    } else if name.starts_with("eth") || name.starts_with("en") {
        vec![Transport::Ethernet]
    } else {
        Vec::new()
    }
}

impl ConnectivityProvider for InterfaceProvider {
    fn is_mobile_data_enabled(&self) -> bool {
        self.interface_dir().is_dir()
    }

    fn supports_request_timeout(&self) -> bool {
        true
    }

    fn request_network(
        &self,
        request: &NetworkRequest,
        callback: Arc<dyn NetworkCallback>,
        timeout: Option<Duration>,
    ) -> Result<RequestId, ProviderError> {
        if !request.accepts(&[Transport::Cellular]) {
            return Err(ProviderError::Registration(format!(
                "interface {} only provides cellular",
                self.interface
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let cancelled = Arc::new(AtomicBool::new(false));
        let dir = self.interface_dir();
        let interface = self.interface.clone();
        let poll = self.poll_interval;
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let flag = cancelled.clone();

        thread::Builder::new()
            .name(format!("cellular-watch-{}", id))
            .spawn(move || loop {
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                if link_is_up(&dir) {
                    log::debug!("Interface {} is up", interface);
                    callback.on_available(NetworkHandle {
                        id,
                        interface: Some(interface),
                    });
                    return;
                }
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    log::debug!("Interface {} did not come up in time", interface);
                    callback.on_unavailable();
                    return;
                }
                thread::sleep(poll);
            })
            .map_err(|e| ProviderError::Registration(e.to_string()))?;

        self.registrations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(id, cancelled);
        Ok(id)
    }

    fn unregister_network_callback(&self, id: RequestId) {
        let removed = self
            .registrations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&id);
        if let Some(flag) = removed {
            flag.store(true, Ordering::SeqCst);
        }
    }

    fn bind_process_to_network(
        &self,
        network: Option<&NetworkHandle>,
    ) -> Result<(), ProviderError> {
        if let Some(handle) = network {
            let dir = handle
                .interface
                .as_ref()
                .map(|name| self.sysfs_root.join(name))
                .ok_or_else(|| ProviderError::Bind("network has no interface".to_string()))?;
            if !dir.is_dir() {
                return Err(ProviderError::Bind(format!(
                    "interface {} disappeared",
                    dir.display()
                )));
            }
        }
        *self.bound.lock().unwrap_or_else(|p| p.into_inner()) = network.cloned();
        Ok(())
    }

    fn networks(&self) -> Vec<NetworkInfo> {
        let entries = match fs::read_dir(&self.sysfs_root) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot list {}: {}", self.sysfs_root.display(), e);
                return Vec::new();
            }
        };

        let mut networks: Vec<NetworkInfo> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name == "lo" {
                    return None;
                }
                let dir = entry.path();
                let state = read_attr(&dir, "operstate").unwrap_or_else(|| "unknown".into());
                let capabilities = if link_is_up(&dir) {
                    vec![Capability::Internet]
                } else {
                    Vec::new()
                };
                Some(NetworkInfo {
                    transports: self.transports_of(&name, &dir),
                    capabilities,
                    state,
                    addresses: read_attr(&dir, "address").into_iter().collect(),
                    name,
                })
            })
            .collect();
        networks.sort_by(|a, b| a.name.cmp(&b.name));
        networks
    }
}
