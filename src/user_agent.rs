//! Device identity and User-Agent string.
//!
//! This module builds the `User-Agent` header value and the device summary
//! written at the top of every trace, and provides the emulator predicate
//! that decides whether requests are tagged as sandbox traffic.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::{
    CheckConfig, HYPERVISOR_MARKERS, KERNEL_RELEASE_PATH, SYSFS_DMI_ROOT,
};

const UNKNOWN: &str = "unknown";

/// Predicate deciding whether the process runs on an emulator or simulator.
pub type EmulatorPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Identity of the device and SDK, as reported to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Product name, e.g. `tru-sdk-rust`
    pub product: String,
    /// SDK version
    pub sdk_version: String,
    /// Platform name, e.g. `linux`
    pub platform: String,
    /// Operating system version, e.g. the kernel release
    pub os_version: String,
    /// Hardware vendor
    pub manufacturer: String,
    /// Hardware model
    pub model: String,
}

impl DeviceInfo {
    /// Detects the identity of the running device.
    ///
    /// Product name and version come from `config`; platform, OS version and
    /// hardware names are read from the system where available and reported
    /// as `unknown` otherwise.
    pub fn detect(config: &CheckConfig) -> Self {
        let dmi = Path::new(SYSFS_DMI_ROOT);
        Self {
            product: config.product_name.clone(),
            sdk_version: config.sdk_version.clone(),
            platform: std::env::consts::OS.to_string(),
            os_version: read_trimmed(Path::new(KERNEL_RELEASE_PATH))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            manufacturer: read_trimmed(&dmi.join("sys_vendor"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            model: read_trimmed(&dmi.join("product_name"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }

    /// Returns the User-Agent header value.
    ///
    /// Format: `<product-name>/<sdk-version> <platform>/<os-version>`.
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} {}/{}",
            self.product, self.sdk_version, self.platform, self.os_version
        )
    }

    /// Returns the one-line device summary used as a trace header.
    pub fn summary(&self) -> String {
        format!(
            "DeviceInfo: {}, {}, {}, {} User-Agent: {}",
            self.manufacturer,
            self.model,
            self.platform,
            self.os_version,
            self.user_agent()
        )
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns `true` if the DMI vendor or product name under `dmi_root` names a
/// known hypervisor.
///
/// Missing files count as "not an emulator".
pub fn is_emulator_dmi(dmi_root: &Path) -> bool {
    ["sys_vendor", "product_name"].iter().any(|file| {
        read_trimmed(&dmi_root.join(file))
            .map(|value| {
                let value = value.to_lowercase();
                HYPERVISOR_MARKERS.iter().any(|marker| value.contains(marker))
            })
            .unwrap_or(false)
    })
}

/// Returns the default emulator predicate, which inspects the host's DMI
/// strings.
pub fn default_emulator_predicate() -> EmulatorPredicate {
    Arc::new(|| is_emulator_dmi(Path::new(SYSFS_DMI_ROOT)))
}

/// Returns a predicate that always answers `value`.
pub fn fixed_emulator_predicate(value: bool) -> EmulatorPredicate {
    Arc::new(move || value)
}
