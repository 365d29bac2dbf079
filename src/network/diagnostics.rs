//! Network diagnostics for debug traces.

use log::Level;

use crate::network::provider::ConnectivityProvider;
use crate::network::types::{NetworkInfo, Transport};
use crate::trace::TraceCollector;

const TAG: &str = "NetworkDiagnostics";

/// Formats one network as a single diagnostic line.
pub fn describe_network(network: &NetworkInfo) -> String {
    let transports: Vec<&str> = network.transports.iter().map(Transport::as_str).collect();
    let capabilities: Vec<&str> = network.capabilities.iter().map(|c| c.as_str()).collect();
    format!(
        "{} state={} transports=[{}] capabilities=[{}] addresses=[{}]",
        network.name,
        network.state,
        transports.join(","),
        capabilities.join(","),
        network.addresses.join(",")
    )
}

/// Records the provider's view of the networks as debug entries.
///
/// Returns the number of networks reported.
pub fn log_networks(
    provider: &dyn ConnectivityProvider,
    tracer: &TraceCollector,
    label: &str,
) -> usize {
    tracer.add_debug(Level::Debug, TAG, &format!("----- Networks ({}) -----", label));
    tracer.add_debug(
        Level::Debug,
        TAG,
        &format!("Mobile data enabled? {}", provider.is_mobile_data_enabled()),
    );

    let networks = provider.networks();
    for network in &networks {
        tracer.add_debug(Level::Debug, TAG, &describe_network(network));
    }
    let cellular = networks
        .iter()
        .filter(|n| n.transports.contains(&Transport::Cellular))
        .count();
    tracer.add_debug(
        Level::Debug,
        TAG,
        &format!("{} networks, {} cellular", networks.len(), cellular),
    );
    networks.len()
}
