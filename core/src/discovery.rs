//! Device discovery: derive the local address range, sweep it with ARP, and
//! keep the replies whose hardware address carries a Comet vendor prefix.
//!
//! High-level callers use [`discover_devices`]; the pieces underneath are
//! seams ([`resolver::InterfaceProvider`], [`probe::ProbeTransport`]) so the
//! logic is testable without raw sockets.

use std::collections::HashSet;

use comet_common::config::DiscoveryConfig;
use comet_common::device::DeviceDescriptor;
use comet_common::error::DiscoveryError;
use tracing::info;

pub mod probe;
pub mod resolver;
pub mod scanner;

use resolver::AddressRangeResolver;
use scanner::{ArpScanner, NetworkScanner};

/// Executes one full discovery cycle against the local network.
///
/// Requires raw-socket capability; without it the cycle fails as a whole
/// with a [`DiscoveryError`] and no partial results.
pub async fn discover_devices(
    cfg: &DiscoveryConfig,
) -> Result<HashSet<DeviceDescriptor>, DiscoveryError> {
    let block = AddressRangeResolver::new(cfg).resolve();
    info!(%block, "scanning for Comet thermostats");

    let devices = ArpScanner::new(cfg).scan(block, cfg.scan_timeout).await?;
    info!("found {} Comet device(s)", devices.len());
    Ok(devices)
}
