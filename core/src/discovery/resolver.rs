//! Determines which /24 block to sweep.

use std::net::Ipv4Addr;

use comet_common::config::DiscoveryConfig;
use comet_common::network::range;
use pnet::datalink;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use tracing::{debug, warn};

/// The "what address does this interface have" capability, kept abstract so
/// the resolver can be exercised against synthetic interface states.
pub trait InterfaceProvider: Send + Sync {
    /// First IPv4 address assigned to the named interface, if any.
    fn ipv4_addr(&self, name: &str) -> Option<Ipv4Addr>;
}

/// Production provider backed by the operating system's interface table.
pub struct SystemInterfaces;

impl InterfaceProvider for SystemInterfaces {
    fn ipv4_addr(&self, name: &str) -> Option<Ipv4Addr> {
        datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name && iface.is_up())
            .and_then(|iface| {
                iface.ips.iter().find_map(|net| match net {
                    IpNetwork::V4(v4) => Some(v4.ip()),
                    IpNetwork::V6(_) => None,
                })
            })
    }
}

/// Walks a fixed, ordered interface candidate list and derives the /24
/// block of the first one with an IPv4 address.
///
/// Lookup failures are never surfaced; each one just means "try the next
/// interface", and exhausting the list falls back to the configured default
/// block.
pub struct AddressRangeResolver {
    candidates: Vec<String>,
    fallback: Ipv4Network,
    provider: Box<dyn InterfaceProvider>,
}

impl AddressRangeResolver {
    pub fn new(cfg: &DiscoveryConfig) -> Self {
        Self::with_provider(cfg, Box::new(SystemInterfaces))
    }

    pub fn with_provider(cfg: &DiscoveryConfig, provider: Box<dyn InterfaceProvider>) -> Self {
        Self {
            candidates: cfg.interfaces.clone(),
            fallback: cfg.fallback_block,
            provider,
        }
    }

    pub fn resolve(&self) -> Ipv4Network {
        for name in &self.candidates {
            let Some(ip) = self.provider.ipv4_addr(name) else {
                debug!(interface = %name, "no IPv4 address, trying next interface");
                continue;
            };
            match range::host_block(ip) {
                Ok(block) => {
                    debug!(interface = %name, %block, "resolved local address range");
                    return block;
                }
                Err(e) => {
                    debug!(interface = %name, %e, "unusable address, trying next interface");
                }
            }
        }

        warn!(
            "could not determine local address range, using default {}",
            self.fallback
        );
        self.fallback
    }
}
