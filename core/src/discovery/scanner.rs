//! The ARP sweep and the vendor-prefix filter.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use comet_common::config::DiscoveryConfig;
use comet_common::device::DeviceDescriptor;
use comet_common::error::DiscoveryError;
use comet_common::network::hwaddr::HardwareAddr;
use pnet::ipnetwork::Ipv4Network;
use tracing::debug;

use super::probe::{DatalinkProbe, ProbeReply, ProbeTransport};

/// The scan contract: one bounded sweep of a block, yielding the matching
/// device descriptors. Callers must not depend on any ordering.
#[async_trait]
pub trait NetworkScanner: Send + Sync {
    async fn scan(
        &self,
        block: Ipv4Network,
        timeout: Duration,
    ) -> Result<HashSet<DeviceDescriptor>, DiscoveryError>;
}

/// Scanner that broadcasts one ARP request per host address and keeps the
/// replies carrying a configured vendor prefix.
///
/// The raw sweep blocks for up to `timeout`, so it runs on the blocking
/// thread pool rather than an async worker.
pub struct ArpScanner {
    prefixes: Vec<String>,
    probe: Arc<dyn ProbeTransport>,
}

impl ArpScanner {
    pub fn new(cfg: &DiscoveryConfig) -> Self {
        Self::with_probe(cfg, Arc::new(DatalinkProbe))
    }

    pub fn with_probe(cfg: &DiscoveryConfig, probe: Arc<dyn ProbeTransport>) -> Self {
        Self {
            prefixes: cfg.vendor_prefixes.clone(),
            probe,
        }
    }
}

#[async_trait]
impl NetworkScanner for ArpScanner {
    async fn scan(
        &self,
        block: Ipv4Network,
        timeout: Duration,
    ) -> Result<HashSet<DeviceDescriptor>, DiscoveryError> {
        let probe = self.probe.clone();
        let replies = tokio::task::spawn_blocking(move || probe.sweep(block, timeout))
            .await
            .map_err(|e| DiscoveryError::Internal(e.to_string()))??;

        debug!("collected {} ARP replies", replies.len());
        Ok(filter_replies(&replies, &self.prefixes))
    }
}

/// Normalizes each reply's hardware address and keeps it only when it starts
/// with one of the vendor prefixes. Replies are deduplicated by address.
fn filter_replies(replies: &[ProbeReply], prefixes: &[String]) -> HashSet<DeviceDescriptor> {
    replies
        .iter()
        .map(|reply| HardwareAddr::from(reply.mac))
        .filter(|mac| prefixes.iter().any(|prefix| mac.has_prefix(prefix)))
        .map(DeviceDescriptor::new)
        .collect()
}
