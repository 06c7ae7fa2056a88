use std::time::Duration;

use pnet::ipnetwork::Ipv4Network;

use crate::network::range;

/// Settings that drive device discovery.
///
/// These were process-wide constants in earlier iterations; they are now an
/// explicit structure handed to the resolver and scanner at construction so
/// nothing reads hidden globals.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Interface names to probe for a local address, in priority order.
    pub interfaces: Vec<String>,
    /// MAC prefixes identifying Comet devices, canonical hex form.
    pub vendor_prefixes: Vec<String>,
    /// Block scanned when no interface yields an address.
    pub fallback_block: Ipv4Network,
    /// How long the ARP sweep collects replies.
    pub scan_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interfaces: ["eth0", "eth1", "wlan0", "wlan1"]
                .map(String::from)
                .to_vec(),
            vendor_prefixes: vec!["D43D39".to_string()],
            fallback_block: range::default_block(),
            scan_timeout: Duration::from_secs(3),
        }
    }
}

/// Connection settings for the MQTT broker the thermostats publish to.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: String,
    pub keep_alive: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            username: None,
            password: None,
            client_id: "cometd".to_string(),
            keep_alive: Duration::from_secs(60),
        }
    }
}
