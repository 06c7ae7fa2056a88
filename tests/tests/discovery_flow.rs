//! Discovery scenarios against scripted probes and interface tables.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use comet_common::config::DiscoveryConfig;
use comet_core::discovery::probe::ProbeReply;
use comet_core::discovery::resolver::{AddressRangeResolver, InterfaceProvider};
use comet_core::discovery::scanner::{ArpScanner, NetworkScanner};
use comet_integration_tests::ScriptedProbe;
use pnet::util::MacAddr;

struct FakeInterfaces(HashMap<&'static str, Ipv4Addr>);

impl InterfaceProvider for FakeInterfaces {
    fn ipv4_addr(&self, name: &str) -> Option<Ipv4Addr> {
        self.0.get(name).copied()
    }
}

fn reply(mac: [u8; 6], last_octet: u8) -> ProbeReply {
    ProbeReply {
        mac: MacAddr(mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]),
        addr: Ipv4Addr::new(192, 168, 1, last_octet),
    }
}

#[tokio::test]
async fn resolves_range_then_filters_replies_by_vendor_prefix() {
    let cfg = DiscoveryConfig::default();

    let resolver = AddressRangeResolver::with_provider(
        &cfg,
        Box::new(FakeInterfaces(HashMap::from([(
            "wlan0",
            Ipv4Addr::new(192, 168, 1, 23),
        )]))),
    );
    let block = resolver.resolve();
    assert_eq!(block.to_string(), "192.168.1.0/24");

    let probe = ScriptedProbe {
        replies: vec![
            reply([0xD4, 0x3D, 0x39, 0xAA, 0xBB, 0xCC], 10), // Comet
            reply([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF], 11), // someone's laptop
            reply([0xD4, 0x3D, 0x39, 0xAA, 0xBB, 0xCC], 10), // duplicate reply
        ],
    };
    let scanner = ArpScanner::with_probe(&cfg, Arc::new(probe));
    let devices = scanner.scan(block, Duration::from_secs(3)).await.unwrap();

    assert_eq!(devices.len(), 1);
    let device = devices.iter().next().unwrap();
    assert_eq!(device.id(), "D43D39AABBCC");
    assert_eq!(device.display_name(), "Comet Thermostat AABBCC");
}

#[tokio::test]
async fn failed_interface_lookups_fall_back_to_default_block() {
    let cfg = DiscoveryConfig::default();
    let resolver =
        AddressRangeResolver::with_provider(&cfg, Box::new(FakeInterfaces(HashMap::new())));
    assert_eq!(resolver.resolve().to_string(), "192.168.1.0/24");
}

#[tokio::test]
async fn rediscovery_over_unchanged_network_is_stable() {
    let cfg = DiscoveryConfig::default();
    let probe = Arc::new(ScriptedProbe {
        replies: vec![
            reply([0xD4, 0x3D, 0x39, 0x00, 0x00, 0x01], 10),
            reply([0xD4, 0x3D, 0x39, 0x00, 0x00, 0x02], 11),
        ],
    });
    let scanner = ArpScanner::with_probe(&cfg, probe);
    let block = cfg.fallback_block;

    let first = scanner.scan(block, Duration::from_secs(1)).await.unwrap();
    let second = scanner.scan(block, Duration::from_secs(1)).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}
