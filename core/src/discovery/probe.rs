//! Raw ARP probing over a pnet datalink channel.
//!
//! This is the one place the core touches the OS network layer. Opening the
//! channel needs raw-socket capability (root or CAP_NET_RAW); when that is
//! missing the sweep fails as a whole.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use comet_common::error::DiscoveryError;
use pnet::datalink::{self, Channel, Config, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::util::MacAddr;
use tracing::{debug, warn};

use comet_common::network::range;

const ETH_HDR_LEN: usize = 14;
const ARP_LEN: usize = 28;
// Minimum ethernet frame size without the frame check sequence.
const MIN_ETH_FRAME_NO_FCS: usize = 60;

const READ_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// One ARP reply seen on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReply {
    pub mac: MacAddr,
    pub addr: Ipv4Addr,
}

/// The "broadcast a probe and collect replies within a timeout" capability.
pub trait ProbeTransport: Send + Sync {
    fn sweep(&self, block: Ipv4Network, timeout: Duration)
    -> Result<Vec<ProbeReply>, DiscoveryError>;
}

/// Production transport: one broadcast ARP request per host address of the
/// block, then a bounded read loop on the same channel.
pub struct DatalinkProbe;

impl ProbeTransport for DatalinkProbe {
    fn sweep(
        &self,
        block: Ipv4Network,
        timeout: Duration,
    ) -> Result<Vec<ProbeReply>, DiscoveryError> {
        let interface = routing_interface(block)?;
        let (src_mac, src_ip) = sender_identity(&interface, block)?;

        let config = Config {
            read_timeout: Some(READ_POLL_INTERVAL),
            ..Config::default()
        };
        let (mut tx, mut rx) = match datalink::channel(&interface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => {
                return Err(DiscoveryError::ChannelUnavailable {
                    interface: interface.name.clone(),
                    reason: "unsupported channel type".to_string(),
                });
            }
            Err(e) => {
                return Err(DiscoveryError::ChannelUnavailable {
                    interface: interface.name.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let mut sent = 0usize;
        for host in range::host_addrs(block) {
            if host == src_ip {
                continue;
            }
            let request = build_request(src_mac, src_ip, host);
            if let Some(Err(e)) = tx.send_to(&request, None) {
                return Err(DiscoveryError::ProbeSend(e));
            }
            sent += 1;
        }
        debug!(interface = %interface.name, sent, "broadcast ARP requests");

        let mut replies = Vec::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match rx.next() {
                Ok(frame) => {
                    if let Some(reply) = parse_reply(frame) {
                        replies.push(reply);
                    }
                }
                Err(e) if read_timed_out(&e) => continue,
                Err(e) => {
                    warn!(interface = %interface.name, %e, "datalink read failed, ending sweep");
                    break;
                }
            }
        }
        Ok(replies)
    }
}

/// Finds an up, non-loopback interface whose IPv4 network contains `block`.
fn routing_interface(block: Ipv4Network) -> Result<NetworkInterface, DiscoveryError> {
    datalink::interfaces()
        .into_iter()
        .filter(|iface| iface.is_up() && !iface.is_loopback() && iface.mac.is_some())
        .find(|iface| {
            iface.ips.iter().any(|net| match net {
                IpNetwork::V4(v4) => v4.contains(block.ip()),
                IpNetwork::V6(_) => false,
            })
        })
        .ok_or(DiscoveryError::NoRoute { block })
}

fn sender_identity(
    interface: &NetworkInterface,
    block: Ipv4Network,
) -> Result<(MacAddr, Ipv4Addr), DiscoveryError> {
    let mac = interface.mac.ok_or(DiscoveryError::NoRoute { block })?;
    let ip = interface
        .ips
        .iter()
        .find_map(|net| match net {
            IpNetwork::V4(v4) => Some(v4.ip()),
            IpNetwork::V6(_) => None,
        })
        .ok_or(DiscoveryError::NoRoute { block })?;
    Ok((mac, ip))
}

fn build_request(src_mac: MacAddr, src_ip: Ipv4Addr, dst_ip: Ipv4Addr) -> Vec<u8> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];

    // Buffer sizes are fixed above, so both constructors always succeed.
    if let Some(mut eth) = MutableEthernetPacket::new(&mut buffer[..ETH_HDR_LEN]) {
        eth.set_destination(MacAddr::broadcast());
        eth.set_source(src_mac);
        eth.set_ethertype(EtherTypes::Arp);
    }
    if let Some(mut arp) = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN]) {
        arp.set_hardware_type(ArpHardwareTypes::Ethernet);
        arp.set_protocol_type(EtherTypes::Ipv4);
        arp.set_hw_addr_len(6);
        arp.set_proto_addr_len(4);
        arp.set_operation(ArpOperations::Request);
        arp.set_sender_hw_addr(src_mac);
        arp.set_sender_proto_addr(src_ip);
        arp.set_target_hw_addr(MacAddr::zero());
        arp.set_target_proto_addr(dst_ip);
    }

    Vec::from(buffer)
}

/// Extracts the replying hardware address from an ARP reply frame.
/// Anything that is not a well-formed ARP reply yields `None`.
fn parse_reply(frame: &[u8]) -> Option<ProbeReply> {
    let eth = EthernetPacket::new(frame)?;
    if eth.get_ethertype() != EtherTypes::Arp {
        return None;
    }
    let arp = ArpPacket::new(eth.payload())?;
    if arp.get_operation() != ArpOperations::Reply {
        return None;
    }
    Some(ProbeReply {
        mac: arp.get_sender_hw_addr(),
        addr: arp.get_sender_proto_addr(),
    })
}

fn read_timed_out(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
