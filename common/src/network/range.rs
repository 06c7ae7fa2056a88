use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// Derives the /24 block covering `ip` by zeroing the last octet.
///
/// This mirrors what the thermostats' own setup tooling assumes: a flat
/// home LAN with a 24-bit netmask.
pub fn host_block(ip: Ipv4Addr) -> anyhow::Result<Ipv4Network> {
    let [a, b, c, _] = ip.octets();
    let network = Ipv4Network::new(Ipv4Addr::new(a, b, c, 0), 24)?;
    Ok(network)
}

/// The block scanned when no interface yields a usable address.
pub fn default_block() -> Ipv4Network {
    Ipv4Network::new(Ipv4Addr::new(192, 168, 1, 0), 24).expect("static /24 block")
}

/// Host addresses of a block, excluding the network and broadcast addresses.
pub fn host_addrs(block: Ipv4Network) -> impl Iterator<Item = Ipv4Addr> {
    let network = block.network();
    let broadcast = block.broadcast();
    block.iter().filter(move |ip| *ip != network && *ip != broadcast)
}
