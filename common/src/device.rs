use crate::network::hwaddr::HardwareAddr;

/// A thermostat found on the local network.
///
/// Identity is the hardware address. Descriptors are produced by a discovery
/// cycle and never mutated; a new cycle recomputes the whole set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceDescriptor {
    mac: HardwareAddr,
}

impl DeviceDescriptor {
    pub fn new(mac: HardwareAddr) -> Self {
        Self { mac }
    }

    pub fn mac(&self) -> HardwareAddr {
        self.mac
    }

    /// The device identifier used in topic paths: the canonical MAC.
    pub fn id(&self) -> String {
        self.mac.canonical()
    }

    /// Human-readable name derived from the last three MAC octets.
    pub fn display_name(&self) -> String {
        format!("Comet Thermostat {}", self.mac.short_id())
    }
}
