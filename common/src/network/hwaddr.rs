use std::fmt;
use std::str::FromStr;

use pnet::util::MacAddr;

/// A 6-byte hardware address in the canonical form used by the Comet
/// wire protocol: uppercase hexadecimal, no separators (`D43D39AABBCC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HardwareAddr([u8; 6]);

impl HardwareAddr {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Canonical representation: 12 uppercase hex digits, no separators.
    pub fn canonical(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }

    /// The last three octets, used for human-readable device names.
    pub fn short_id(&self) -> String {
        self.0[3..].iter().map(|b| format!("{b:02X}")).collect()
    }

    /// Whether this address belongs to the given vendor prefix.
    ///
    /// The prefix is compared against the canonical form, case-insensitively,
    /// so `d4:3d:39` and `D43D39` match the same devices.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let wanted: String = prefix
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .collect::<String>()
            .to_ascii_uppercase();
        !wanted.is_empty() && self.canonical().starts_with(&wanted)
    }
}

impl From<MacAddr> for HardwareAddr {
    fn from(mac: MacAddr) -> Self {
        Self([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for HardwareAddr {
    type Err = anyhow::Error;

    /// Accepts `AA:BB:CC:DD:EE:FF`, `AA-BB-CC-DD-EE-FF` and `AABBCCDDEEFF`,
    /// in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        anyhow::ensure!(
            digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit()),
            "invalid hardware address: {s:?}"
        );

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)?;
        }
        Ok(Self(octets))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
