use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Address count reported for IPv6 blocks wider than a /64.
pub const IPV6_COUNT_CEILING: u128 = u128::MAX;

/// Address family of a CIDR block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    Ipv4,
    Ipv6,
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpVersion::Ipv4 => write!(f, "ipv4"),
            IpVersion::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// Derived facts about a CIDR block. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidrInfo {
    pub version: IpVersion,
    /// Canonical, network-aligned notation
    pub cidr: String,
    pub network_address: String,
    pub prefix_length: u8,
    /// None for IPv4 /31 and /32, and always for IPv6
    pub broadcast_address: Option<String>,
    /// Network address + 1 for IPv4 prefixes below /31
    pub gateway_address: Option<String>,
    pub total_addresses: u128,
    pub usable_addresses: u128,
}

impl CidrInfo {
    pub fn is_ipv4(&self) -> bool {
        self.version == IpVersion::Ipv4
    }

    pub(crate) fn from_block(block: &Block) -> Self {
        match block {
            Block::V4(net) => {
                let marks = Ipv4Landmarks::of(net);
                let total = ipv4_total(net);
                let usable = if net.prefix_len() < 31 {
                    total.saturating_sub(2)
                } else {
                    total
                };
                CidrInfo {
                    version: IpVersion::Ipv4,
                    cidr: net.to_string(),
                    network_address: marks.network.to_string(),
                    prefix_length: net.prefix_len(),
                    broadcast_address: marks.broadcast.map(|a| a.to_string()),
                    gateway_address: marks.gateway.map(|a| a.to_string()),
                    total_addresses: total,
                    usable_addresses: usable,
                }
            }
            Block::V6(net) => {
                let total = if net.prefix_len() >= 64 {
                    1u128 << (128 - net.prefix_len())
                } else {
                    IPV6_COUNT_CEILING
                };
                CidrInfo {
                    version: IpVersion::Ipv6,
                    cidr: net.to_string(),
                    network_address: net.network().to_string(),
                    prefix_length: net.prefix_len(),
                    broadcast_address: None,
                    gateway_address: None,
                    total_addresses: total,
                    usable_addresses: total,
                }
            }
        }
    }
}

/// Parse `a.b.c.d/n` or `addr/n` into its derived facts.
///
/// Host bits in the input are cleared: `192.168.1.5/24` yields the
/// canonical `192.168.1.0/24`. Returns `None` for malformed notation,
/// out-of-range octets or an out-of-range prefix.
pub fn parse_cidr(input: &str) -> Option<CidrInfo> {
    parse_block(input).map(|(block, _)| CidrInfo::from_block(&block))
}

/// A parsed, network-aligned CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block {
    V4(Ipv4Net),
    V6(Ipv6Net),
}

impl Block {
    pub(crate) fn version(&self) -> IpVersion {
        match self {
            Block::V4(_) => IpVersion::Ipv4,
            Block::V6(_) => IpVersion::Ipv6,
        }
    }

    /// Inclusive numeric range `[first, last]` covered by the block.
    pub(crate) fn bounds(&self) -> (u128, u128) {
        match self {
            Block::V4(net) => (
                u32::from(net.network()) as u128,
                u32::from(net.broadcast()) as u128,
            ),
            Block::V6(net) => (u128::from(net.network()), u128::from(net.broadcast())),
        }
    }
}

/// Split and parse CIDR notation. Also returns the literal address as typed,
/// so callers can tell whether host bits were corrected.
pub(crate) fn parse_block(input: &str) -> Option<(Block, IpAddr)> {
    let (addr, prefix) = input.trim().split_once('/')?;
    if prefix.is_empty() || prefix.len() > 3 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let prefix: u8 = prefix.parse().ok()?;
    let literal: IpAddr = addr.parse().ok()?;

    let block = match literal {
        IpAddr::V4(a) => Block::V4(Ipv4Net::new(a, prefix).ok()?.trunc()),
        IpAddr::V6(a) => Block::V6(Ipv6Net::new(a, prefix).ok()?.trunc()),
    };
    Some((block, literal))
}

pub(crate) fn ipv4_total(net: &Ipv4Net) -> u128 {
    1u128 << (32 - net.prefix_len())
}

/// Structural addresses of an IPv4 block. Both `parse_cidr` and record
/// generation classify against these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ipv4Landmarks {
    pub network: Ipv4Addr,
    pub gateway: Option<Ipv4Addr>,
    pub broadcast: Option<Ipv4Addr>,
}

impl Ipv4Landmarks {
    pub(crate) fn of(net: &Ipv4Net) -> Self {
        let network = net.network();
        if net.prefix_len() >= 31 {
            return Self {
                network,
                gateway: None,
                broadcast: None,
            };
        }
        Self {
            network,
            gateway: Some(Ipv4Addr::from(u32::from(network) + 1)),
            broadcast: Some(net.broadcast()),
        }
    }
}
