use crate::parse::{ipv4_total, parse_block, Block, CidrInfo, Ipv4Landmarks};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Largest block whose addresses are enumerated one by one.
pub const SYNC_GENERATION_LIMIT: u128 = 65_536;

/// Largest block for which every address gets its own record. Wider blocks
/// only get their structural records.
pub const FULL_ENUMERATION_LIMIT: u128 = 4_096;

pub const DEFAULT_GATEWAY_NAME: &str = "Gateway";

/// Role of an address within its subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpType {
    Network,
    Gateway,
    Host,
    Broadcast,
    Reserved,
}

impl std::fmt::Display for IpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpType::Network => write!(f, "network"),
            IpType::Gateway => write!(f, "gateway"),
            IpType::Host => write!(f, "host"),
            IpType::Broadcast => write!(f, "broadcast"),
            IpType::Reserved => write!(f, "reserved"),
        }
    }
}

/// Allocation state of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpStatus {
    Available,
    Reserved,
    Used,
}

impl std::fmt::Display for IpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpStatus::Available => write!(f, "available"),
            IpStatus::Reserved => write!(f, "reserved"),
            IpStatus::Used => write!(f, "used"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default = "default_true")]
    pub reserve_gateway: bool,
    #[serde(default)]
    pub gateway_name: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            reserve_gateway: true,
            gateway_name: None,
        }
    }
}

impl GenerateOptions {
    fn gateway_label(&self) -> String {
        self.gateway_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_GATEWAY_NAME)
            .to_string()
    }
}

fn default_true() -> bool {
    true
}

/// An address record ready to be persisted for a subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRecord {
    pub ip_address: String,
    pub ip_type: IpType,
    pub status: IpStatus,
    pub name: Option<String>,
}

impl GeneratedRecord {
    fn new(ip_address: String, ip_type: IpType, status: IpStatus) -> Self {
        Self {
            ip_address,
            ip_type,
            status,
            name: None,
        }
    }

    fn named(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

/// Every address of an IPv4 block in ascending order, network first.
///
/// Empty for IPv6, for malformed input, and for blocks larger than
/// [`SYNC_GENERATION_LIMIT`].
pub fn generate_ipv4_addresses(cidr: &str) -> Vec<Ipv4Addr> {
    let Some((Block::V4(net), _)) = parse_block(cidr) else {
        return Vec::new();
    };
    if ipv4_total(&net) > SYNC_GENERATION_LIMIT {
        return Vec::new();
    }

    let start = u32::from(net.network());
    let end = u32::from(net.broadcast());
    (start..=end).map(Ipv4Addr::from).collect()
}

/// Build the typed address records for a subnet.
///
/// Blocks above [`FULL_ENUMERATION_LIMIT`] only produce their network,
/// gateway and broadcast records. Smaller blocks produce one record per
/// address, classified by comparing each address with the values
/// [`parse_cidr`](crate::parse_cidr) derives for the same block. IPv6 blocks
/// produce only their network record.
pub fn generate_ip_records(cidr: &str, options: &GenerateOptions) -> Vec<GeneratedRecord> {
    let Some((block, _)) = parse_block(cidr) else {
        return Vec::new();
    };

    match block {
        Block::V6(net) => vec![GeneratedRecord::new(
            net.network().to_string(),
            IpType::Network,
            IpStatus::Reserved,
        )],
        Block::V4(net) if ipv4_total(&net) > FULL_ENUMERATION_LIMIT => {
            structural_records(&CidrInfo::from_block(&block), options)
        }
        Block::V4(net) => {
            let marks = Ipv4Landmarks::of(&net);
            let start = u32::from(net.network());
            let end = u32::from(net.broadcast());
            (start..=end)
                .map(|n| classify(Ipv4Addr::from(n), &marks, options))
                .collect()
        }
    }
}

fn structural_records(info: &CidrInfo, options: &GenerateOptions) -> Vec<GeneratedRecord> {
    let mut records = vec![GeneratedRecord::new(
        info.network_address.clone(),
        IpType::Network,
        IpStatus::Reserved,
    )];

    if let Some(gateway) = &info.gateway_address {
        let status = if options.reserve_gateway {
            IpStatus::Reserved
        } else {
            IpStatus::Available
        };
        records.push(
            GeneratedRecord::new(gateway.clone(), IpType::Gateway, status)
                .named(options.gateway_label()),
        );
    }

    if let Some(broadcast) = &info.broadcast_address {
        records.push(GeneratedRecord::new(
            broadcast.clone(),
            IpType::Broadcast,
            IpStatus::Reserved,
        ));
    }

    records
}

fn classify(addr: Ipv4Addr, marks: &Ipv4Landmarks, options: &GenerateOptions) -> GeneratedRecord {
    let ip = addr.to_string();
    if addr == marks.network {
        GeneratedRecord::new(ip, IpType::Network, IpStatus::Reserved)
    } else if marks.broadcast == Some(addr) {
        GeneratedRecord::new(ip, IpType::Broadcast, IpStatus::Reserved)
    } else if options.reserve_gateway && marks.gateway == Some(addr) {
        GeneratedRecord::new(ip, IpType::Gateway, IpStatus::Reserved).named(options.gateway_label())
    } else {
        GeneratedRecord::new(ip, IpType::Host, IpStatus::Available)
    }
}
