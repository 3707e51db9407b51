use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use rackipam_cidr::{GeneratedRecord, IpStatus, IpType};

/// A VLAN grouping one or more subnets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vlan {
    pub id: Uuid,
    /// 802.1Q VLAN ID, 1-4094
    pub vlan_number: u16,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vlan {
    /// Usable 802.1Q VLAN IDs. 0 and 4095 are reserved by the standard.
    pub const NUMBER_RANGE: std::ops::RangeInclusive<u16> = 1..=4094;

    pub fn is_valid_number(number: u16) -> bool {
        Self::NUMBER_RANGE.contains(&number)
    }
}

/// An IP subnet and the address records provisioned inside it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    pub id: Uuid,
    /// Canonical, network-aligned CIDR
    pub cidr: String,
    pub name: String,
    pub vlan_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted address within a subnet. Unique on `(subnet_id, ip_address)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAddressRecord {
    pub id: Uuid,
    pub subnet_id: Uuid,
    pub ip_address: String,
    pub ip_type: IpType,
    pub status: IpStatus,
    pub name: Option<String>,
    /// Equipment currently holding this address
    pub equipment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IpAddressRecord {
    pub fn from_generated(subnet_id: Uuid, generated: &GeneratedRecord) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subnet_id,
            ip_address: generated.ip_address.clone(),
            ip_type: generated.ip_type,
            status: generated.status,
            name: generated.name.clone(),
            equipment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_claimable(&self) -> bool {
        self.status == IpStatus::Available && self.equipment_id.is_none()
    }
}

/// Address occupancy of a subnet or of every subnet in a VLAN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetUsage {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub used: usize,
    /// Share of provisioned addresses that are used, 0-100
    pub utilization: f64,
}

impl SubnetUsage {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a IpAddressRecord>) -> Self {
        let mut usage = SubnetUsage::default();
        for r in records {
            usage.total += 1;
            match r.status {
                IpStatus::Available => usage.available += 1,
                IpStatus::Reserved => usage.reserved += 1,
                IpStatus::Used => usage.used += 1,
            }
        }
        usage.recompute();
        usage
    }

    pub fn merge(&mut self, other: &SubnetUsage) {
        self.total += other.total;
        self.available += other.available;
        self.reserved += other.reserved;
        self.used += other.used;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.utilization = if self.total == 0 {
            0.0
        } else {
            (self.used as f64 / self.total as f64) * 100.0
        };
    }
}
