//! Subnet provisioning: turns CIDR engine output into persisted address
//! records and answers occupancy queries over them.

pub mod service;
pub mod store;

pub use service::{
    NewSubnet, ProvisionOutcome, ProvisionRequest, ProvisioningService, VlanIpStatus,
};
pub use store::IpRecordStore;
