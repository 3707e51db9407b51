use async_trait::async_trait;
use rackipam_core::db::Db;
use rackipam_core::error::Result;
use rackipam_core::types::{GeneratedRecord, IpAddressRecord, Subnet};
use uuid::Uuid;

/// Record store the provisioning service persists into.
///
/// `insert_ip_records` must honour the `(subnet_id, ip_address)` uniqueness
/// constraint with duplicate-ignore semantics and report only the rows it
/// actually inserted.
#[async_trait]
pub trait IpRecordStore: Send + Sync + 'static {
    async fn insert_ip_records(&self, subnet_id: &Uuid, records: &[GeneratedRecord])
        -> Result<usize>;

    async fn count_subnet_ips(&self, subnet_id: &Uuid) -> Result<usize>;

    async fn list_subnet_ips(&self, subnet_id: &Uuid) -> Result<Vec<IpAddressRecord>>;

    async fn get_subnet(&self, id: &Uuid) -> Result<Option<Subnet>>;

    async fn list_vlan_subnets(&self, vlan_id: &Uuid) -> Result<Vec<Subnet>>;

    /// Must reject a CIDR that overlaps a stored subnet with
    /// `Error::SubnetOverlap`, atomically with the insert.
    async fn create_subnet(&self, subnet: &Subnet) -> Result<()>;

    /// Conditional claim: only an available, unowned address can be taken.
    async fn claim_ip(&self, subnet_id: &Uuid, ip: &str, equipment_id: &Uuid)
        -> Result<IpAddressRecord>;

    async fn release_ip(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        expected_owner: Option<&Uuid>,
    ) -> Result<IpAddressRecord>;
}

#[async_trait]
impl IpRecordStore for Db {
    async fn insert_ip_records(
        &self,
        subnet_id: &Uuid,
        records: &[GeneratedRecord],
    ) -> Result<usize> {
        self.insert_ip_records_ignore_duplicates(subnet_id, records)
    }

    async fn count_subnet_ips(&self, subnet_id: &Uuid) -> Result<usize> {
        Db::count_subnet_ips(self, subnet_id)
    }

    async fn list_subnet_ips(&self, subnet_id: &Uuid) -> Result<Vec<IpAddressRecord>> {
        Db::list_subnet_ips(self, subnet_id)
    }

    async fn get_subnet(&self, id: &Uuid) -> Result<Option<Subnet>> {
        Db::get_subnet(self, id)
    }

    async fn list_vlan_subnets(&self, vlan_id: &Uuid) -> Result<Vec<Subnet>> {
        self.list_subnets_for_vlan(vlan_id)
    }

    async fn create_subnet(&self, subnet: &Subnet) -> Result<()> {
        Db::create_subnet(self, subnet)
    }

    async fn claim_ip(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        equipment_id: &Uuid,
    ) -> Result<IpAddressRecord> {
        Db::claim_ip(self, subnet_id, ip, equipment_id)
    }

    async fn release_ip(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        expected_owner: Option<&Uuid>,
    ) -> Result<IpAddressRecord> {
        Db::release_ip(self, subnet_id, ip, expected_owner)
    }
}
