use crate::error::{Error, Result};
use crate::types::{GeneratedRecord, IpAddressRecord, IpStatus, Subnet, Vlan};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Subnets table: subnet_id (string) -> Subnet (JSON)
const SUBNETS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("subnets");

/// Subnet CIDR index: canonical cidr -> subnet_id
const SUBNET_CIDR_INDEX: TableDefinition<&str, &str> = TableDefinition::new("subnet_cidr_index");

/// VLANs table: vlan_id (string) -> Vlan (JSON)
const VLANS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("vlans");

/// VLAN number index: 802.1Q id -> vlan_id
const VLAN_NUMBER_INDEX: TableDefinition<u16, &str> = TableDefinition::new("vlan_number_index");

/// IP addresses table: "subnet_id/ip_address" -> IpAddressRecord (JSON).
/// The composite key is the (subnet_id, ip_address) uniqueness constraint.
const IP_ADDRESSES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("ip_addresses");

fn ip_key(subnet_id: &Uuid, ip: &str) -> String {
    format!("{subnet_id}/{ip}")
}

/// Key range covering every address of one subnet. '0' sorts right after '/'.
fn subnet_key_range(subnet_id: &Uuid) -> (String, String) {
    (format!("{subnet_id}/"), format!("{subnet_id}0"))
}

#[derive(Clone)]
pub struct Db {
    inner: Arc<Database>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SUBNETS_TABLE)?;
            let _ = write_txn.open_table(SUBNET_CIDR_INDEX)?;
            let _ = write_txn.open_table(VLANS_TABLE)?;
            let _ = write_txn.open_table(VLAN_NUMBER_INDEX)?;
            let _ = write_txn.open_table(IP_ADDRESSES_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            inner: Arc::new(db),
        })
    }

    // --- VLAN operations ---

    pub fn create_vlan(&self, vlan: &Vlan) -> Result<()> {
        if !Vlan::is_valid_number(vlan.vlan_number) {
            return Err(Error::InvalidVlanNumber(vlan.vlan_number));
        }
        let write_txn = self.inner.begin_write()?;
        {
            let mut number_idx = write_txn.open_table(VLAN_NUMBER_INDEX)?;
            if number_idx.get(vlan.vlan_number)?.is_some() {
                return Err(Error::DuplicateVlan(vlan.vlan_number.to_string()));
            }

            let id_str = vlan.id.to_string();
            let json = serde_json::to_string(vlan)?;

            let mut vlans = write_txn.open_table(VLANS_TABLE)?;
            vlans.insert(id_str.as_str(), json.as_str())?;
            number_idx.insert(vlan.vlan_number, id_str.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_vlan(&self, id: &Uuid) -> Result<Option<Vlan>> {
        let read_txn = self.inner.begin_read()?;
        let vlans = read_txn.open_table(VLANS_TABLE)?;
        let id_str = id.to_string();

        match vlans.get(id_str.as_str())? {
            Some(v) => {
                let vlan: Vlan = serde_json::from_str(v.value())?;
                Ok(Some(vlan))
            }
            None => Ok(None),
        }
    }

    pub fn list_vlans(&self) -> Result<Vec<Vlan>> {
        let read_txn = self.inner.begin_read()?;
        let vlans = read_txn.open_table(VLANS_TABLE)?;
        let mut result = Vec::new();

        for entry in vlans.iter()? {
            let entry = entry.map_err(|e| Error::Database(e.to_string()))?;
            let vlan: Vlan = serde_json::from_str(entry.1.value())?;
            result.push(vlan);
        }

        result.sort_by_key(|v| v.vlan_number);
        Ok(result)
    }

    /// Delete a VLAN. Its subnets are kept and detached.
    pub fn delete_vlan(&self, id: &Uuid) -> Result<()> {
        let write_txn = self.inner.begin_write()?;
        {
            let id_str = id.to_string();
            let mut vlans = write_txn.open_table(VLANS_TABLE)?;

            let vlan_json = vlans
                .get(id_str.as_str())?
                .ok_or_else(|| Error::VlanNotFound(id_str.clone()))?;
            let vlan: Vlan = serde_json::from_str(vlan_json.value())?;
            drop(vlan_json);

            vlans.remove(id_str.as_str())?;

            let mut number_idx = write_txn.open_table(VLAN_NUMBER_INDEX)?;
            number_idx.remove(vlan.vlan_number)?;

            let mut subnets = write_txn.open_table(SUBNETS_TABLE)?;
            let mut detached = Vec::new();
            for entry in subnets.iter()? {
                let entry = entry.map_err(|e| Error::Database(e.to_string()))?;
                let subnet: Subnet = serde_json::from_str(entry.1.value())?;
                if subnet.vlan_id == Some(*id) {
                    detached.push(subnet);
                }
            }

            debug!(vlan_id = %id, detached = detached.len(), "detaching subnets from vlan");
            for mut subnet in detached {
                subnet.vlan_id = None;
                subnet.updated_at = Utc::now();
                let json = serde_json::to_string(&subnet)?;
                subnets.insert(subnet.id.to_string().as_str(), json.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // --- Subnet operations ---

    /// Store a new subnet. Fails when the CIDR is already taken or overlaps
    /// any stored subnet; both checks run inside the write transaction.
    pub fn create_subnet(&self, subnet: &Subnet) -> Result<()> {
        let write_txn = self.inner.begin_write()?;
        {
            let mut cidr_idx = write_txn.open_table(SUBNET_CIDR_INDEX)?;
            if cidr_idx.get(subnet.cidr.as_str())?.is_some() {
                return Err(Error::DuplicateSubnet(subnet.cidr.clone()));
            }

            if let Some(vlan_id) = subnet.vlan_id {
                let vlans = write_txn.open_table(VLANS_TABLE)?;
                if vlans.get(vlan_id.to_string().as_str())?.is_none() {
                    return Err(Error::VlanNotFound(vlan_id.to_string()));
                }
            }

            let mut subnets = write_txn.open_table(SUBNETS_TABLE)?;
            for entry in subnets.iter()? {
                let entry = entry.map_err(|e| Error::Database(e.to_string()))?;
                let existing: Subnet = serde_json::from_str(entry.1.value())?;
                if rackipam_cidr::check_overlap(&existing.cidr, &subnet.cidr) {
                    return Err(Error::SubnetOverlap {
                        new: subnet.cidr.clone(),
                        existing: existing.cidr,
                    });
                }
            }

            let id_str = subnet.id.to_string();
            let json = serde_json::to_string(subnet)?;
            subnets.insert(id_str.as_str(), json.as_str())?;
            cidr_idx.insert(subnet.cidr.as_str(), id_str.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_subnet(&self, id: &Uuid) -> Result<Option<Subnet>> {
        let read_txn = self.inner.begin_read()?;
        let subnets = read_txn.open_table(SUBNETS_TABLE)?;
        let id_str = id.to_string();

        match subnets.get(id_str.as_str())? {
            Some(v) => {
                let subnet: Subnet = serde_json::from_str(v.value())?;
                Ok(Some(subnet))
            }
            None => Ok(None),
        }
    }

    /// All subnets, oldest first.
    pub fn list_subnets(&self) -> Result<Vec<Subnet>> {
        let read_txn = self.inner.begin_read()?;
        let subnets = read_txn.open_table(SUBNETS_TABLE)?;
        let mut result = Vec::new();

        for entry in subnets.iter()? {
            let entry = entry.map_err(|e| Error::Database(e.to_string()))?;
            let subnet: Subnet = serde_json::from_str(entry.1.value())?;
            result.push(subnet);
        }

        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    pub fn list_subnets_for_vlan(&self, vlan_id: &Uuid) -> Result<Vec<Subnet>> {
        Ok(self
            .list_subnets()?
            .into_iter()
            .filter(|s| s.vlan_id == Some(*vlan_id))
            .collect())
    }

    /// Update a subnet's descriptive fields. The CIDR cannot change.
    pub fn update_subnet(&self, subnet: &Subnet) -> Result<()> {
        let write_txn = self.inner.begin_write()?;
        {
            let id_str = subnet.id.to_string();
            let mut subnets = write_txn.open_table(SUBNETS_TABLE)?;

            let existing_json = subnets
                .get(id_str.as_str())?
                .ok_or_else(|| Error::SubnetNotFound(id_str.clone()))?;
            let existing: Subnet = serde_json::from_str(existing_json.value())?;
            drop(existing_json);

            if existing.cidr != subnet.cidr {
                return Err(Error::InvalidCidr(format!(
                    "cidr of subnet {id_str} cannot change from {} to {}",
                    existing.cidr, subnet.cidr
                )));
            }

            if let Some(vlan_id) = subnet.vlan_id {
                let vlans = write_txn.open_table(VLANS_TABLE)?;
                if vlans.get(vlan_id.to_string().as_str())?.is_none() {
                    return Err(Error::VlanNotFound(vlan_id.to_string()));
                }
            }

            let json = serde_json::to_string(subnet)?;
            subnets.insert(id_str.as_str(), json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete a subnet and every address record in it. Returns the number of
    /// address records removed.
    pub fn delete_subnet(&self, id: &Uuid) -> Result<usize> {
        let write_txn = self.inner.begin_write()?;
        let count;
        {
            let id_str = id.to_string();
            let mut subnets = write_txn.open_table(SUBNETS_TABLE)?;

            let subnet_json = subnets
                .get(id_str.as_str())?
                .ok_or_else(|| Error::SubnetNotFound(id_str.clone()))?;
            let subnet: Subnet = serde_json::from_str(subnet_json.value())?;
            drop(subnet_json);

            subnets.remove(id_str.as_str())?;

            let mut cidr_idx = write_txn.open_table(SUBNET_CIDR_INDEX)?;
            cidr_idx.remove(subnet.cidr.as_str())?;

            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;
            let (start, end) = subnet_key_range(id);
            let mut to_delete = Vec::new();
            for entry in ips.range(start.as_str()..end.as_str())? {
                let entry = entry.map_err(|e| Error::Database(e.to_string()))?;
                to_delete.push(entry.0.value().to_string());
            }

            count = to_delete.len();
            debug!(subnet_id = %id, records = count, "removing subnet address records");
            for key in to_delete {
                ips.remove(key.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(count)
    }

    // --- IP address operations ---

    /// Insert generated records for a subnet in one transaction, skipping any
    /// whose (subnet_id, ip_address) already exists. Returns how many rows
    /// were newly inserted.
    pub fn insert_ip_records_ignore_duplicates(
        &self,
        subnet_id: &Uuid,
        records: &[GeneratedRecord],
    ) -> Result<usize> {
        let write_txn = self.inner.begin_write()?;
        let mut inserted = 0;
        {
            let subnets = write_txn.open_table(SUBNETS_TABLE)?;
            if subnets.get(subnet_id.to_string().as_str())?.is_none() {
                return Err(Error::SubnetNotFound(subnet_id.to_string()));
            }

            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;
            for generated in records {
                let key = ip_key(subnet_id, &generated.ip_address);
                if ips.get(key.as_str())?.is_some() {
                    continue;
                }
                let record = IpAddressRecord::from_generated(*subnet_id, generated);
                let json = serde_json::to_string(&record)?;
                ips.insert(key.as_str(), json.as_str())?;
                inserted += 1;
            }
        }
        write_txn.commit()?;
        Ok(inserted)
    }

    pub fn count_subnet_ips(&self, subnet_id: &Uuid) -> Result<usize> {
        let read_txn = self.inner.begin_read()?;
        let ips = read_txn.open_table(IP_ADDRESSES_TABLE)?;
        let (start, end) = subnet_key_range(subnet_id);

        let mut count = 0;
        for entry in ips.range(start.as_str()..end.as_str())? {
            entry.map_err(|e| Error::Database(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    /// All address records of a subnet in numeric address order.
    pub fn list_subnet_ips(&self, subnet_id: &Uuid) -> Result<Vec<IpAddressRecord>> {
        let read_txn = self.inner.begin_read()?;
        let ips = read_txn.open_table(IP_ADDRESSES_TABLE)?;
        let (start, end) = subnet_key_range(subnet_id);

        let mut result = Vec::new();
        for entry in ips.range(start.as_str()..end.as_str())? {
            let entry = entry.map_err(|e| Error::Database(e.to_string()))?;
            let record: IpAddressRecord = serde_json::from_str(entry.1.value())?;
            result.push(record);
        }

        result.sort_by_cached_key(|r| r.ip_address.parse::<IpAddr>().ok());
        Ok(result)
    }

    pub fn get_ip_record(&self, subnet_id: &Uuid, ip: &str) -> Result<Option<IpAddressRecord>> {
        let read_txn = self.inner.begin_read()?;
        let ips = read_txn.open_table(IP_ADDRESSES_TABLE)?;
        let key = ip_key(subnet_id, ip);

        match ips.get(key.as_str())? {
            Some(v) => {
                let record: IpAddressRecord = serde_json::from_str(v.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Create a single address record. The address must lie inside the
    /// subnet's CIDR and must not exist yet.
    pub fn create_ip_record(&self, record: &IpAddressRecord) -> Result<()> {
        let write_txn = self.inner.begin_write()?;
        {
            let subnet_id = record.subnet_id.to_string();
            let subnets = write_txn.open_table(SUBNETS_TABLE)?;
            let subnet_json = subnets
                .get(subnet_id.as_str())?
                .ok_or_else(|| Error::SubnetNotFound(subnet_id.clone()))?;
            let subnet: Subnet = serde_json::from_str(subnet_json.value())?;
            drop(subnet_json);

            if !rackipam_cidr::is_ip_in_cidr(&record.ip_address, &subnet.cidr) {
                return Err(Error::AddressOutOfRange {
                    ip: record.ip_address.clone(),
                    cidr: subnet.cidr,
                });
            }

            let key = ip_key(&record.subnet_id, &record.ip_address);
            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;
            if ips.get(key.as_str())?.is_some() {
                return Err(Error::DuplicateIp(record.ip_address.clone()));
            }
            let json = serde_json::to_string(record)?;
            ips.insert(key.as_str(), json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Edit the name or status of an address in place.
    ///
    /// Ownership is left alone: an address only becomes used through
    /// [`Db::claim_ip`], and a used address keeps its status until released.
    pub fn update_ip_fields(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        name: Option<String>,
        status: Option<IpStatus>,
    ) -> Result<IpAddressRecord> {
        let write_txn = self.inner.begin_write()?;
        let record;
        {
            let key = ip_key(subnet_id, ip);
            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;

            let mut current: IpAddressRecord = match ips.get(key.as_str())? {
                Some(v) => serde_json::from_str(v.value())?,
                None => return Err(Error::IpNotFound(ip.to_string())),
            };

            if let Some(status) = status {
                if status != current.status {
                    if status == IpStatus::Used {
                        return Err(Error::AddressUnavailable(format!(
                            "{ip} can only become used by being claimed"
                        )));
                    }
                    if current.status == IpStatus::Used || current.equipment_id.is_some() {
                        return Err(Error::AddressUnavailable(format!(
                            "{ip} is in use, release it first"
                        )));
                    }
                    current.status = status;
                }
            }
            if name.is_some() {
                current.name = name;
            }
            current.updated_at = Utc::now();

            let json = serde_json::to_string(&current)?;
            ips.insert(key.as_str(), json.as_str())?;
            record = current;
        }
        write_txn.commit()?;
        Ok(record)
    }

    pub fn delete_ip_record(&self, subnet_id: &Uuid, ip: &str) -> Result<()> {
        let write_txn = self.inner.begin_write()?;
        {
            let key = ip_key(subnet_id, ip);
            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;
            if ips.remove(key.as_str())?.is_none() {
                return Err(Error::IpNotFound(ip.to_string()));
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Assign an address to a piece of equipment.
    ///
    /// Succeeds only when the address is available and unowned, checked and
    /// written in the same transaction, so concurrent claimers cannot both
    /// win. Claiming again for the same equipment is a no-op.
    pub fn claim_ip(&self, subnet_id: &Uuid, ip: &str, equipment_id: &Uuid) -> Result<IpAddressRecord> {
        let write_txn = self.inner.begin_write()?;
        let record;
        {
            let key = ip_key(subnet_id, ip);
            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;

            let mut current: IpAddressRecord = match ips.get(key.as_str())? {
                Some(v) => serde_json::from_str(v.value())?,
                None => return Err(Error::IpNotFound(ip.to_string())),
            };

            if current.equipment_id == Some(*equipment_id) {
                return Ok(current);
            }
            if !current.is_claimable() {
                return Err(Error::AddressUnavailable(format!(
                    "{ip} is {}",
                    current.status
                )));
            }

            current.status = IpStatus::Used;
            current.equipment_id = Some(*equipment_id);
            current.updated_at = Utc::now();

            let json = serde_json::to_string(&current)?;
            ips.insert(key.as_str(), json.as_str())?;
            record = current;
        }
        write_txn.commit()?;
        Ok(record)
    }

    /// Return an address to the available pool.
    ///
    /// When `expected_owner` is given the release only happens if that
    /// equipment still holds the address. Addresses that are not in use are
    /// returned unchanged.
    pub fn release_ip(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        expected_owner: Option<&Uuid>,
    ) -> Result<IpAddressRecord> {
        let write_txn = self.inner.begin_write()?;
        let record;
        {
            let key = ip_key(subnet_id, ip);
            let mut ips = write_txn.open_table(IP_ADDRESSES_TABLE)?;

            let mut current: IpAddressRecord = match ips.get(key.as_str())? {
                Some(v) => serde_json::from_str(v.value())?,
                None => return Err(Error::IpNotFound(ip.to_string())),
            };

            if current.status != IpStatus::Used && current.equipment_id.is_none() {
                return Ok(current);
            }
            if let Some(owner) = expected_owner {
                if current.equipment_id.as_ref() != Some(owner) {
                    return Err(Error::AddressUnavailable(format!(
                        "{ip} is not held by equipment {owner}"
                    )));
                }
            }

            current.status = IpStatus::Available;
            current.equipment_id = None;
            current.updated_at = Utc::now();

            let json = serde_json::to_string(&current)?;
            ips.insert(key.as_str(), json.as_str())?;
            record = current;
        }
        write_txn.commit()?;
        Ok(record)
    }
}
