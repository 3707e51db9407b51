use crate::store::IpRecordStore;
use chrono::Utc;
use rackipam_cidr::{generate_ip_records, parse_cidr, validate_cidr, GenerateOptions};
use rackipam_core::config::ProvisioningConfig;
use rackipam_core::error::{Error, Result};
use rackipam_core::types::{IpAddressRecord, Subnet, SubnetUsage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Request to generate and persist the address records of a subnet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionRequest {
    pub subnet_id: Uuid,
    pub cidr: String,
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub reserve_gateway: Option<bool>,
    #[serde(default)]
    pub gateway_name: Option<String>,
}

/// Result of a provisioning run. `count` is the number of rows newly
/// inserted, which is also the partial progress when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionOutcome {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProvisionOutcome {
    fn succeeded(count: usize) -> Self {
        Self {
            success: true,
            count,
            error: None,
        }
    }

    fn failed(count: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            count,
            error: Some(error.into()),
        }
    }
}

/// Whether a VLAN has subnets, and whether any of them hold addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanIpStatus {
    pub has_subnets: bool,
    pub has_ips: bool,
    /// First subnet holding addresses, else the first subnet of the VLAN
    pub subnet_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubnet {
    pub cidr: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct ProvisioningService<S> {
    store: S,
    config: ProvisioningConfig,
}

impl<S: IpRecordStore> ProvisioningService<S> {
    pub fn new(store: S, config: ProvisioningConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn generate_options(&self, req: &ProvisionRequest) -> GenerateOptions {
        GenerateOptions {
            reserve_gateway: req.reserve_gateway.unwrap_or(self.config.reserve_gateway),
            gateway_name: Some(
                req.gateway_name
                    .clone()
                    .unwrap_or_else(|| self.config.gateway_name.clone()),
            ),
        }
    }

    /// Generate the address records of an IPv4 subnet and persist them in
    /// serial batches.
    ///
    /// Safe to repeat: rows that already exist are skipped, so a second run
    /// reports `count == 0`. A store failure stops the run and reports the
    /// rows committed so far; those batches stay in place.
    pub async fn generate_and_upsert_ips_for_subnet(
        &self,
        req: &ProvisionRequest,
    ) -> ProvisionOutcome {
        let Some(info) = parse_cidr(&req.cidr) else {
            return ProvisionOutcome::failed(0, format!("invalid CIDR: {}", req.cidr));
        };
        if !info.is_ipv4() {
            return ProvisionOutcome::failed(
                0,
                format!(
                    "bulk address generation is only supported for IPv4, got {}",
                    info.cidr
                ),
            );
        }

        match self.store.get_subnet(&req.subnet_id).await {
            Ok(Some(subnet)) if subnet.cidr != info.cidr => {
                return ProvisionOutcome::failed(
                    0,
                    format!(
                        "{} does not match subnet {} ({})",
                        info.cidr, req.subnet_id, subnet.cidr
                    ),
                );
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                return ProvisionOutcome::failed(
                    0,
                    Error::SubnetNotFound(req.subnet_id.to_string()).to_string(),
                );
            }
            Err(e) => return ProvisionOutcome::failed(0, e.to_string()),
        }

        let records = generate_ip_records(&info.cidr, &self.generate_options(req));
        if records.is_empty() {
            return ProvisionOutcome::failed(0, format!("no addresses generated for {}", info.cidr));
        }

        let batch_size = self.config.batch_size.max(1);
        info!(
            subnet_id = %req.subnet_id,
            cidr = %info.cidr,
            records = records.len(),
            batch_size,
            "provisioning subnet addresses"
        );

        let mut inserted = 0;
        for (batch, chunk) in records.chunks(batch_size).enumerate() {
            match self.store.insert_ip_records(&req.subnet_id, chunk).await {
                Ok(n) => {
                    inserted += n;
                    debug!(subnet_id = %req.subnet_id, batch, inserted = n, "batch stored");
                }
                Err(e) => {
                    warn!(
                        subnet_id = %req.subnet_id,
                        batch,
                        inserted,
                        "provisioning stopped: {e}"
                    );
                    return ProvisionOutcome::failed(inserted, e.to_string());
                }
            }
        }

        info!(subnet_id = %req.subnet_id, inserted, "subnet provisioned");
        ProvisionOutcome::succeeded(inserted)
    }

    /// Whether provisioning has already stored addresses for the subnet.
    /// Store errors are logged and reported as `false`.
    pub async fn check_subnet_has_ips(&self, subnet_id: &Uuid) -> bool {
        match self.store.count_subnet_ips(subnet_id).await {
            Ok(n) => n > 0,
            Err(e) => {
                warn!(%subnet_id, "ip count failed: {e}");
                false
            }
        }
    }

    pub async fn check_vlan_has_subnets_with_ips(&self, vlan_id: &Uuid) -> VlanIpStatus {
        let subnets = match self.store.list_vlan_subnets(vlan_id).await {
            Ok(subnets) => subnets,
            Err(e) => {
                warn!(%vlan_id, "subnet lookup failed: {e}");
                return VlanIpStatus::default();
            }
        };
        let Some(first) = subnets.first() else {
            return VlanIpStatus::default();
        };

        for subnet in &subnets {
            if self.check_subnet_has_ips(&subnet.id).await {
                return VlanIpStatus {
                    has_subnets: true,
                    has_ips: true,
                    subnet_id: Some(subnet.id),
                };
            }
        }

        VlanIpStatus {
            has_subnets: true,
            has_ips: false,
            subnet_id: Some(first.id),
        }
    }

    /// Create a subnet from user input. The canonical CIDR is stored, and the
    /// store refuses a block overlapping any existing subnet. Returns the subnet
    /// together with the validation warnings.
    pub async fn create_subnet(&self, new: NewSubnet) -> Result<(Subnet, Vec<String>)> {
        let validation = validate_cidr(&new.cidr);
        if !validation.valid {
            return Err(Error::InvalidCidr(validation.errors.join("; ")));
        }
        let info = parse_cidr(&new.cidr).ok_or_else(|| Error::InvalidCidr(new.cidr.clone()))?;

        let now = Utc::now();
        let subnet = Subnet {
            id: Uuid::new_v4(),
            name: new
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| info.cidr.clone()),
            cidr: info.cidr,
            vlan_id: new.vlan_id,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        self.store.create_subnet(&subnet).await?;

        info!(subnet_id = %subnet.id, cidr = %subnet.cidr, "subnet created");
        Ok((subnet, validation.warnings))
    }

    pub async fn subnet_usage(&self, subnet_id: &Uuid) -> Result<SubnetUsage> {
        if self.store.get_subnet(subnet_id).await?.is_none() {
            return Err(Error::SubnetNotFound(subnet_id.to_string()));
        }
        let records = self.store.list_subnet_ips(subnet_id).await?;
        Ok(SubnetUsage::from_records(&records))
    }

    /// Occupancy summed over every subnet of a VLAN.
    pub async fn vlan_usage(&self, vlan_id: &Uuid) -> Result<SubnetUsage> {
        let mut usage = SubnetUsage::default();
        for subnet in self.store.list_vlan_subnets(vlan_id).await? {
            let records = self.store.list_subnet_ips(&subnet.id).await?;
            usage.merge(&SubnetUsage::from_records(&records));
        }
        Ok(usage)
    }

    pub async fn claim_ip(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        equipment_id: &Uuid,
    ) -> Result<IpAddressRecord> {
        let record = self.store.claim_ip(subnet_id, ip, equipment_id).await?;
        info!(%subnet_id, ip, %equipment_id, "address claimed");
        Ok(record)
    }

    pub async fn release_ip(
        &self,
        subnet_id: &Uuid,
        ip: &str,
        expected_owner: Option<&Uuid>,
    ) -> Result<IpAddressRecord> {
        let record = self.store.release_ip(subnet_id, ip, expected_owner).await?;
        info!(%subnet_id, ip, "address released");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rackipam_core::db::Db;
    use rackipam_core::types::{GeneratedRecord, IpStatus, IpType, Vlan};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_service(batch_size: usize) -> (ProvisioningService<Db>, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Db::open(&dir.path().join("test.redb")).unwrap();
        let config = ProvisioningConfig {
            batch_size,
            ..ProvisioningConfig::default()
        };
        (ProvisioningService::new(db, config), dir)
    }

    async fn subnet<S: IpRecordStore>(svc: &ProvisioningService<S>, cidr: &str) -> Subnet {
        let new = NewSubnet {
            cidr: cidr.to_string(),
            name: None,
            vlan_id: None,
            description: None,
        };
        svc.create_subnet(new).await.unwrap().0
    }

    fn request(subnet: &Subnet) -> ProvisionRequest {
        ProvisionRequest {
            subnet_id: subnet.id,
            cidr: subnet.cidr.clone(),
            reserve_gateway: None,
            gateway_name: None,
        }
    }

    /// Store that fails every insert after the first `ok_batches`.
    struct FlakyStore {
        db: Db,
        ok_batches: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IpRecordStore for FlakyStore {
        async fn insert_ip_records(
            &self,
            subnet_id: &Uuid,
            records: &[GeneratedRecord],
        ) -> Result<usize> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= self.ok_batches {
                return Err(Error::Database("connection reset".to_string()));
            }
            self.db.insert_ip_records_ignore_duplicates(subnet_id, records)
        }
        async fn count_subnet_ips(&self, subnet_id: &Uuid) -> Result<usize> {
            self.db.count_subnet_ips(subnet_id)
        }
        async fn list_subnet_ips(&self, subnet_id: &Uuid) -> Result<Vec<IpAddressRecord>> {
            self.db.list_subnet_ips(subnet_id)
        }
        async fn get_subnet(&self, id: &Uuid) -> Result<Option<Subnet>> {
            self.db.get_subnet(id)
        }
        async fn list_vlan_subnets(&self, vlan_id: &Uuid) -> Result<Vec<Subnet>> {
            self.db.list_subnets_for_vlan(vlan_id)
        }
        async fn create_subnet(&self, subnet: &Subnet) -> Result<()> {
            self.db.create_subnet(subnet)
        }
        async fn claim_ip(
            &self,
            subnet_id: &Uuid,
            ip: &str,
            equipment_id: &Uuid,
        ) -> Result<IpAddressRecord> {
            self.db.claim_ip(subnet_id, ip, equipment_id)
        }
        async fn release_ip(
            &self,
            subnet_id: &Uuid,
            ip: &str,
            expected_owner: Option<&Uuid>,
        ) -> Result<IpAddressRecord> {
            self.db.release_ip(subnet_id, ip, expected_owner)
        }
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let (svc, _dir) = test_service(500);
        let net = subnet(&svc, "192.168.1.0/24").await;

        let first = svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert_eq!(first, ProvisionOutcome::succeeded(256));

        let second = svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert!(second.success);
        assert_eq!(second.count, 0);
        assert!(second.error.is_none());

        assert_eq!(svc.store().count_subnet_ips(&net.id).unwrap(), 256);
    }

    #[tokio::test]
    async fn test_provision_classifies_records() {
        let (svc, _dir) = test_service(500);
        let net = subnet(&svc, "10.10.0.0/30").await;
        let mut req = request(&net);
        req.gateway_name = Some("fw01".to_string());
        svc.generate_and_upsert_ips_for_subnet(&req).await;

        let ips = svc.store().list_subnet_ips(&net.id).unwrap();
        let kinds: Vec<_> = ips.iter().map(|r| (r.ip_type, r.status)).collect();
        assert_eq!(
            kinds,
            vec![
                (IpType::Network, IpStatus::Reserved),
                (IpType::Gateway, IpStatus::Reserved),
                (IpType::Host, IpStatus::Available),
                (IpType::Broadcast, IpStatus::Reserved),
            ]
        );
        assert_eq!(ips[1].name.as_deref(), Some("fw01"));
    }

    #[tokio::test]
    async fn test_provision_uses_configured_gateway_default() {
        let dir = TempDir::new().unwrap();
        let db = Db::open(&dir.path().join("test.redb")).unwrap();
        let config = ProvisioningConfig {
            reserve_gateway: false,
            ..ProvisioningConfig::default()
        };
        let svc = ProvisioningService::new(db, config);
        let net = subnet(&svc, "10.10.0.0/29").await;
        svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;

        let gw = svc.store().get_ip_record(&net.id, "10.10.0.1").unwrap().unwrap();
        assert_eq!(gw.ip_type, IpType::Host);
        assert_eq!(gw.status, IpStatus::Available);
    }

    #[tokio::test]
    async fn test_provision_in_batches() {
        let (svc, _dir) = test_service(100);
        let net = subnet(&svc, "10.0.0.0/23").await;
        let outcome = svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert_eq!(outcome, ProvisionOutcome::succeeded(512));
    }

    #[tokio::test]
    async fn test_partial_failure_then_retry() {
        let dir = TempDir::new().unwrap();
        let db = Db::open(&dir.path().join("test.redb")).unwrap();
        let config = ProvisioningConfig {
            batch_size: 100,
            ..ProvisioningConfig::default()
        };
        let flaky = ProvisioningService::new(
            FlakyStore {
                db: db.clone(),
                ok_batches: 1,
                calls: AtomicUsize::new(0),
            },
            config.clone(),
        );
        let net = subnet(&flaky, "172.16.0.0/24").await;

        let outcome = flaky.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert!(!outcome.success);
        assert_eq!(outcome.count, 100);
        assert!(outcome.error.unwrap().contains("connection reset"));
        assert_eq!(db.count_subnet_ips(&net.id).unwrap(), 100);

        let healthy = ProvisioningService::new(db.clone(), config);
        let retry = healthy.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert_eq!(retry, ProvisionOutcome::succeeded(156));
        assert_eq!(db.count_subnet_ips(&net.id).unwrap(), 256);
    }

    #[tokio::test]
    async fn test_provision_rejections() {
        let (svc, _dir) = test_service(500);

        let bad = ProvisionRequest {
            subnet_id: Uuid::new_v4(),
            cidr: "10.0.0.0/40".to_string(),
            reserve_gateway: None,
            gateway_name: None,
        };
        let outcome = svc.generate_and_upsert_ips_for_subnet(&bad).await;
        assert!(!outcome.success);
        assert_eq!(outcome.count, 0);

        let v6 = subnet(&svc, "2001:db8::/64").await;
        let outcome = svc.generate_and_upsert_ips_for_subnet(&request(&v6)).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("IPv4"));

        let missing = ProvisionRequest {
            subnet_id: Uuid::new_v4(),
            cidr: "10.9.0.0/24".to_string(),
            reserve_gateway: None,
            gateway_name: None,
        };
        let outcome = svc.generate_and_upsert_ips_for_subnet(&missing).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("not found"));

        let net = subnet(&svc, "10.1.0.0/24").await;
        let mut mismatch = request(&net);
        mismatch.cidr = "10.1.1.0/24".to_string();
        let outcome = svc.generate_and_upsert_ips_for_subnet(&mismatch).await;
        assert!(!outcome.success);
        assert!(!svc.check_subnet_has_ips(&net.id).await);
    }

    #[tokio::test]
    async fn test_large_subnet_stores_structural_records() {
        let (svc, _dir) = test_service(500);
        let net = subnet(&svc, "10.64.0.0/16").await;
        let outcome = svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert_eq!(outcome, ProvisionOutcome::succeeded(3));
    }

    #[tokio::test]
    async fn test_host_bits_in_request_are_canonicalized() {
        let (svc, _dir) = test_service(500);
        let net = subnet(&svc, "192.168.7.0/29").await;
        let mut req = request(&net);
        req.cidr = "192.168.7.5/29".to_string();
        let outcome = svc.generate_and_upsert_ips_for_subnet(&req).await;
        assert_eq!(outcome, ProvisionOutcome::succeeded(8));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_provisioning_never_duplicates() {
        let (svc, _dir) = test_service(64);
        let svc = Arc::new(svc);
        let net = subnet(svc.as_ref(), "10.20.0.0/24").await;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let svc = svc.clone();
            let req = request(&net);
            handles.push(tokio::spawn(async move {
                svc.generate_and_upsert_ips_for_subnet(&req).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        assert_eq!(svc.store().count_subnet_ips(&net.id).unwrap(), 256);
    }

    #[tokio::test]
    async fn test_check_subnet_has_ips() {
        let (svc, _dir) = test_service(500);
        let net = subnet(&svc, "10.30.0.0/28").await;
        assert!(!svc.check_subnet_has_ips(&net.id).await);
        svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        assert!(svc.check_subnet_has_ips(&net.id).await);
    }

    #[tokio::test]
    async fn test_check_vlan_has_subnets_with_ips() {
        let (svc, _dir) = test_service(500);
        let vlan = Vlan {
            id: Uuid::new_v4(),
            vlan_number: 210,
            name: "storage".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        svc.store().create_vlan(&vlan).unwrap();
        assert_eq!(
            svc.check_vlan_has_subnets_with_ips(&vlan.id).await,
            VlanIpStatus::default()
        );

        let mut ids = Vec::new();
        for cidr in ["10.210.0.0/28", "10.210.1.0/28"] {
            let new = NewSubnet {
                cidr: cidr.to_string(),
                name: None,
                vlan_id: Some(vlan.id),
                description: None,
            };
            ids.push(svc.create_subnet(new).await.unwrap().0);
        }

        let status = svc.check_vlan_has_subnets_with_ips(&vlan.id).await;
        assert!(status.has_subnets);
        assert!(!status.has_ips);
        assert_eq!(status.subnet_id, Some(ids[0].id));

        svc.generate_and_upsert_ips_for_subnet(&request(&ids[1])).await;
        let status = svc.check_vlan_has_subnets_with_ips(&vlan.id).await;
        assert!(status.has_ips);
        assert_eq!(status.subnet_id, Some(ids[1].id));
    }

    #[tokio::test]
    async fn test_create_subnet_rules() {
        let (svc, _dir) = test_service(500);
        let new = NewSubnet {
            cidr: "10.0.0.77/24".to_string(),
            name: None,
            vlan_id: None,
            description: None,
        };
        let (created, warnings) = svc.create_subnet(new).await.unwrap();
        assert_eq!(created.cidr, "10.0.0.0/24");
        assert_eq!(created.name, "10.0.0.0/24");
        assert_eq!(warnings.len(), 1);

        let overlapping = NewSubnet {
            cidr: "10.0.0.128/25".to_string(),
            name: Some("dmz".to_string()),
            vlan_id: None,
            description: None,
        };
        assert!(matches!(
            svc.create_subnet(overlapping).await.unwrap_err(),
            Error::SubnetOverlap { .. }
        ));

        let garbage = NewSubnet {
            cidr: "10.0.0.0".to_string(),
            name: None,
            vlan_id: None,
            description: None,
        };
        assert!(matches!(
            svc.create_subnet(garbage).await.unwrap_err(),
            Error::InvalidCidr(_)
        ));

        subnet(&svc, "10.0.1.0/24").await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_overlapping_subnets() {
        let (svc, _dir) = test_service(500);
        let svc = Arc::new(svc);

        for round in 0..20u8 {
            let mut handles = Vec::new();
            for cidr in [format!("10.{round}.0.0/24"), format!("10.{round}.0.0/25")] {
                let svc = svc.clone();
                handles.push(tokio::spawn(async move {
                    let new = NewSubnet {
                        cidr,
                        name: None,
                        vlan_id: None,
                        description: None,
                    };
                    svc.create_subnet(new).await
                }));
            }

            let mut created = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => created += 1,
                    Err(e) => assert!(matches!(e, Error::SubnetOverlap { .. })),
                }
            }
            assert_eq!(created, 1);
        }

        assert_eq!(svc.store().list_subnets().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_usage_and_claims() {
        let (svc, _dir) = test_service(500);
        let net = subnet(&svc, "10.40.0.0/29").await;
        svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;

        let usage = svc.subnet_usage(&net.id).await.unwrap();
        assert_eq!(usage.total, 8);
        assert_eq!(usage.reserved, 3);
        assert_eq!(usage.available, 5);
        assert_eq!(usage.used, 0);

        let server = Uuid::new_v4();
        svc.claim_ip(&net.id, "10.40.0.2", &server).await.unwrap();
        svc.claim_ip(&net.id, "10.40.0.3", &server).await.unwrap();
        let usage = svc.subnet_usage(&net.id).await.unwrap();
        assert_eq!(usage.used, 2);
        assert_eq!(usage.utilization, 25.0);

        svc.release_ip(&net.id, "10.40.0.2", None).await.unwrap();
        assert_eq!(svc.subnet_usage(&net.id).await.unwrap().used, 1);

        assert!(matches!(
            svc.subnet_usage(&Uuid::new_v4()).await.unwrap_err(),
            Error::SubnetNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_vlan_usage_sums_subnets() {
        let (svc, _dir) = test_service(500);
        let vlan = Vlan {
            id: Uuid::new_v4(),
            vlan_number: 300,
            name: "oob".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        svc.store().create_vlan(&vlan).unwrap();
        for cidr in ["10.30.0.0/29", "10.30.1.0/30"] {
            let new = NewSubnet {
                cidr: cidr.to_string(),
                name: None,
                vlan_id: Some(vlan.id),
                description: None,
            };
            let (net, _) = svc.create_subnet(new).await.unwrap();
            svc.generate_and_upsert_ips_for_subnet(&request(&net)).await;
        }

        let usage = svc.vlan_usage(&vlan.id).await.unwrap();
        assert_eq!(usage.total, 12);
        assert_eq!(usage.reserved, 6);
        assert_eq!(usage.available, 6);
    }
}
