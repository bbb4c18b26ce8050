//! Test utilities for unit testing the mapper, reconciler and resources
//!
//! Fixtures for declarations, plus the conversions the Palette API applies
//! when it echoes back what it was sent.

use crate::mapper::ObservedLibvirtCluster;
use palette_client::*;
use rand::Rng;
use rand::seq::SliceRandom;
use resources::*;
use resources::UpdateStrategy;
use std::collections::{BTreeMap, BTreeSet};

/// Helper to create a test ProjectSpec
pub fn project_spec(name: &str, tags: &[&str], description: Option<&str>) -> ProjectSpec {
    ProjectSpec {
        name: name.to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        description: description.map(str::to_string),
    }
}

/// Helper to create a test placement on `host-1`
pub fn placement_spec() -> PlacementSpec {
    PlacementSpec {
        appliance_id: "host-1".to_string(),
        network_type: "bridge".to_string(),
        network_names: "br0".to_string(),
        image_storage_pool: "ehl_images".to_string(),
        target_storage_pool: "ehl_images".to_string(),
        data_storage_pool: "ehl_data".to_string(),
    }
}

/// Helper to create a test MachinePoolSpec
pub fn machine_pool_spec(name: &str, control_plane: bool, count: i32) -> MachinePoolSpec {
    MachinePoolSpec {
        name: name.to_string(),
        control_plane,
        control_plane_as_worker: false,
        count,
        update_strategy: UpdateStrategy::default(),
        instance_type: InstanceTypeSpec {
            disk_size_gb: 40,
            memory_mb: 8192,
            cpu: 4,
            cpus_sets: None,
            attached_disks_size_gb: None,
        },
        placements: vec![placement_spec()],
    }
}

/// Helper to create a test LibvirtClusterSpec with the given (name, control_plane, count) pools
pub fn cluster_spec(name: &str, pools: &[(&str, bool, i32)]) -> LibvirtClusterSpec {
    LibvirtClusterSpec {
        name: name.to_string(),
        tags: BTreeSet::new(),
        cluster_profile_id: None,
        cluster_profiles: vec![ClusterProfileSpec {
            id: "profile-1".to_string(),
            packs: Vec::new(),
        }],
        packs: Vec::new(),
        cloud_account_id: None,
        cloud_config: CloudConfigSpec {
            ssh_key: "ssh-rsa AAAA".to_string(),
            vip: "192.168.100.15".to_string(),
        },
        os_patch_on_boot: false,
        os_patch_schedule: None,
        os_patch_after: None,
        machine_pools: pools
            .iter()
            .map(|(pool, control_plane, count)| machine_pool_spec(pool, *control_plane, *count))
            .collect(),
        backup_policy: None,
        scan_policy: None,
    }
}

pub fn backup_policy() -> BackupPolicySpec {
    BackupPolicySpec {
        prefix: "daily".to_string(),
        backup_location_id: "location-1".to_string(),
        schedule: "0 0 * * *".to_string(),
        expiry_in_hour: 24,
        include_disks: true,
        include_cluster_resources: true,
        namespaces: ["kube-system".to_string()].into_iter().collect(),
    }
}

pub fn scan_policy() -> ScanPolicySpec {
    ScanPolicySpec {
        configuration_scan_schedule: "0 0 * * SUN".to_string(),
        penetration_scan_schedule: "0 0 * * MON".to_string(),
        conformance_scan_schedule: "0 0 1 * *".to_string(),
    }
}

/// Helper to create a test Pack
pub fn pack(uid: &str, name: &str, version: &str, clouds: &[&str]) -> Pack {
    Pack {
        metadata: ObjectMeta {
            name: name.to_string(),
            uid: uid.to_string(),
            ..Default::default()
        },
        spec: PackSpec {
            name: name.to_string(),
            version: version.to_string(),
            cloud_types: clouds.iter().map(|c| (*c).to_string()).collect(),
            registry_uid: "registry-1".to_string(),
            values: "pack: values".to_string(),
        },
    }
}

/// How the API reports a machine pool it was asked to create
pub fn echo_machine_pool(entity: &LibvirtMachinePoolConfigEntity) -> LibvirtMachinePoolConfig {
    LibvirtMachinePoolConfig {
        name: entity.pool_config.name.clone(),
        is_control_plane: entity.pool_config.is_control_plane,
        use_control_plane_as_worker: entity.pool_config.use_control_plane_as_worker,
        size: entity.pool_config.size,
        labels: entity.pool_config.labels.clone(),
        update_strategy: entity.pool_config.update_strategy.clone(),
        instance_type: Some(entity.cloud_config.instance_type.clone()),
        root_disk_in_gb: entity.cloud_config.root_disk_in_gb,
        non_root_disks_in_gb: entity.cloud_config.non_root_disks_in_gb.clone(),
        placements: entity
            .cloud_config
            .placements
            .iter()
            .enumerate()
            .map(|(i, p)| LibvirtPlacementConfig {
                uid: format!("placement-{}", i),
                host_uid: p.host_uid.clone(),
                networks: p.networks.clone(),
                source_storage_pool: p.source_storage_pool.clone(),
                target_storage_pool: p.target_storage_pool.clone(),
                data_storage_pool: p.data_storage_pool.clone(),
            })
            .collect(),
    }
}

/// How the API reports a compliance scan config it was sent
pub fn echo_scan_drivers(config: &ClusterComplianceScanConfig) -> BTreeMap<String, ComplianceScanDriver> {
    let driver = |scan: &ScanScheduleEntity| ComplianceScanDriver {
        config: ComplianceScanDriverConfig {
            schedule: scan.schedule.clone(),
        },
    };
    BTreeMap::from([
        (CONFIGURATION_SCAN_DRIVER.to_string(), driver(&config.configuration_scan)),
        (PENETRATION_SCAN_DRIVER.to_string(), driver(&config.penetration_scan)),
        (CONFORMANCE_SCAN_DRIVER.to_string(), driver(&config.conformance_scan)),
    ])
}

/// Everything the API reports for a cluster created from `entity`
pub fn echo_cluster(entity: &LibvirtClusterEntity, uid: &str, config_uid: &str) -> ObservedLibvirtCluster {
    let policies = entity.spec.policies.clone().unwrap_or_default();
    ObservedLibvirtCluster {
        cluster: SpectroCluster {
            metadata: ObjectMeta {
                uid: uid.to_string(),
                ..entity.metadata.clone()
            },
            spec: SpectroClusterSpec {
                cloud_type: "libvirt".to_string(),
                cloud_config_ref: ObjectReference {
                    uid: config_uid.to_string(),
                    ..Default::default()
                },
                cluster_config: Some(entity.spec.cluster_config.clone()),
            },
            status: SpectroClusterStatus {
                state: "Running".to_string(),
            },
        },
        kubeconfig: Some("apiVersion: v1\nkind: Config\n".to_string()),
        cloud_config: LibvirtCloudConfig {
            metadata: ObjectMeta {
                uid: config_uid.to_string(),
                ..Default::default()
            },
            spec: LibvirtCloudConfigSpec {
                cluster_config: Some(entity.spec.cloud_config.clone()),
                machine_pool_config: entity.spec.machine_pool_config.iter().map(echo_machine_pool).collect(),
            },
        },
        backup: policies.backup_policy.map(|config| ClusterBackup {
            spec: ClusterBackupSpec { config: Some(config) },
            ..Default::default()
        }),
        scan: policies.scan_policy.map(|config| ClusterComplianceScan {
            spec: ClusterComplianceScanSpec {
                driver_spec: Some(echo_scan_drivers(&config)),
            },
            ..Default::default()
        }),
    }
}

fn random_word<R: Rng>(rng: &mut R, prefix: &str) -> String {
    format!("{}-{}", prefix, rng.gen_range(0..1000))
}

fn random_tags<R: Rng>(rng: &mut R) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    for i in 0..rng.gen_range(0..4) {
        if rng.gen_bool(0.5) {
            tags.insert(format!("key{}:{}", i, random_word(rng, "value")));
        } else {
            tags.insert(format!("key{}", i));
        }
    }
    tags
}

/// Random valid project declaration
pub fn random_project_spec<R: Rng>(rng: &mut R) -> ProjectSpec {
    ProjectSpec {
        name: random_word(rng, "project"),
        tags: random_tags(rng),
        description: rng.gen_bool(0.5).then(|| random_word(rng, "description")),
    }
}

/// Random valid machine pool, in canonical form (no spaces in composite fields)
pub fn random_machine_pool_spec<R: Rng>(rng: &mut R, name: String, control_plane: bool) -> MachinePoolSpec {
    let networks = ["br0", "br1", "default"];
    let placements = (0..rng.gen_range(1..3))
        .map(|i| {
            let count = rng.gen_range(1..=networks.len());
            PlacementSpec {
                appliance_id: format!("host-{}", i),
                network_type: ["bridge", "default"].choose(rng).copied().unwrap_or("bridge").to_string(),
                network_names: networks[..count].join(","),
                image_storage_pool: random_word(rng, "images"),
                target_storage_pool: random_word(rng, "target"),
                data_storage_pool: random_word(rng, "data"),
            }
        })
        .collect();

    let disks: Vec<String> = (0..rng.gen_range(0..3)).map(|_| rng.gen_range(1..500).to_string()).collect();

    MachinePoolSpec {
        name,
        control_plane,
        control_plane_as_worker: control_plane && rng.gen_bool(0.5),
        count: rng.gen_range(0..10),
        update_strategy: if rng.gen_bool(0.5) {
            UpdateStrategy::RollingUpdateScaleOut
        } else {
            UpdateStrategy::RollingUpdateScaleIn
        },
        instance_type: InstanceTypeSpec {
            disk_size_gb: rng.gen_range(20..200),
            memory_mb: rng.gen_range(1..64) * 1024,
            cpu: rng.gen_range(1..32),
            cpus_sets: rng.gen_bool(0.3).then(|| rng.gen_range(1..8)),
            attached_disks_size_gb: (!disks.is_empty()).then(|| disks.join(",")),
        },
        placements,
    }
}

/// Random valid cluster declaration
pub fn random_cluster_spec<R: Rng>(rng: &mut R) -> LibvirtClusterSpec {
    let mut pools = vec![random_machine_pool_spec(rng, "cp-0".to_string(), true)];
    for i in 0..rng.gen_range(0..4) {
        let control_plane = rng.gen_bool(0.2);
        pools.push(random_machine_pool_spec(rng, format!("pool-{}", i), control_plane));
    }
    pools.shuffle(rng);

    let mut spec = cluster_spec(&random_word(rng, "cluster"), &[]);
    spec.tags = random_tags(rng);
    spec.machine_pools = pools;
    spec.os_patch_on_boot = rng.gen_bool(0.5);
    spec.os_patch_schedule = rng.gen_bool(0.5).then(|| "0 0 * * SUN".to_string());
    spec.os_patch_after = rng.gen_bool(0.5).then(|| "2026-10-20T10:00:00Z".to_string());
    spec.backup_policy = rng.gen_bool(0.5).then(backup_policy);
    spec.scan_policy = rng.gen_bool(0.5).then(scan_policy);
    spec
}
