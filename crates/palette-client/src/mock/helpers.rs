//! Server echo conversions and shared utilities for the mock client

use crate::models::*;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mock store, recovering the data if a panicking test poisoned it
pub(crate) fn lock<T>(store: &Mutex<T>) -> MutexGuard<'_, T> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Generate a Palette-style uid
pub(crate) fn new_uid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Fresh metadata for a stored object, keeping name, labels and annotations
pub(crate) fn stored_metadata(requested: &ObjectMeta, uid: String) -> ObjectMeta {
    let now = chrono::Utc::now();
    ObjectMeta {
        name: requested.name.clone(),
        uid,
        labels: requested.labels.clone(),
        annotations: requested.annotations.clone(),
        creation_timestamp: Some(now),
        last_modified_timestamp: Some(now),
    }
}

/// How the server reports a machine pool it was asked to create
pub(crate) fn echo_machine_pool(entity: &LibvirtMachinePoolConfigEntity) -> LibvirtMachinePoolConfig {
    let cloud = &entity.cloud_config;
    let pool = &entity.pool_config;

    LibvirtMachinePoolConfig {
        name: pool.name.clone(),
        is_control_plane: pool.is_control_plane,
        use_control_plane_as_worker: pool.use_control_plane_as_worker,
        size: pool.size,
        labels: pool.labels.clone(),
        update_strategy: pool.update_strategy.clone(),
        instance_type: Some(cloud.instance_type.clone()),
        root_disk_in_gb: cloud.root_disk_in_gb,
        non_root_disks_in_gb: cloud.non_root_disks_in_gb.clone(),
        placements: cloud
            .placements
            .iter()
            .map(|p| LibvirtPlacementConfig {
                uid: new_uid(),
                host_uid: p.host_uid.clone(),
                networks: p.networks.clone(),
                source_storage_pool: p.source_storage_pool.clone(),
                target_storage_pool: p.target_storage_pool.clone(),
                data_storage_pool: p.data_storage_pool.clone(),
            })
            .collect(),
    }
}

/// How the server reports a compliance scan config it was sent
pub(crate) fn echo_scan_drivers(config: &ClusterComplianceScanConfig) -> BTreeMap<String, ComplianceScanDriver> {
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
