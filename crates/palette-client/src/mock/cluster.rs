//! Cluster operations for MockPaletteClient
//!
//! Handles clusters, libvirt cloud configs, machine pools and cluster features.
//! Clusters report "Running" as soon as they are created unless a state
//! script was installed with `script_cluster_states`.

use super::helpers::{echo_machine_pool, echo_scan_drivers, lock, new_uid, stored_metadata};
use super::{MockPaletteClient, RecordedCall};
use crate::error::PaletteError;
use crate::models::*;

fn cluster_not_found(uid: &str) -> PaletteError {
    PaletteError::NotFound(format!("Cluster {} not found", uid))
}

fn cloud_config_not_found(uid: &str) -> PaletteError {
    PaletteError::NotFound(format!("Libvirt cloud config {} not found", uid))
}

pub fn create_cluster_libvirt(client: &MockPaletteClient, body: &LibvirtClusterEntity) -> Result<String, PaletteError> {
    client.record(RecordedCall::CreateCluster {
        name: body.metadata.name.clone(),
    })?;

    let uid = new_uid();
    let config_uid = new_uid();

    let cloud_config = LibvirtCloudConfig {
        metadata: ObjectMeta {
            name: body.metadata.name.clone(),
            uid: config_uid.clone(),
            ..Default::default()
        },
        spec: LibvirtCloudConfigSpec {
            cluster_config: Some(body.spec.cloud_config.clone()),
            machine_pool_config: body.spec.machine_pool_config.iter().map(echo_machine_pool).collect(),
        },
    };

    let cluster = SpectroCluster {
        metadata: stored_metadata(&body.metadata, uid.clone()),
        spec: SpectroClusterSpec {
            cloud_type: "libvirt".to_string(),
            cloud_config_ref: ObjectReference {
                uid: config_uid.clone(),
                kind: Some("LibvirtCloudConfig".to_string()),
                name: Some(body.metadata.name.clone()),
            },
            cluster_config: Some(body.spec.cluster_config.clone()),
        },
        status: SpectroClusterStatus {
            state: lock(&client.initial_cluster_state).clone(),
        },
    };

    if let Some(policies) = &body.spec.policies {
        if let Some(backup) = &policies.backup_policy {
            lock(&client.backups).insert(
                uid.clone(),
                ClusterBackup {
                    metadata: ObjectMeta::default(),
                    spec: ClusterBackupSpec {
                        config: Some(backup.clone()),
                    },
                },
            );
        }
        if let Some(scan) = &policies.scan_policy {
            lock(&client.scans).insert(
                uid.clone(),
                ClusterComplianceScan {
                    metadata: ObjectMeta::default(),
                    spec: ClusterComplianceScanSpec {
                        driver_spec: Some(echo_scan_drivers(scan)),
                    },
                },
            );
        }
    }

    lock(&client.profiles).insert(uid.clone(), body.spec.profiles.clone());
    lock(&client.cloud_configs).insert(config_uid, cloud_config);
    lock(&client.clusters).insert(uid.clone(), cluster);
    Ok(uid)
}

pub fn get_cluster(client: &MockPaletteClient, uid: &str) -> Result<SpectroCluster, PaletteError> {
    lock(&client.clusters)
        .get(uid)
        .cloned()
        .ok_or_else(|| cluster_not_found(uid))
}

pub fn get_cluster_status(client: &MockPaletteClient, uid: &str) -> Result<String, PaletteError> {
    client.record(RecordedCall::GetClusterStatus { uid: uid.to_string() })?;

    if let Some(state) = lock(&client.status_scripts).get_mut(uid).and_then(|script| script.pop_front()) {
        return Ok(state);
    }

    get_cluster(client, uid).map(|cluster| cluster.status.state)
}

pub fn get_cluster_kubeconfig(client: &MockPaletteClient, uid: &str) -> Result<String, PaletteError> {
    let cluster = get_cluster(client, uid)?;
    Ok(format!(
        "apiVersion: v1\nkind: Config\nclusters:\n- name: {}\n  cluster:\n    server: https://{}.clusters.palette.test:6443\n",
        cluster.metadata.name, uid
    ))
}

pub fn delete_cluster(client: &MockPaletteClient, uid: &str) -> Result<(), PaletteError> {
    client.record(RecordedCall::DeleteCluster { uid: uid.to_string() })?;

    let cluster = lock(&client.clusters)
        .remove(uid)
        .ok_or_else(|| cluster_not_found(uid))?;

    lock(&client.cloud_configs).remove(&cluster.spec.cloud_config_ref.uid);
    lock(&client.backups).remove(uid);
    lock(&client.scans).remove(uid);
    lock(&client.profiles).remove(uid);
    Ok(())
}

pub fn update_cluster_profiles(client: &MockPaletteClient, uid: &str, body: &SpectroClusterProfiles) -> Result<(), PaletteError> {
    client.record(RecordedCall::UpdateProfiles { uid: uid.to_string() })?;

    get_cluster(client, uid)?;
    lock(&client.profiles).insert(uid.to_string(), body.profiles.clone());
    Ok(())
}

pub fn update_cluster_os_patch_config(client: &MockPaletteClient, uid: &str, body: &OsPatchEntity) -> Result<(), PaletteError> {
    client.record(RecordedCall::UpdateOsPatch { uid: uid.to_string() })?;

    let mut clusters = lock(&client.clusters);
    let cluster = clusters.get_mut(uid).ok_or_else(|| cluster_not_found(uid))?;
    cluster
        .spec
        .cluster_config
        .get_or_insert_with(ClusterConfigEntity::default)
        .machine_management_config
        .get_or_insert_with(MachineManagementConfig::default)
        .os_patch_config = Some(body.os_patch_config.clone());
    Ok(())
}

pub fn get_cloud_config_libvirt(client: &MockPaletteClient, config_uid: &str) -> Result<LibvirtCloudConfig, PaletteError> {
    lock(&client.cloud_configs)
        .get(config_uid)
        .cloned()
        .ok_or_else(|| cloud_config_not_found(config_uid))
}

pub fn create_machine_pool_libvirt(
    client: &MockPaletteClient,
    config_uid: &str,
    body: &LibvirtMachinePoolConfigEntity,
) -> Result<(), PaletteError> {
    client.record(RecordedCall::CreateMachinePool {
        config_uid: config_uid.to_string(),
        name: body.pool_config.name.clone(),
    })?;

    let mut configs = lock(&client.cloud_configs);
    let config = configs
        .get_mut(config_uid)
        .ok_or_else(|| cloud_config_not_found(config_uid))?;

    let pools = &mut config.spec.machine_pool_config;
    if pools.iter().any(|p| p.name == body.pool_config.name) {
        return Err(PaletteError::Api(format!(
            "Machine pool {} already exists",
            body.pool_config.name
        )));
    }
    pools.push(echo_machine_pool(body));
    Ok(())
}

pub fn update_machine_pool_libvirt(
    client: &MockPaletteClient,
    config_uid: &str,
    body: &LibvirtMachinePoolConfigEntity,
) -> Result<(), PaletteError> {
    client.record(RecordedCall::UpdateMachinePool {
        config_uid: config_uid.to_string(),
        name: body.pool_config.name.clone(),
    })?;

    let mut configs = lock(&client.cloud_configs);
    let config = configs
        .get_mut(config_uid)
        .ok_or_else(|| cloud_config_not_found(config_uid))?;

    let pool = config
        .spec
        .machine_pool_config
        .iter_mut()
        .find(|p| p.name == body.pool_config.name)
        .ok_or_else(|| PaletteError::NotFound(format!("Machine pool {} not found", body.pool_config.name)))?;
    *pool = echo_machine_pool(body);
    Ok(())
}

pub fn delete_machine_pool_libvirt(client: &MockPaletteClient, config_uid: &str, pool_name: &str) -> Result<(), PaletteError> {
    client.record(RecordedCall::DeleteMachinePool {
        config_uid: config_uid.to_string(),
        name: pool_name.to_string(),
    })?;

    let mut configs = lock(&client.cloud_configs);
    let config = configs
        .get_mut(config_uid)
        .ok_or_else(|| cloud_config_not_found(config_uid))?;

    let pools = &mut config.spec.machine_pool_config;
    let before = pools.len();
    pools.retain(|p| p.name != pool_name);
    if pools.len() == before {
        return Err(PaletteError::NotFound(format!("Machine pool {} not found", pool_name)));
    }
    Ok(())
}

pub fn get_cluster_backup_config(client: &MockPaletteClient, uid: &str) -> Result<Option<ClusterBackup>, PaletteError> {
    get_cluster(client, uid)?;
    Ok(lock(&client.backups).get(uid).cloned())
}

pub fn update_cluster_backup_config(
    client: &MockPaletteClient,
    uid: &str,
    body: &ClusterBackupConfigEntity,
) -> Result<(), PaletteError> {
    client.record(RecordedCall::UpdateBackup { uid: uid.to_string() })?;

    get_cluster(client, uid)?;
    lock(&client.backups).insert(
        uid.to_string(),
        ClusterBackup {
            metadata: ObjectMeta::default(),
            spec: ClusterBackupSpec {
                config: Some(body.backup_config.clone()),
            },
        },
    );
    Ok(())
}

pub fn get_cluster_scan_config(client: &MockPaletteClient, uid: &str) -> Result<Option<ClusterComplianceScan>, PaletteError> {
    get_cluster(client, uid)?;
    Ok(lock(&client.scans).get(uid).cloned())
}

pub fn update_cluster_scan_config(
    client: &MockPaletteClient,
    uid: &str,
    body: &ClusterComplianceScanConfig,
) -> Result<(), PaletteError> {
    client.record(RecordedCall::UpdateScan { uid: uid.to_string() })?;

    get_cluster(client, uid)?;
    lock(&client.scans).insert(
        uid.to_string(),
        ClusterComplianceScan {
            metadata: ObjectMeta::default(),
            spec: ClusterComplianceScanSpec {
                driver_spec: Some(echo_scan_drivers(body)),
            },
        },
    );
    Ok(())
}
