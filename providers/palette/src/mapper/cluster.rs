//! Libvirt cluster mapping

use super::machine_pool::{expand_machine_pool, flatten_machine_pools};
use super::policies::{expand_backup_policy, expand_scan_policy, flatten_backup_policy, flatten_scan_policy};
use super::{expand_tags, flatten_tags};
use crate::error::ProviderError;
use palette_client::{
    ClusterBackup, ClusterComplianceScan, ClusterConfigEntity, LibvirtCloudConfig, LibvirtClusterConfig,
    LibvirtClusterEntity, LibvirtClusterEntitySpec, LibvirtControlPlaneEndpoint, MachineManagementConfig, ObjectMeta,
    OsPatchConfig, PackValuesEntity, SpectroCluster, SpectroClusterPolicies, SpectroClusterProfileEntity,
};
use resources::{LibvirtClusterSpec, LibvirtClusterState, PackValuesSpec};

/// Control plane endpoint type for a virtual IP
const VIP_ENDPOINT_TYPE: &str = "VIP";

/// Everything read from the API to build the state of one cluster
#[derive(Debug, Clone, Default)]
pub struct ObservedLibvirtCluster {
    pub cluster: SpectroCluster,
    pub kubeconfig: Option<String>,
    pub cloud_config: LibvirtCloudConfig,
    pub backup: Option<ClusterBackup>,
    pub scan: Option<ClusterComplianceScan>,
}

fn expand_pack_values(packs: &[PackValuesSpec]) -> Vec<PackValuesEntity> {
    packs
        .iter()
        .map(|pack| PackValuesEntity {
            name: pack.name.clone(),
            tag: pack.tag.clone(),
            values: pack.values.clone(),
        })
        .collect()
}

/// Profiles attached to the cluster.
///
/// The deprecated `cluster_profile_id` yields one profile carrying the
/// top-level packs; otherwise each `cluster_profile` block yields one profile.
pub fn expand_profiles(spec: &LibvirtClusterSpec) -> Vec<SpectroClusterProfileEntity> {
    if let Some(uid) = &spec.cluster_profile_id {
        return vec![SpectroClusterProfileEntity {
            uid: uid.clone(),
            pack_values: expand_pack_values(&spec.packs),
        }];
    }

    spec.cluster_profiles
        .iter()
        .map(|profile| SpectroClusterProfileEntity {
            uid: profile.id.clone(),
            pack_values: expand_pack_values(&profile.packs),
        })
        .collect()
}

/// OS patch settings, omitted when none is declared
pub fn expand_cluster_config(spec: &LibvirtClusterSpec) -> ClusterConfigEntity {
    if !spec.os_patch_on_boot && spec.os_patch_schedule.is_none() && spec.os_patch_after.is_none() {
        return ClusterConfigEntity::default();
    }

    ClusterConfigEntity {
        machine_management_config: Some(MachineManagementConfig {
            os_patch_config: Some(OsPatchConfig {
                patch_on_boot: spec.os_patch_on_boot,
                schedule: spec.os_patch_schedule.clone().unwrap_or_default(),
                on_demand_patch_after: spec.os_patch_after.clone(),
            }),
        }),
    }
}

/// Build the cluster create request. `uid` is empty for a create.
pub fn expand_libvirt_cluster(spec: &LibvirtClusterSpec, uid: &str) -> Result<LibvirtClusterEntity, ProviderError> {
    let resource = format!("libvirt cluster '{}'", spec.name);

    let policies = if spec.backup_policy.is_some() || spec.scan_policy.is_some() {
        Some(SpectroClusterPolicies {
            backup_policy: spec.backup_policy.as_ref().map(expand_backup_policy),
            scan_policy: spec.scan_policy.as_ref().map(expand_scan_policy),
        })
    } else {
        None
    };

    let machine_pool_config = spec
        .ordered_machine_pools()
        .into_iter()
        .map(|pool| expand_machine_pool(&resource, pool))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LibvirtClusterEntity {
        metadata: ObjectMeta {
            name: spec.name.clone(),
            uid: uid.to_string(),
            labels: expand_tags(&resource, &spec.tags)?,
            ..Default::default()
        },
        spec: LibvirtClusterEntitySpec {
            cloud_account_uid: spec.cloud_account_id.clone(),
            profiles: expand_profiles(spec),
            policies,
            cloud_config: LibvirtClusterConfig {
                ntp_servers: Vec::new(),
                ssh_keys: vec![spec.cloud_config.ssh_key.clone()],
                control_plane_endpoint: LibvirtControlPlaneEndpoint {
                    host: spec.cloud_config.vip.clone(),
                    endpoint_type: VIP_ENDPOINT_TYPE.to_string(),
                },
            },
            machine_pool_config,
            cluster_config: expand_cluster_config(spec),
        },
    })
}

pub fn flatten_libvirt_cluster(observed: &ObservedLibvirtCluster) -> LibvirtClusterState {
    let cluster = &observed.cluster;
    let os_patch = cluster
        .spec
        .cluster_config
        .as_ref()
        .and_then(|c| c.machine_management_config.as_ref())
        .and_then(|m| m.os_patch_config.as_ref());

    LibvirtClusterState {
        uid: cluster.metadata.uid.clone(),
        cloud_config_id: cluster.spec.cloud_config_ref.uid.clone(),
        kubeconfig: observed.kubeconfig.clone(),
        name: cluster.metadata.name.clone(),
        tags: flatten_tags(&cluster.metadata.labels),
        os_patch_on_boot: os_patch.is_some_and(|p| p.patch_on_boot),
        os_patch_schedule: os_patch.map(|p| p.schedule.clone()).filter(|s| !s.is_empty()),
        os_patch_after: os_patch.and_then(|p| p.on_demand_patch_after.clone()),
        machine_pools: flatten_machine_pools(&observed.cloud_config.spec.machine_pool_config),
        backup_policy: observed
            .backup
            .as_ref()
            .and_then(|b| b.spec.config.as_ref())
            .map(flatten_backup_policy),
        scan_policy: observed
            .scan
            .as_ref()
            .and_then(|s| s.spec.driver_spec.as_ref())
            .map(flatten_scan_policy),
    }
}
