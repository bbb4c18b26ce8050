//! Libvirt machine pool mapping

use crate::error::ProviderError;
use palette_client::{
    LibvirtDiskSpec, LibvirtInstanceType, LibvirtMachinePoolCloudConfigEntity, LibvirtMachinePoolConfig,
    LibvirtMachinePoolConfigEntity, LibvirtNetworkSpec, LibvirtPlacementConfig, LibvirtPlacementEntity,
    MachinePoolConfigEntity, UpdateStrategy as UpdateStrategyEntity,
};
use resources::{InstanceTypeSpec, MachinePoolSpec, PlacementSpec, UpdateStrategy};
use tracing::warn;

/// Label Palette expects on control plane pools
const CONTROL_PLANE_LABEL: &str = "master";

/// Parse a comma-separated list of disk sizes in GB.
///
/// An absent or blank value means no extra disks. Any token that is not a
/// positive integer is a configuration error.
pub fn parse_attached_disks(resource: &str, value: Option<&str>) -> Result<Vec<LibvirtDiskSpec>, ProviderError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(|token| {
            let token = token.trim();
            match token.parse::<i32>() {
                Ok(size) if size > 0 => Ok(LibvirtDiskSpec { size_in_gb: size }),
                _ => Err(ProviderError::Configuration(format!(
                    "{}: attached_disks_size_gb '{}' contains invalid disk size '{}'",
                    resource, value, token
                ))),
            }
        })
        .collect()
}

/// One network per comma-separated name, each carrying the placement's network type
pub fn expand_networks(placement: &PlacementSpec) -> Vec<LibvirtNetworkSpec> {
    placement
        .network_names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| LibvirtNetworkSpec {
            network_name: name.to_string(),
            network_type: placement.network_type.clone(),
        })
        .collect()
}

fn expand_placement(placement: &PlacementSpec) -> LibvirtPlacementEntity {
    LibvirtPlacementEntity {
        networks: expand_networks(placement),
        source_storage_pool: placement.image_storage_pool.clone(),
        target_storage_pool: placement.target_storage_pool.clone(),
        data_storage_pool: placement.data_storage_pool.clone(),
        host_uid: placement.appliance_id.clone(),
    }
}

/// Build the request body for one machine pool
pub fn expand_machine_pool(resource: &str, pool: &MachinePoolSpec) -> Result<LibvirtMachinePoolConfigEntity, ProviderError> {
    let instance = &pool.instance_type;
    let context = format!("{} machine pool '{}'", resource, pool.name);

    let labels = if pool.control_plane {
        vec![CONTROL_PLANE_LABEL.to_string()]
    } else {
        Vec::new()
    };

    Ok(LibvirtMachinePoolConfigEntity {
        cloud_config: LibvirtMachinePoolCloudConfigEntity {
            placements: pool.placements.iter().map(expand_placement).collect(),
            root_disk_in_gb: instance.disk_size_gb,
            non_root_disks_in_gb: parse_attached_disks(&context, instance.attached_disks_size_gb.as_deref())?,
            instance_type: LibvirtInstanceType {
                cpuset: instance.cpus_sets.map(|sets| sets.to_string()),
                memory_in_mb: instance.memory_mb,
                num_cpus: instance.cpu,
            },
        },
        pool_config: MachinePoolConfigEntity {
            is_control_plane: pool.control_plane,
            labels,
            name: pool.name.clone(),
            size: pool.count,
            update_strategy: UpdateStrategyEntity {
                strategy_type: pool.update_strategy.as_str().to_string(),
            },
            use_control_plane_as_worker: pool.control_plane_as_worker,
        },
    })
}

fn flatten_placement(placement: &LibvirtPlacementConfig) -> PlacementSpec {
    PlacementSpec {
        appliance_id: placement.host_uid.clone(),
        network_type: placement
            .networks
            .first()
            .map(|n| n.network_type.clone())
            .unwrap_or_default(),
        network_names: placement
            .networks
            .iter()
            .map(|n| n.network_name.as_str())
            .collect::<Vec<_>>()
            .join(","),
        image_storage_pool: placement.source_storage_pool.clone(),
        target_storage_pool: placement.target_storage_pool.clone(),
        data_storage_pool: placement.data_storage_pool.clone(),
    }
}

fn flatten_update_strategy(pool: &LibvirtMachinePoolConfig) -> UpdateStrategy {
    let raw = pool.update_strategy.strategy_type.as_str();
    if raw.is_empty() {
        return UpdateStrategy::default();
    }
    raw.parse().unwrap_or_else(|e| {
        warn!("Machine pool {}: {}, assuming {}", pool.name, e, UpdateStrategy::default());
        UpdateStrategy::default()
    })
}

/// Provider state of one observed machine pool
pub fn flatten_machine_pool(pool: &LibvirtMachinePoolConfig) -> MachinePoolSpec {
    let disks = pool
        .non_root_disks_in_gb
        .iter()
        .map(|d| d.size_in_gb.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let instance_type = match &pool.instance_type {
        Some(instance) => InstanceTypeSpec {
            disk_size_gb: pool.root_disk_in_gb,
            memory_mb: instance.memory_in_mb,
            cpu: instance.num_cpus,
            cpus_sets: instance.cpuset.as_deref().and_then(|sets| sets.trim().parse().ok()),
            attached_disks_size_gb: (!disks.is_empty()).then_some(disks),
        },
        None => InstanceTypeSpec {
            disk_size_gb: pool.root_disk_in_gb,
            attached_disks_size_gb: (!disks.is_empty()).then_some(disks),
            ..Default::default()
        },
    };

    MachinePoolSpec {
        name: pool.name.clone(),
        control_plane: pool.is_control_plane,
        control_plane_as_worker: pool.use_control_plane_as_worker,
        count: pool.size,
        update_strategy: flatten_update_strategy(pool),
        instance_type,
        placements: pool.placements.iter().map(flatten_placement).collect(),
    }
}

/// Provider state of all observed pools, control plane pools first
pub fn flatten_machine_pools(pools: &[LibvirtMachinePoolConfig]) -> Vec<MachinePoolSpec> {
    let mut flattened: Vec<MachinePoolSpec> = pools.iter().map(flatten_machine_pool).collect();
    flattened.sort_by_key(|pool| !pool.control_plane);
    flattened
}

/// Request body equivalent of an observed pool.
///
/// Comparing this with the expanded declaration ignores every
/// server-assigned field (placement uids, extra labels).
pub fn machine_pool_entity(resource: &str, pool: &LibvirtMachinePoolConfig) -> Result<LibvirtMachinePoolConfigEntity, ProviderError> {
    expand_machine_pool(resource, &flatten_machine_pool(pool))
}
