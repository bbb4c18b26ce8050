//! Libvirt machine pool declaration

use crate::error::ValidationError;
use crate::require;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MachinePoolSpec defines one keyed machine pool of a libvirt cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MachinePoolSpec {
    /// Pool name, the identity key within the cluster
    pub name: String,

    /// Whether this pool runs the control plane
    #[serde(default)]
    pub control_plane: bool,

    /// Allow workloads on control plane nodes
    #[serde(default)]
    pub control_plane_as_worker: bool,

    /// Number of nodes
    pub count: i32,

    /// Rolling update strategy
    #[serde(default)]
    pub update_strategy: UpdateStrategy,

    /// Virtual machine sizing
    pub instance_type: InstanceTypeSpec,

    /// Hosts the pool's nodes are placed on
    #[serde(default)]
    pub placements: Vec<PlacementSpec>,
}

/// Rolling update strategy of a machine pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Add the new node before removing the old one
    #[default]
    RollingUpdateScaleOut,

    /// Remove the old node before adding the new one
    RollingUpdateScaleIn,
}

impl UpdateStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStrategy::RollingUpdateScaleOut => "RollingUpdateScaleOut",
            UpdateStrategy::RollingUpdateScaleIn => "RollingUpdateScaleIn",
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RollingUpdateScaleOut" => Ok(UpdateStrategy::RollingUpdateScaleOut),
            "RollingUpdateScaleIn" => Ok(UpdateStrategy::RollingUpdateScaleIn),
            other => Err(format!("unknown update strategy '{}'", other)),
        }
    }
}

/// Virtual machine sizing of a pool's nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InstanceTypeSpec {
    /// Root disk size in GB
    pub disk_size_gb: i32,

    /// Memory in MB
    pub memory_mb: i32,

    /// Number of virtual CPUs
    pub cpu: i32,

    /// Number of pinned CPU sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus_sets: Option<i32>,

    /// Extra disks as comma-separated sizes in GB, e.g. "10, 20"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_disks_size_gb: Option<String>,
}

/// Placement of a pool on a libvirt appliance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlacementSpec {
    /// Uid of the edge host appliance
    pub appliance_id: String,

    /// Network type applied to every network of this placement
    pub network_type: String,

    /// Comma-separated network names
    pub network_names: String,

    /// Storage pool holding the VM images
    pub image_storage_pool: String,

    /// Storage pool for the VM root disks
    pub target_storage_pool: String,

    /// Storage pool for attached data disks
    pub data_storage_pool: String,
}

impl MachinePoolSpec {
    /// Validate the pool in the context of its cluster
    pub fn validate_in(&self, resource: &str) -> Result<(), ValidationError> {
        require(resource, "machine_pool.name", &self.name)?;
        let pool = format!("{} machine pool '{}'", resource, self.name);
        if self.count < 0 {
            return Err(ValidationError::invalid(&pool, format!("count must be >= 0, got {}", self.count)));
        }
        let sizes = [
            ("disk_size_gb", self.instance_type.disk_size_gb),
            ("memory_mb", self.instance_type.memory_mb),
            ("cpu", self.instance_type.cpu),
        ];
        for (field, value) in sizes {
            if value <= 0 {
                return Err(ValidationError::invalid(&pool, format!("{} must be positive, got {}", field, value)));
            }
        }
        if self.placements.is_empty() {
            return Err(ValidationError::invalid(&pool, "at least one placement is required"));
        }
        for placement in &self.placements {
            require(&pool, "placements.appliance_id", &placement.appliance_id)?;
            require(&pool, "placements.network_type", &placement.network_type)?;
            require(&pool, "placements.network_names", &placement.network_names)?;
            if placement.network_names.split(',').all(|name| name.trim().is_empty()) {
                return Err(ValidationError::invalid(
                    &pool,
                    format!("placements.network_names '{}' names no network", placement.network_names),
                ));
            }
            require(&pool, "placements.image_storage_pool", &placement.image_storage_pool)?;
            require(&pool, "placements.target_storage_pool", &placement.target_storage_pool)?;
            require(&pool, "placements.data_storage_pool", &placement.data_storage_pool)?;
        }
        Ok(())
    }
}
