//! Libvirt cluster declaration
//!
//! A libvirt cluster runs on edge appliances. Its machine pools are a keyed
//! collection (by name) reconciled individually on update, and the control
//! plane pools always come first.

use crate::error::ValidationError;
use crate::machine_pool::MachinePoolSpec;
use crate::policies::{BackupPolicySpec, ScanPolicySpec};
use crate::{Validate, require, tags};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// LibvirtClusterSpec defines the desired state of a libvirt cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LibvirtClusterSpec {
    /// Cluster name (changing it replaces the cluster)
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    /// Single cluster profile, combined with the top-level `pack` overrides.
    /// Deprecated in favour of `cluster_profile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_profile_id: Option<String>,

    /// Cluster profiles, each with its own pack overrides
    #[serde(rename = "cluster_profile", default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_profiles: Vec<ClusterProfileSpec>,

    /// Pack overrides for `cluster_profile_id`
    #[serde(rename = "pack", default, skip_serializing_if = "Vec::is_empty")]
    pub packs: Vec<PackValuesSpec>,

    /// Cloud account (changing it replaces the cluster)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account_id: Option<String>,

    /// Cluster-wide cloud settings (changing them replaces the cluster)
    pub cloud_config: CloudConfigSpec,

    #[serde(default)]
    pub os_patch_on_boot: bool,

    /// Cron schedule for OS patching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_patch_schedule: Option<String>,

    /// RFC3339 time after which an on-demand OS patch runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_patch_after: Option<String>,

    /// Machine pools, keyed by name
    #[serde(rename = "machine_pool")]
    pub machine_pools: Vec<MachinePoolSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_policy: Option<BackupPolicySpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_policy: Option<ScanPolicySpec>,
}

/// Cluster profile reference with pack overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClusterProfileSpec {
    /// Profile uid
    pub id: String,

    #[serde(rename = "pack", default, skip_serializing_if = "Vec::is_empty")]
    pub packs: Vec<PackValuesSpec>,
}

/// Values override for one pack of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackValuesSpec {
    pub name: String,
    pub tag: String,
    pub values: String,
}

/// Cluster-wide cloud settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CloudConfigSpec {
    /// Public SSH key installed on every node
    pub ssh_key: String,

    /// Virtual IP of the control plane endpoint
    pub vip: String,
}

/// Observed state of a libvirt cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibvirtClusterState {
    /// Server-assigned uid
    pub uid: String,

    /// Server-assigned uid of the cloud config holding the machine pools
    pub cloud_config_id: String,

    /// Admin kubeconfig, `None` until the cluster has one
    pub kubeconfig: Option<String>,
    /// Cluster name
    pub name: String,
    /// Tags read back from the cluster labels
    pub tags: BTreeSet<String>,
    /// Patch the node OS on boot
    pub os_patch_on_boot: bool,
    /// Cron schedule for OS patching
    pub os_patch_schedule: Option<String>,
    /// RFC3339 time after which an on-demand OS patch runs
    pub os_patch_after: Option<String>,

    /// Machine pools, control plane first
    pub machine_pools: Vec<MachinePoolSpec>,

    /// Backup policy held by Palette, if any
    pub backup_policy: Option<BackupPolicySpec>,
    /// Compliance scan policy held by Palette, if any
    pub scan_policy: Option<ScanPolicySpec>,
}

impl LibvirtClusterSpec {
    /// Machine pools with control plane pools first, otherwise in declared order
    pub fn ordered_machine_pools(&self) -> Vec<&MachinePoolSpec> {
        let mut pools: Vec<&MachinePoolSpec> = self.machine_pools.iter().collect();
        // sort_by_key is stable
        pools.sort_by_key(|pool| !pool.control_plane);
        pools
    }

    fn resource(&self) -> String {
        format!("libvirt cluster '{}'", self.name)
    }
}

impl Validate for LibvirtClusterSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        let resource = self.resource();
        require(&resource, "name", &self.name)?;
        tags::tags_to_labels(&resource, &self.tags)?;

        if !self.cluster_profiles.is_empty() {
            if self.cluster_profile_id.is_some() {
                return Err(ValidationError::Conflict {
                    resource,
                    field: "cluster_profile",
                    conflicts_with: "'cluster_profile_id'".to_string(),
                });
            }
            if !self.packs.is_empty() {
                return Err(ValidationError::Conflict {
                    resource,
                    field: "cluster_profile",
                    conflicts_with: "'pack'".to_string(),
                });
            }
        }
        for profile in &self.cluster_profiles {
            require(&resource, "cluster_profile.id", &profile.id)?;
        }
        for pack in self.packs.iter().chain(self.cluster_profiles.iter().flat_map(|p| p.packs.iter())) {
            require(&resource, "pack.name", &pack.name)?;
            require(&resource, "pack.tag", &pack.tag)?;
        }

        require(&resource, "cloud_config.ssh_key", &self.cloud_config.ssh_key)?;
        require(&resource, "cloud_config.vip", &self.cloud_config.vip)?;

        if let Some(schedule) = &self.os_patch_schedule {
            require(&resource, "os_patch_schedule", schedule)?;
        }
        if let Some(after) = &self.os_patch_after {
            chrono::DateTime::parse_from_rfc3339(after).map_err(|e| {
                ValidationError::invalid(&resource, format!("os_patch_after '{}' is not RFC3339: {}", after, e))
            })?;
        }

        if self.machine_pools.is_empty() {
            return Err(ValidationError::invalid(&resource, "at least one machine_pool is required"));
        }
        let mut names = HashSet::new();
        for pool in &self.machine_pools {
            pool.validate_in(&resource)?;
            if !names.insert(pool.name.as_str()) {
                return Err(ValidationError::DuplicateKey {
                    resource,
                    collection: "machine_pool",
                    key: pool.name.clone(),
                });
            }
        }
        if !self.machine_pools.iter().any(|pool| pool.control_plane) {
            return Err(ValidationError::invalid(&resource, "at least one control_plane machine_pool is required"));
        }

        if let Some(backup) = &self.backup_policy {
            backup.validate_in(&resource)?;
        }
        if let Some(scan) = &self.scan_policy {
            scan.validate_in(&resource)?;
        }
        Ok(())
    }
}
