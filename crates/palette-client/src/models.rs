//! Palette API models
//!
//! These models follow the Palette v1 REST API payloads (camelCase JSON).
//! Only the fields the provider manages or reads back are modelled; unknown
//! response fields are ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Object metadata shared by every Palette resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_timestamp: Option<DateTime<Utc>>,
}

/// Response body of every create endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UidResponse {
    pub uid: String,
}

/// Reference to another Palette object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// Projects

/// Request body for creating or updating a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntity {
    pub metadata: ObjectMeta,
}

/// Project as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Project status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
    #[serde(default)]
    pub is_disabled: bool,
}

// Libvirt cluster request bodies

/// Request body for creating a libvirt cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibvirtClusterEntity {
    pub metadata: ObjectMeta,
    pub spec: LibvirtClusterEntitySpec,
}

/// Spec section of [`LibvirtClusterEntity`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtClusterEntitySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account_uid: Option<String>,
    #[serde(default)]
    pub profiles: Vec<SpectroClusterProfileEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<SpectroClusterPolicies>,
    pub cloud_config: LibvirtClusterConfig,
    #[serde(rename = "machinepoolconfig", default)]
    pub machine_pool_config: Vec<LibvirtMachinePoolConfigEntity>,
    #[serde(default)]
    pub cluster_config: ClusterConfigEntity,
}

/// A cluster profile attached to a cluster, with optional pack overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectroClusterProfileEntity {
    pub uid: String,
    #[serde(default)]
    pub pack_values: Vec<PackValuesEntity>,
}

/// Values override for a single pack of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackValuesEntity {
    pub name: String,
    pub tag: String,
    pub values: String,
}

/// Request body for replacing the profiles of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectroClusterProfiles {
    pub profiles: Vec<SpectroClusterProfileEntity>,
}

/// Policies applied to a cluster at creation time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectroClusterPolicies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_policy: Option<ClusterBackupConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_policy: Option<ClusterComplianceScanConfig>,
}

/// Cron-style schedule used by cluster features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterFeatureSchedule {
    #[serde(default)]
    pub scheduled_run_time: String,
}

/// Backup configuration of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBackupConfig {
    pub backup_location_uid: String,
    pub backup_prefix: String,
    pub duration_in_hours: i64,
    pub include_all_disks: bool,
    pub include_cluster_resources: bool,
    #[serde(default)]
    pub namespaces: Vec<String>,
    pub schedule: ClusterFeatureSchedule,
}

/// Compliance scan configuration of a cluster (request side)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterComplianceScanConfig {
    pub configuration_scan: ScanScheduleEntity,
    pub penetration_scan: ScanScheduleEntity,
    pub conformance_scan: ScanScheduleEntity,
}

/// Schedule of one scan kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanScheduleEntity {
    pub schedule: ClusterFeatureSchedule,
}

/// Cluster-wide configuration (machine management)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfigEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_management_config: Option<MachineManagementConfig>,
}

/// Machine management settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineManagementConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_patch_config: Option<OsPatchConfig>,
}

/// OS patching settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsPatchConfig {
    #[serde(default)]
    pub patch_on_boot: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schedule: String,
    /// RFC 3339 timestamp after which an on-demand patch runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_patch_after: Option<String>,
}

/// Request body for the OS patch endpoint of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsPatchEntity {
    pub os_patch_config: OsPatchConfig,
}

/// Libvirt cloud settings of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtClusterConfig {
    #[serde(default)]
    pub ntp_servers: Vec<String>,
    #[serde(default)]
    pub ssh_keys: Vec<String>,
    pub control_plane_endpoint: LibvirtControlPlaneEndpoint,
}

/// Control plane endpoint (VIP)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibvirtControlPlaneEndpoint {
    pub host: String,
    #[serde(rename = "type")]
    pub endpoint_type: String,
}

/// Machine pool request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtMachinePoolConfigEntity {
    pub cloud_config: LibvirtMachinePoolCloudConfigEntity,
    pub pool_config: MachinePoolConfigEntity,
}

/// Cloud-specific part of a machine pool request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtMachinePoolCloudConfigEntity {
    #[serde(default)]
    pub placements: Vec<LibvirtPlacementEntity>,
    #[serde(rename = "rootDiskInGB")]
    pub root_disk_in_gb: i32,
    #[serde(rename = "nonRootDisksInGB", default)]
    pub non_root_disks_in_gb: Vec<LibvirtDiskSpec>,
    pub instance_type: LibvirtInstanceType,
}

/// Libvirt VM sizing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibvirtInstanceType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpuset: Option<String>,
    #[serde(rename = "memoryInMB")]
    pub memory_in_mb: i32,
    #[serde(rename = "numCPUs")]
    pub num_cpus: i32,
}

/// Additional (non-root) disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibvirtDiskSpec {
    #[serde(rename = "sizeInGB")]
    pub size_in_gb: i32,
}

/// Placement of pool VMs on a libvirt appliance (request side)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtPlacementEntity {
    #[serde(default)]
    pub networks: Vec<LibvirtNetworkSpec>,
    pub source_storage_pool: String,
    pub target_storage_pool: String,
    pub data_storage_pool: String,
    pub host_uid: String,
}

/// Network attachment of a placement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtNetworkSpec {
    pub network_name: String,
    pub network_type: String,
}

/// Cloud-agnostic part of a machine pool request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachinePoolConfigEntity {
    pub is_control_plane: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    pub name: String,
    pub size: i32,
    pub update_strategy: UpdateStrategy,
    pub use_control_plane_as_worker: bool,
}

/// Rolling update strategy of a machine pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStrategy {
    #[serde(rename = "type")]
    pub strategy_type: String,
}

// Libvirt cluster responses

/// Cluster as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpectroCluster {
    pub metadata: ObjectMeta,
    pub spec: SpectroClusterSpec,
    #[serde(default)]
    pub status: SpectroClusterStatus,
}

/// Spec section of [`SpectroCluster`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectroClusterSpec {
    #[serde(default)]
    pub cloud_type: String,
    pub cloud_config_ref: ObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_config: Option<ClusterConfigEntity>,
}

/// Status section of [`SpectroCluster`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpectroClusterStatus {
    #[serde(default)]
    pub state: String,
}

/// Libvirt cloud config of a cluster (holds the machine pools)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibvirtCloudConfig {
    pub metadata: ObjectMeta,
    pub spec: LibvirtCloudConfigSpec,
}

/// Spec section of [`LibvirtCloudConfig`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtCloudConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_config: Option<LibvirtClusterConfig>,
    #[serde(default)]
    pub machine_pool_config: Vec<LibvirtMachinePoolConfig>,
}

/// Machine pool as observed in a cloud config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtMachinePoolConfig {
    pub name: String,
    #[serde(default)]
    pub is_control_plane: bool,
    #[serde(default)]
    pub use_control_plane_as_worker: bool,
    #[serde(default)]
    pub size: i32,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub update_strategy: UpdateStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<LibvirtInstanceType>,
    #[serde(rename = "rootDiskInGB", default)]
    pub root_disk_in_gb: i32,
    #[serde(rename = "nonRootDisksInGB", default)]
    pub non_root_disks_in_gb: Vec<LibvirtDiskSpec>,
    #[serde(default)]
    pub placements: Vec<LibvirtPlacementConfig>,
}

/// Placement as observed in a cloud config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtPlacementConfig {
    /// Server-assigned placement id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default)]
    pub host_uid: String,
    #[serde(default)]
    pub networks: Vec<LibvirtNetworkSpec>,
    #[serde(default)]
    pub source_storage_pool: String,
    #[serde(default)]
    pub target_storage_pool: String,
    #[serde(default)]
    pub data_storage_pool: String,
}

/// Backup feature of a cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterBackup {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ClusterBackupSpec,
}

/// Spec section of [`ClusterBackup`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterBackupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ClusterBackupConfig>,
}

/// Request body for the backup feature endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBackupConfigEntity {
    pub backup_config: ClusterBackupConfig,
}

/// Compliance scan feature of a cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterComplianceScan {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ClusterComplianceScanSpec,
}

/// Spec section of [`ClusterComplianceScan`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterComplianceScanSpec {
    /// Scan drivers keyed by driver name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_spec: Option<BTreeMap<String, ComplianceScanDriver>>,
}

/// Configuration of one scan driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceScanDriver {
    pub config: ComplianceScanDriverConfig,
}

/// Schedule of one scan driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceScanDriverConfig {
    pub schedule: ClusterFeatureSchedule,
}

/// Driver name of the configuration scan
pub const CONFIGURATION_SCAN_DRIVER: &str = "kube-bench";
/// Driver name of the penetration scan
pub const PENETRATION_SCAN_DRIVER: &str = "kube-hunter";
/// Driver name of the conformance scan
pub const CONFORMANCE_SCAN_DRIVER: &str = "sonobuoy";

// Packs

/// Pack registry entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pack {
    pub metadata: ObjectMeta,
    pub spec: PackSpec,
}

/// Spec section of [`Pack`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSpec {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub cloud_types: Vec<String>,
    #[serde(rename = "registryUid", default)]
    pub registry_uid: String,
    #[serde(default)]
    pub values: String,
}
