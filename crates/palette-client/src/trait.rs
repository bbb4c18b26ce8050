//! PaletteClient trait for mocking
//!
//! This trait abstracts the PaletteClient to enable mocking in unit tests.
//! The concrete PaletteClient implements this trait, and tests can use the
//! in-memory mock behind the `test-util` feature.

use crate::error::PaletteError;
use crate::models::*;

/// Trait for Palette API client operations
///
/// Every method performs exactly one API call and keeps no state between
/// calls, so a single client can be shared by concurrent reconciliations.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait PaletteClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    // Projects
    async fn create_project(&self, body: &ProjectEntity) -> Result<String, PaletteError>;
    async fn get_project(&self, uid: &str) -> Result<Project, PaletteError>;
    async fn update_project(&self, uid: &str, body: &ProjectEntity) -> Result<(), PaletteError>;
    async fn delete_project(&self, uid: &str) -> Result<(), PaletteError>;

    // Clusters
    async fn create_cluster_libvirt(&self, body: &LibvirtClusterEntity) -> Result<String, PaletteError>;
    async fn get_cluster(&self, uid: &str) -> Result<SpectroCluster, PaletteError>;
    /// Current lifecycle state label of a cluster (e.g. "Provisioning", "Running")
    async fn get_cluster_status(&self, uid: &str) -> Result<String, PaletteError>;
    async fn get_cluster_kubeconfig(&self, uid: &str) -> Result<String, PaletteError>;
    async fn delete_cluster(&self, uid: &str) -> Result<(), PaletteError>;
    async fn update_cluster_profiles(&self, uid: &str, body: &SpectroClusterProfiles) -> Result<(), PaletteError>;
    async fn update_cluster_os_patch_config(&self, uid: &str, body: &OsPatchEntity) -> Result<(), PaletteError>;

    // Cloud configs and machine pools
    async fn get_cloud_config_libvirt(&self, config_uid: &str) -> Result<LibvirtCloudConfig, PaletteError>;
    async fn create_machine_pool_libvirt(&self, config_uid: &str, body: &LibvirtMachinePoolConfigEntity) -> Result<(), PaletteError>;
    async fn update_machine_pool_libvirt(&self, config_uid: &str, body: &LibvirtMachinePoolConfigEntity) -> Result<(), PaletteError>;
    async fn delete_machine_pool_libvirt(&self, config_uid: &str, pool_name: &str) -> Result<(), PaletteError>;

    // Cluster features
    async fn get_cluster_backup_config(&self, uid: &str) -> Result<Option<ClusterBackup>, PaletteError>;
    async fn update_cluster_backup_config(&self, uid: &str, body: &ClusterBackupConfigEntity) -> Result<(), PaletteError>;
    async fn get_cluster_scan_config(&self, uid: &str) -> Result<Option<ClusterComplianceScan>, PaletteError>;
    async fn update_cluster_scan_config(&self, uid: &str, body: &ClusterComplianceScanConfig) -> Result<(), PaletteError>;

    // Packs
    async fn list_packs(&self, filters: &[String]) -> Result<Vec<Pack>, PaletteError>;
}
