//! Mock PaletteClient for unit testing
//!
//! This module provides a mock implementation of PaletteClientTrait that can be
//! used in unit tests without a reachable Palette instance. It behaves like a
//! server that echoes what it was sent: created clusters get a cloud config
//! whose machine pools mirror the request, feature configs mirror the policies.
//!
//! The mock is organized into domain-specific modules:
//! - `project.rs` - project operations
//! - `cluster.rs` - clusters, cloud configs, machine pools and cluster features
//! - `pack.rs` - pack listing and filter evaluation
//! - `helpers.rs` - server echo conversions and shared utilities

mod cluster;
mod helpers;
mod pack;
mod project;

use crate::error::PaletteError;
use crate::models::*;
use crate::palette_trait::PaletteClientTrait;
use helpers::lock;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A call received by the mock, recorded in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordedCall {
    CreateProject { name: String },
    UpdateProject { uid: String },
    DeleteProject { uid: String },
    CreateCluster { name: String },
    DeleteCluster { uid: String },
    GetClusterStatus { uid: String },
    UpdateProfiles { uid: String },
    UpdateOsPatch { uid: String },
    CreateMachinePool { config_uid: String, name: String },
    UpdateMachinePool { config_uid: String, name: String },
    DeleteMachinePool { config_uid: String, name: String },
    UpdateBackup { uid: String },
    UpdateScan { uid: String },
}

/// Mock PaletteClient for testing
///
/// This mock stores resources in memory and can be configured to fail specific
/// calls or to report a scripted sequence of cluster states.
#[derive(Debug, Clone)]
pub struct MockPaletteClient {
    pub(crate) base_url: String,
    // In-memory storage for resources
    pub(crate) projects: Arc<Mutex<HashMap<String, Project>>>,
    pub(crate) clusters: Arc<Mutex<HashMap<String, SpectroCluster>>>,
    pub(crate) cloud_configs: Arc<Mutex<HashMap<String, LibvirtCloudConfig>>>,
    pub(crate) profiles: Arc<Mutex<HashMap<String, Vec<SpectroClusterProfileEntity>>>>,
    pub(crate) backups: Arc<Mutex<HashMap<String, ClusterBackup>>>,
    pub(crate) scans: Arc<Mutex<HashMap<String, ClusterComplianceScan>>>,
    pub(crate) packs: Arc<Mutex<Vec<Pack>>>,
    // State given to newly created clusters
    pub(crate) initial_cluster_state: Arc<Mutex<String>>,
    // Scripted cluster states, consumed one per status call
    pub(crate) status_scripts: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
    // Call log and failure injection
    pub(crate) calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub(crate) failures: Arc<Mutex<HashMap<RecordedCall, String>>>,
}

impl MockPaletteClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            projects: Arc::new(Mutex::new(HashMap::new())),
            clusters: Arc::new(Mutex::new(HashMap::new())),
            cloud_configs: Arc::new(Mutex::new(HashMap::new())),
            profiles: Arc::new(Mutex::new(HashMap::new())),
            backups: Arc::new(Mutex::new(HashMap::new())),
            scans: Arc::new(Mutex::new(HashMap::new())),
            packs: Arc::new(Mutex::new(Vec::new())),
            initial_cluster_state: Arc::new(Mutex::new("Running".to_string())),
            status_scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a pack to the mock registry (for test setup)
    pub fn add_pack(&self, pack: Pack) {
        lock(&self.packs).push(pack);
    }

    /// Add a project to the mock store (for test setup)
    pub fn add_project(&self, project: Project) {
        lock(&self.projects).insert(project.metadata.uid.clone(), project);
    }

    /// Add a cloud config to the mock store (for test setup)
    pub fn add_cloud_config(&self, config: LibvirtCloudConfig) {
        lock(&self.cloud_configs).insert(config.metadata.uid.clone(), config);
    }

    /// Script the states reported by `get_cluster_status` for a cluster.
    ///
    /// Each call consumes one entry; once the script is exhausted the stored
    /// cluster state is reported again (or `NotFound` if it was deleted).
    pub fn script_cluster_states(&self, uid: &str, states: &[&str]) {
        lock(&self.status_scripts).insert(
            uid.to_string(),
            states.iter().map(|s| (*s).to_string()).collect(),
        );
    }

    /// State reported by clusters created from now on (default `Running`)
    pub fn set_initial_cluster_state(&self, state: &str) {
        *lock(&self.initial_cluster_state) = state.to_string();
    }

    /// Overwrite the stored state of a cluster (for test setup)
    pub fn set_cluster_state(&self, uid: &str, state: &str) {
        if let Some(cluster) = lock(&self.clusters).get_mut(uid) {
            cluster.status.state = state.to_string();
        }
    }

    /// Make the given call fail with an API error
    pub fn fail_on(&self, call: RecordedCall, message: impl Into<String>) {
        lock(&self.failures).insert(call, message.into());
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Forget recorded calls (keeps stored resources)
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Profiles last applied to a cluster
    pub fn cluster_profiles(&self, uid: &str) -> Vec<SpectroClusterProfileEntity> {
        lock(&self.profiles).get(uid).cloned().unwrap_or_default()
    }

    /// Record a call and return the injected failure for it, if any
    pub(crate) fn record(&self, call: RecordedCall) -> Result<(), PaletteError> {
        lock(&self.calls).push(call.clone());
        match lock(&self.failures).get(&call) {
            Some(message) => Err(PaletteError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PaletteClientTrait for MockPaletteClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    // Projects - delegated to project module
    async fn create_project(&self, body: &ProjectEntity) -> Result<String, PaletteError> {
        project::create_project(self, body)
    }

    async fn get_project(&self, uid: &str) -> Result<Project, PaletteError> {
        project::get_project(self, uid)
    }

    async fn update_project(&self, uid: &str, body: &ProjectEntity) -> Result<(), PaletteError> {
        project::update_project(self, uid, body)
    }

    async fn delete_project(&self, uid: &str) -> Result<(), PaletteError> {
        project::delete_project(self, uid)
    }

    // Clusters - delegated to cluster module
    async fn create_cluster_libvirt(&self, body: &LibvirtClusterEntity) -> Result<String, PaletteError> {
        cluster::create_cluster_libvirt(self, body)
    }

    async fn get_cluster(&self, uid: &str) -> Result<SpectroCluster, PaletteError> {
        cluster::get_cluster(self, uid)
    }

    async fn get_cluster_status(&self, uid: &str) -> Result<String, PaletteError> {
        cluster::get_cluster_status(self, uid)
    }

    async fn get_cluster_kubeconfig(&self, uid: &str) -> Result<String, PaletteError> {
        cluster::get_cluster_kubeconfig(self, uid)
    }

    async fn delete_cluster(&self, uid: &str) -> Result<(), PaletteError> {
        cluster::delete_cluster(self, uid)
    }

    async fn update_cluster_profiles(&self, uid: &str, body: &SpectroClusterProfiles) -> Result<(), PaletteError> {
        cluster::update_cluster_profiles(self, uid, body)
    }

    async fn update_cluster_os_patch_config(&self, uid: &str, body: &OsPatchEntity) -> Result<(), PaletteError> {
        cluster::update_cluster_os_patch_config(self, uid, body)
    }

    async fn get_cloud_config_libvirt(&self, config_uid: &str) -> Result<LibvirtCloudConfig, PaletteError> {
        cluster::get_cloud_config_libvirt(self, config_uid)
    }

    async fn create_machine_pool_libvirt(&self, config_uid: &str, body: &LibvirtMachinePoolConfigEntity) -> Result<(), PaletteError> {
        cluster::create_machine_pool_libvirt(self, config_uid, body)
    }

    async fn update_machine_pool_libvirt(&self, config_uid: &str, body: &LibvirtMachinePoolConfigEntity) -> Result<(), PaletteError> {
        cluster::update_machine_pool_libvirt(self, config_uid, body)
    }

    async fn delete_machine_pool_libvirt(&self, config_uid: &str, pool_name: &str) -> Result<(), PaletteError> {
        cluster::delete_machine_pool_libvirt(self, config_uid, pool_name)
    }

    async fn get_cluster_backup_config(&self, uid: &str) -> Result<Option<ClusterBackup>, PaletteError> {
        cluster::get_cluster_backup_config(self, uid)
    }

    async fn update_cluster_backup_config(&self, uid: &str, body: &ClusterBackupConfigEntity) -> Result<(), PaletteError> {
        cluster::update_cluster_backup_config(self, uid, body)
    }

    async fn get_cluster_scan_config(&self, uid: &str) -> Result<Option<ClusterComplianceScan>, PaletteError> {
        cluster::get_cluster_scan_config(self, uid)
    }

    async fn update_cluster_scan_config(&self, uid: &str, body: &ClusterComplianceScanConfig) -> Result<(), PaletteError> {
        cluster::update_cluster_scan_config(self, uid, body)
    }

    // Packs - delegated to pack module
    async fn list_packs(&self, filters: &[String]) -> Result<Vec<Pack>, PaletteError> {
        pack::list_packs(self, filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_injected_failure_is_recorded_and_returned() {
        let mock = MockPaletteClient::new("http://palette.test");
        mock.fail_on(RecordedCall::DeleteProject { uid: "p1".to_string() }, "boom");

        let err = mock.delete_project("p1").await.expect_err("delete should fail");
        assert!(matches!(err, PaletteError::Api(ref m) if m == "boom"));
        assert_eq!(mock.calls(), vec![RecordedCall::DeleteProject { uid: "p1".to_string() }]);
    }
}
