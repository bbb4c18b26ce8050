//! Palette API client
//!
//! Implements the Palette v1 REST API client for the resources the provider
//! manages. Endpoints live under `/v1/projects`, `/v1/spectroclusters`,
//! `/v1/cloudconfigs/libvirt` and `/v1/packs`.

use crate::common::query::query_resources;
use crate::common::HttpClient;
use crate::error::PaletteError;
use crate::models::*;
use crate::palette_trait::PaletteClientTrait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Palette API client
#[derive(Debug, Clone)]
pub struct PaletteClient {
    http: HttpClient,
}

/// Percent-encode one path segment
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

impl PaletteClient {
    /// Create a new Palette client
    ///
    /// # Arguments
    /// * `base_url` - Palette base URL (e.g., "https://api.spectrocloud.com")
    /// * `api_key` - API key sent in the `ApiKey` header
    /// * `project_uid` - Optional project scope sent in the `ProjectUid` header
    pub fn new(base_url: String, api_key: String, project_uid: Option<String>) -> Result<Self, PaletteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(PaletteError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, api_key, project_uid),
        })
    }

    /// Fetch a resource, mapping `NotFound` to `None`
    async fn get_optional<T: for<'de> serde::Deserialize<'de>>(&self, path: &str) -> Result<Option<T>, PaletteError> {
        match self.http.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(PaletteError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl PaletteClientTrait for PaletteClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Create a project
    ///
    /// # Returns
    /// * `Ok(String)` - UID of the new project
    /// * `Err(PaletteError)` - If the request fails
    async fn create_project(&self, body: &ProjectEntity) -> Result<String, PaletteError> {
        debug!("Creating project {} in Palette", body.metadata.name);
        let created: UidResponse = self.http.post("/v1/projects", body).await?;
        Ok(created.uid)
    }

    async fn get_project(&self, uid: &str) -> Result<Project, PaletteError> {
        debug!("Fetching project {} from Palette", uid);
        self.http.get(&format!("/v1/projects/{}", segment(uid))).await
    }

    async fn update_project(&self, uid: &str, body: &ProjectEntity) -> Result<(), PaletteError> {
        debug!("Updating project {} in Palette", uid);
        self.http.put(&format!("/v1/projects/{}", segment(uid)), body).await
    }

    async fn delete_project(&self, uid: &str) -> Result<(), PaletteError> {
        debug!("Deleting project {} in Palette", uid);
        self.http.delete(&format!("/v1/projects/{}", segment(uid))).await
    }

    /// Create a libvirt cluster
    ///
    /// # Returns
    /// * `Ok(String)` - UID of the new cluster
    /// * `Err(PaletteError)` - If the request fails
    async fn create_cluster_libvirt(&self, body: &LibvirtClusterEntity) -> Result<String, PaletteError> {
        debug!("Creating libvirt cluster {} in Palette", body.metadata.name);
        let created: UidResponse = self.http.post("/v1/spectroclusters/libvirt", body).await?;
        Ok(created.uid)
    }

    async fn get_cluster(&self, uid: &str) -> Result<SpectroCluster, PaletteError> {
        debug!("Fetching cluster {} from Palette", uid);
        self.http.get(&format!("/v1/spectroclusters/{}", segment(uid))).await
    }

    async fn get_cluster_status(&self, uid: &str) -> Result<String, PaletteError> {
        let cluster = self.get_cluster(uid).await?;
        Ok(cluster.status.state)
    }

    async fn get_cluster_kubeconfig(&self, uid: &str) -> Result<String, PaletteError> {
        debug!("Fetching kubeconfig of cluster {}", uid);
        self.http
            .get_text(&format!("/v1/spectroclusters/{}/assets/kubeconfig", segment(uid)))
            .await
    }

    async fn delete_cluster(&self, uid: &str) -> Result<(), PaletteError> {
        debug!("Deleting cluster {} in Palette", uid);
        self.http.delete(&format!("/v1/spectroclusters/{}", segment(uid))).await
    }

    async fn update_cluster_profiles(&self, uid: &str, body: &SpectroClusterProfiles) -> Result<(), PaletteError> {
        debug!("Updating profiles of cluster {}", uid);
        self.http
            .patch(&format!("/v1/spectroclusters/{}/profiles", segment(uid)), body)
            .await
    }

    async fn update_cluster_os_patch_config(&self, uid: &str, body: &OsPatchEntity) -> Result<(), PaletteError> {
        debug!("Updating OS patch config of cluster {}", uid);
        self.http
            .patch(&format!("/v1/spectroclusters/{}/clusterConfig/osPatch", segment(uid)), body)
            .await
    }

    async fn get_cloud_config_libvirt(&self, config_uid: &str) -> Result<LibvirtCloudConfig, PaletteError> {
        debug!("Fetching libvirt cloud config {}", config_uid);
        self.http
            .get(&format!("/v1/cloudconfigs/libvirt/{}", segment(config_uid)))
            .await
    }

    async fn create_machine_pool_libvirt(&self, config_uid: &str, body: &LibvirtMachinePoolConfigEntity) -> Result<(), PaletteError> {
        debug!("Creating machine pool {} in cloud config {}", body.pool_config.name, config_uid);
        self.http
            .post_no_content(
                &format!("/v1/cloudconfigs/libvirt/{}/machinePools", segment(config_uid)),
                body,
            )
            .await
    }

    async fn update_machine_pool_libvirt(&self, config_uid: &str, body: &LibvirtMachinePoolConfigEntity) -> Result<(), PaletteError> {
        debug!("Updating machine pool {} in cloud config {}", body.pool_config.name, config_uid);
        self.http
            .put(
                &format!(
                    "/v1/cloudconfigs/libvirt/{}/machinePools/{}",
                    segment(config_uid),
                    segment(&body.pool_config.name)
                ),
                body,
            )
            .await
    }

    async fn delete_machine_pool_libvirt(&self, config_uid: &str, pool_name: &str) -> Result<(), PaletteError> {
        debug!("Deleting machine pool {} in cloud config {}", pool_name, config_uid);
        self.http
            .delete(&format!(
                "/v1/cloudconfigs/libvirt/{}/machinePools/{}",
                segment(config_uid),
                segment(pool_name)
            ))
            .await
    }

    async fn get_cluster_backup_config(&self, uid: &str) -> Result<Option<ClusterBackup>, PaletteError> {
        self.get_optional(&format!("/v1/spectroclusters/{}/features/backup", segment(uid)))
            .await
    }

    async fn update_cluster_backup_config(&self, uid: &str, body: &ClusterBackupConfigEntity) -> Result<(), PaletteError> {
        debug!("Updating backup config of cluster {}", uid);
        self.http
            .put(&format!("/v1/spectroclusters/{}/features/backup", segment(uid)), body)
            .await
    }

    async fn get_cluster_scan_config(&self, uid: &str) -> Result<Option<ClusterComplianceScan>, PaletteError> {
        self.get_optional(&format!("/v1/spectroclusters/{}/features/complianceScan", segment(uid)))
            .await
    }

    async fn update_cluster_scan_config(&self, uid: &str, body: &ClusterComplianceScanConfig) -> Result<(), PaletteError> {
        debug!("Updating compliance scan config of cluster {}", uid);
        self.http
            .put(&format!("/v1/spectroclusters/{}/features/complianceScan", segment(uid)), body)
            .await
    }

    async fn list_packs(&self, filters: &[String]) -> Result<Vec<Pack>, PaletteError> {
        debug!("Listing packs with filters {:?}", filters);
        query_resources(&self.http, "/v1/packs", filters, true).await
    }
}
