//! Machine pool reconciliation for libvirt clusters
//!
//! Pools are keyed by name and compared as request bodies: the declared pool
//! is expanded, the observed pool is converted back into the body that would
//! have produced it. Renaming a pool deletes the old one and creates a new one.

use super::{ApplySummary, CollectionApplier, DiffSet, Keyed, apply, diff};
use crate::error::ProviderError;
use crate::mapper::{expand_machine_pool, machine_pool_entity};
use async_trait::async_trait;
use palette_client::{LibvirtCloudConfig, LibvirtMachinePoolConfigEntity, PaletteClientTrait};
use resources::LibvirtClusterSpec;
use tracing::debug;

impl Keyed for LibvirtMachinePoolConfigEntity {
    fn key(&self) -> &str {
        &self.pool_config.name
    }
}

/// Applies machine pool operations to one libvirt cloud config
pub struct MachinePoolApplier<'a> {
    client: &'a dyn PaletteClientTrait,
    cloud_config_uid: &'a str,
}

impl<'a> MachinePoolApplier<'a> {
    pub fn new(client: &'a dyn PaletteClientTrait, cloud_config_uid: &'a str) -> Self {
        Self {
            client,
            cloud_config_uid,
        }
    }
}

#[async_trait]
impl CollectionApplier<LibvirtMachinePoolConfigEntity> for MachinePoolApplier<'_> {
    async fn create(&self, _key: &str, desired: &LibvirtMachinePoolConfigEntity) -> Result<(), ProviderError> {
        Ok(self.client.create_machine_pool_libvirt(self.cloud_config_uid, desired).await?)
    }

    async fn update(&self, _key: &str, desired: &LibvirtMachinePoolConfigEntity) -> Result<(), ProviderError> {
        Ok(self.client.update_machine_pool_libvirt(self.cloud_config_uid, desired).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), ProviderError> {
        Ok(self.client.delete_machine_pool_libvirt(self.cloud_config_uid, key).await?)
    }
}

/// Diff the declared pools of `spec` against an observed cloud config
pub fn plan_machine_pools(
    spec: &LibvirtClusterSpec,
    cloud_config: &LibvirtCloudConfig,
) -> Result<DiffSet<LibvirtMachinePoolConfigEntity>, ProviderError> {
    let resource = format!("libvirt cluster '{}'", spec.name);

    let declared = spec
        .ordered_machine_pools()
        .into_iter()
        .map(|pool| expand_machine_pool(&resource, pool))
        .collect::<Result<Vec<_>, _>>()?;

    let observed = cloud_config
        .spec
        .machine_pool_config
        .iter()
        .map(|pool| machine_pool_entity(&resource, pool))
        .collect::<Result<Vec<_>, _>>()?;

    diff(&resource, &declared, &observed)
}

/// Fetch the cloud config, then create, update and delete pools until it
/// matches the declaration
pub async fn reconcile_machine_pools(
    client: &dyn PaletteClientTrait,
    spec: &LibvirtClusterSpec,
    cloud_config_uid: &str,
) -> Result<ApplySummary, ProviderError> {
    let resource = format!("libvirt cluster '{}'", spec.name);

    let cloud_config = client.get_cloud_config_libvirt(cloud_config_uid).await?;
    let plan = plan_machine_pools(spec, &cloud_config)?;
    if plan.is_empty() {
        debug!("{}: machine pools already up-to-date", resource);
    }

    apply(&resource, &MachinePoolApplier::new(client, cloud_config_uid), &plan).await
}
