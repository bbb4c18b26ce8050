//! Libvirt cluster lifecycle
//!
//! Create submits the cluster and waits until it is `Running`. Update applies
//! changes in a fixed order: machine pools, cluster profiles, backup policy,
//! scan policy, OS patch settings. Machine pools and policies are compared
//! with the remote state; profiles and OS patch settings with the previous
//! declaration. Delete submits the deletion and waits until the cluster can
//! no longer be read.
//!
//! A failure while waiting leaves the cluster in Palette. Create then returns
//! [`ProviderError::NotReady`] carrying the cluster uid so the caller can keep
//! tracking it.

use super::{check_existing, require_unchanged};
use crate::config::{CLUSTER_DELETED_STATE, ProviderConfig};
use crate::error::ProviderError;
use crate::mapper::{
    ObservedLibvirtCluster, expand_backup_policy, expand_cluster_config, expand_libvirt_cluster, expand_profiles,
    expand_scan_policy, flatten_backup_policy, flatten_libvirt_cluster, flatten_scan_policy,
};
use crate::poller::{PollReport, ReadinessPoller};
use crate::reconciler::reconcile_machine_pools;
use palette_client::{
    ClusterBackupConfigEntity, OsPatchEntity, PaletteClientTrait, PaletteError, SpectroClusterProfiles,
};
use resources::{LibvirtClusterSpec, LibvirtClusterState, Validate};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

fn label(spec: &LibvirtClusterSpec) -> String {
    format!("libvirt cluster '{}'", spec.name)
}

/// Submit the cluster create request and return the new uid
pub async fn submit_libvirt_cluster(
    client: &dyn PaletteClientTrait,
    spec: &LibvirtClusterSpec,
) -> Result<String, ProviderError> {
    spec.validate()?;
    let body = expand_libvirt_cluster(spec, "")?;

    let uid = client.create_cluster_libvirt(&body).await?;
    info!("Created {} with uid {}", label(spec), uid);
    Ok(uid)
}

/// Wait until a newly created cluster reports `Running`
pub async fn wait_for_cluster_running(
    client: &dyn PaletteClientTrait,
    config: &ProviderConfig,
    cancel: &CancellationToken,
    resource: &str,
    uid: &str,
) -> Result<PollReport, ProviderError> {
    let poller = ReadinessPoller::new(format!("{} ({})", resource, uid), config.cluster_create_poller());
    poller
        .wait(cancel, move || async move {
            client.get_cluster_status(uid).await.map_err(ProviderError::from)
        })
        .await
}

/// Create a cluster, wait for it to be running and return its state
pub async fn create_libvirt_cluster(
    client: &dyn PaletteClientTrait,
    config: &ProviderConfig,
    cancel: &CancellationToken,
    spec: &LibvirtClusterSpec,
) -> Result<LibvirtClusterState, ProviderError> {
    let resource = label(spec);
    let uid = submit_libvirt_cluster(client, spec).await?;

    if let Err(e) = wait_for_cluster_running(client, config, cancel, &resource, &uid).await {
        error!("{} ({}) was created but did not become ready: {}", resource, uid, e);
        return Err(ProviderError::NotReady {
            resource,
            uid,
            source: Box::new(e),
        });
    }

    read_libvirt_cluster(client, &uid)
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{} ({}) disappeared right after creation", resource, uid)))
}

/// Read a cluster with its kubeconfig, policies and machine pools.
///
/// `None` if the cluster no longer exists.
pub async fn read_libvirt_cluster(
    client: &dyn PaletteClientTrait,
    uid: &str,
) -> Result<Option<LibvirtClusterState>, ProviderError> {
    let resource = format!("libvirt cluster {}", uid);
    let Some(cluster) = check_existing(&resource, client.get_cluster(uid)).await? else {
        return Ok(None);
    };

    let kubeconfig = match client.get_cluster_kubeconfig(uid).await {
        Ok(kubeconfig) => Some(kubeconfig),
        Err(PaletteError::NotFound(_)) => {
            debug!("{} has no kubeconfig yet", resource);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let backup = client.get_cluster_backup_config(uid).await?;
    let scan = client.get_cluster_scan_config(uid).await?;
    let cloud_config = client.get_cloud_config_libvirt(&cluster.spec.cloud_config_ref.uid).await?;

    Ok(Some(flatten_libvirt_cluster(&ObservedLibvirtCluster {
        cluster,
        kubeconfig,
        cloud_config,
        backup,
        scan,
    })))
}

/// Checks that must pass before an update makes any remote call
fn check_update(resource: &str, previous: &LibvirtClusterSpec, spec: &LibvirtClusterSpec) -> Result<(), ProviderError> {
    spec.validate()?;
    require_unchanged(resource, "name", &previous.name, &spec.name)?;
    require_unchanged(resource, "cloud_account_id", &previous.cloud_account_id, &spec.cloud_account_id)?;
    require_unchanged(resource, "cloud_config", &previous.cloud_config, &spec.cloud_config)?;

    if previous.backup_policy.is_some() && spec.backup_policy.is_none() {
        return Err(ProviderError::Configuration(format!("{}: backup_policy cannot be destroyed", resource)));
    }
    if previous.scan_policy.is_some() && spec.scan_policy.is_none() {
        return Err(ProviderError::Configuration(format!("{}: scan_policy cannot be destroyed", resource)));
    }
    if previous.tags != spec.tags {
        warn!("{}: tag changes are not applied to an existing cluster", resource);
    }
    Ok(())
}

/// Converge an existing cluster from `previous` onto `spec`
pub async fn update_libvirt_cluster(
    client: &dyn PaletteClientTrait,
    uid: &str,
    previous: &LibvirtClusterSpec,
    spec: &LibvirtClusterSpec,
) -> Result<LibvirtClusterState, ProviderError> {
    let resource = label(spec);
    check_update(&resource, previous, spec)?;

    let cluster = check_existing(&resource, client.get_cluster(uid))
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{} ({}) no longer exists", resource, uid)))?;

    let summary = reconcile_machine_pools(client, spec, &cluster.spec.cloud_config_ref.uid).await?;
    debug!("{}: machine pools {:?}", resource, summary);

    let profiles = expand_profiles(spec);
    if expand_profiles(previous) != profiles {
        info!("{}: updating cluster profiles", resource);
        client.update_cluster_profiles(uid, &SpectroClusterProfiles { profiles }).await?;
    }

    // Policies are compared with what Palette holds so out-of-band edits are reverted
    if let Some(policy) = &spec.backup_policy {
        let observed = client
            .get_cluster_backup_config(uid)
            .await?
            .and_then(|b| b.spec.config)
            .map(|c| flatten_backup_policy(&c));
        if observed.as_ref() != Some(policy) {
            info!("{}: updating backup policy", resource);
            let body = ClusterBackupConfigEntity {
                backup_config: expand_backup_policy(policy),
            };
            client.update_cluster_backup_config(uid, &body).await?;
        }
    }

    if let Some(policy) = &spec.scan_policy {
        let observed = client
            .get_cluster_scan_config(uid)
            .await?
            .and_then(|s| s.spec.driver_spec)
            .map(|d| flatten_scan_policy(&d));
        if observed.as_ref() != Some(policy) {
            info!("{}: updating scan policy", resource);
            client.update_cluster_scan_config(uid, &expand_scan_policy(policy)).await?;
        }
    }

    let cluster_config = expand_cluster_config(spec);
    if expand_cluster_config(previous) != cluster_config {
        info!("{}: updating OS patch settings", resource);
        let body = OsPatchEntity {
            os_patch_config: cluster_config
                .machine_management_config
                .and_then(|m| m.os_patch_config)
                .unwrap_or_default(),
        };
        client.update_cluster_os_patch_config(uid, &body).await?;
    }

    read_libvirt_cluster(client, uid)
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{} ({}) no longer exists", resource, uid)))
}

/// Delete a cluster and wait until it is gone. Deleting a cluster that no
/// longer exists succeeds.
pub async fn delete_libvirt_cluster(
    client: &dyn PaletteClientTrait,
    config: &ProviderConfig,
    cancel: &CancellationToken,
    uid: &str,
) -> Result<(), ProviderError> {
    let resource = format!("libvirt cluster {}", uid);

    match client.delete_cluster(uid).await {
        Ok(()) => info!("Deleting {}", resource),
        Err(PaletteError::NotFound(_)) => {
            warn!("{} was already deleted", resource);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let poller = ReadinessPoller::new(resource.as_str(), config.cluster_delete_poller());
    poller
        .wait(cancel, move || async move {
            match client.get_cluster_status(uid).await {
                Ok(state) => Ok(state),
                Err(PaletteError::NotFound(_)) => Ok(CLUSTER_DELETED_STATE.to_string()),
                Err(e) => Err(ProviderError::from(e)),
            }
        })
        .await?;

    info!("Deleted {}", resource);
    Ok(())
}
