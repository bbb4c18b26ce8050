//! Resource operations
//!
//! Create, read, update and delete entry points for each resource kind. Every
//! entry point receives the client explicitly and performs its remote calls in
//! sequence on the caller's task.
//!
//! Read entry points return `Ok(None)` when the resource no longer exists
//! remotely, so the caller can reset the identity it holds and plan a create.

pub mod cluster;
pub mod pack;
pub mod project;

#[cfg(test)]
mod cluster_test;

pub use cluster::{
    create_libvirt_cluster, delete_libvirt_cluster, read_libvirt_cluster, submit_libvirt_cluster, update_libvirt_cluster,
    wait_for_cluster_running,
};
pub use pack::read_pack;
pub use project::{create_project, delete_project, read_project, update_project};

use crate::error::ProviderError;
use palette_client::PaletteError;
use std::future::Future;
use tracing::{debug, error, warn};

/// Run a remote read, mapping `NotFound` to `Ok(None)`.
///
/// Returns:
/// - `Ok(Some(resource))` if the resource exists
/// - `Ok(None)` if it was deleted remotely (drift)
/// - `Err(e)` for every other failure, which must not be taken as a deletion
pub async fn check_existing<Fut, Resource>(resource: &str, get: Fut) -> Result<Option<Resource>, ProviderError>
where
    Fut: Future<Output = Result<Resource, PaletteError>> + Send,
{
    match get.await {
        Ok(existing) => {
            debug!("{} exists in Palette", resource);
            Ok(Some(existing))
        }
        Err(PaletteError::NotFound(_)) => {
            warn!("{} was deleted in Palette (drift detected)", resource);
            Ok(None)
        }
        Err(e) => {
            error!("Failed to read {}: {}", resource, e);
            Err(ProviderError::Remote(e))
        }
    }
}

/// Reject a change to a field that can only be set at creation
pub(crate) fn require_unchanged<T: PartialEq>(
    resource: &str,
    field: &str,
    previous: &T,
    declared: &T,
) -> Result<(), ProviderError> {
    if previous == declared {
        Ok(())
    } else {
        Err(ProviderError::Configuration(format!(
            "{}: changing {} requires replacing the resource",
            resource, field
        )))
    }
}
