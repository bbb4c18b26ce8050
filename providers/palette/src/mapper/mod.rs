//! State Mapper
//!
//! Pure conversions between declared resources and Palette API models:
//! `expand_*` builds request bodies from declarations, `flatten_*` turns API
//! responses back into provider state. Neither direction performs I/O.
//!
//! For every managed field, flattening what the server echoes back for an
//! expanded declaration reproduces the declaration. Server-assigned fields
//! (uids, cloud config id, kubeconfig) are only ever set by `flatten_*`.

mod cluster;
mod machine_pool;
mod pack;
mod policies;
mod project;

#[cfg(test)]
mod round_trip_test;

pub use cluster::{expand_cluster_config, expand_libvirt_cluster, expand_profiles, flatten_libvirt_cluster, ObservedLibvirtCluster};
pub use machine_pool::{
    expand_machine_pool, expand_networks, flatten_machine_pool, flatten_machine_pools, machine_pool_entity,
    parse_attached_disks,
};
pub use pack::{flatten_pack, pack_filters};
pub use policies::{expand_backup_policy, expand_scan_policy, flatten_backup_policy, flatten_scan_policy};
pub use project::{expand_project, flatten_project, DESCRIPTION_ANNOTATION};

use crate::error::ProviderError;
use std::collections::{BTreeMap, BTreeSet};

/// Tags to Palette labels
pub fn expand_tags(resource: &str, tags: &BTreeSet<String>) -> Result<BTreeMap<String, String>, ProviderError> {
    Ok(resources::tags::tags_to_labels(resource, tags)?)
}

/// Palette labels to tags
pub fn flatten_tags(labels: &BTreeMap<String, String>) -> BTreeSet<String> {
    resources::tags::labels_to_tags(labels)
}
