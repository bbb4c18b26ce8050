//! Reconciler for keyed collections
//!
//! Converges a remote collection (machine pools of a cluster) onto its
//! declaration in two steps:
//!
//! 1. [`diff`] compares declared and observed elements by key and returns a
//!    [`DiffSet`] without touching the remote side. Keys only declared are
//!    created, keys only observed are deleted, keys on both sides are updated
//!    when their elements differ.
//! 2. [`apply`] executes the set through a [`CollectionApplier`]: creates and
//!    updates in declared order, then deletes. The first failure aborts the
//!    pass; operations already applied stay applied.

pub mod machine_pool;

pub use machine_pool::{MachinePoolApplier, plan_machine_pools, reconcile_machine_pools};

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// Elements identified by a user-supplied key
pub trait Keyed {
    /// Key unique within the collection, e.g. the machine pool name
    fn key(&self) -> &str;
}

/// One change to a remote collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<T> {
    /// Key is declared but not observed
    Create { key: String, desired: T },
    /// Key is on both sides and the declared element differs
    Update { key: String, desired: T },
    /// Key is observed but no longer declared
    Delete { key: String },
}

impl<T> Operation<T> {
    /// Key of the element this operation touches
    pub fn key(&self) -> &str {
        match self {
            Operation::Create { key, .. } | Operation::Update { key, .. } | Operation::Delete { key } => key,
        }
    }

    /// Variant of the operation without its payload
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Create { .. } => OperationKind::Create,
            Operation::Update { .. } => OperationKind::Update,
            Operation::Delete { .. } => OperationKind::Delete,
        }
    }
}

/// Payload-free tag of an [`Operation`], serialized in lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// See [`Operation::Create`]
    Create,
    /// See [`Operation::Update`]
    Update,
    /// See [`Operation::Delete`]
    Delete,
}

/// Operations reconciling one collection, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSet<T> {
    operations: Vec<Operation<T>>,
    unchanged: Vec<String>,
}

impl<T> DiffSet<T> {
    /// Operations in execution order
    pub fn operations(&self) -> &[Operation<T>] {
        &self.operations
    }

    /// Keys present on both sides with equal elements
    pub fn unchanged(&self) -> &[String] {
        &self.unchanged
    }

    /// True when nothing needs to change
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Keys receiving an operation of `kind`, in execution order
    pub fn keys(&self, kind: OperationKind) -> Vec<&str> {
        self.operations
            .iter()
            .filter(|op| op.kind() == kind)
            .map(Operation::key)
            .collect()
    }
}

/// Counts of applied operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    /// Elements created
    pub created: usize,
    /// Elements updated in place
    pub updated: usize,
    /// Elements deleted
    pub deleted: usize,
    /// Keys left untouched because both sides were equal
    pub unchanged: usize,
}

fn index_keys<'a, T: Keyed>(resource: &str, side: &str, items: &'a [T]) -> Result<HashMap<&'a str, &'a T>, ProviderError> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        let key = item.key();
        if key.trim().is_empty() {
            return Err(ProviderError::Configuration(format!("{}: {} element with an empty key", resource, side)));
        }
        if index.insert(key, item).is_some() {
            return Err(ProviderError::Configuration(format!("{}: duplicate {} key '{}'", resource, side, key)));
        }
    }
    Ok(index)
}

/// Compute the operations turning `observed` into `declared`.
///
/// Equality is the element's `PartialEq`, so callers compare values that
/// exclude server-assigned fields. Duplicate or empty keys on either side
/// are a configuration error.
pub fn diff<T>(resource: &str, declared: &[T], observed: &[T]) -> Result<DiffSet<T>, ProviderError>
where
    T: Keyed + PartialEq + Clone,
{
    let declared_index = index_keys(resource, "declared", declared)?;
    let observed_index = index_keys(resource, "observed", observed)?;

    let mut operations = Vec::new();
    let mut unchanged = Vec::new();

    for item in declared {
        let key = item.key();
        match observed_index.get(key) {
            None => {
                debug!("{}: {} is new", resource, key);
                operations.push(Operation::Create {
                    key: key.to_string(),
                    desired: item.clone(),
                });
            }
            Some(current) if *current != item => {
                debug!("{}: {} changed", resource, key);
                operations.push(Operation::Update {
                    key: key.to_string(),
                    desired: item.clone(),
                });
            }
            Some(_) => unchanged.push(key.to_string()),
        }
    }

    for item in observed {
        let key = item.key();
        if !declared_index.contains_key(key) {
            debug!("{}: {} is no longer declared", resource, key);
            operations.push(Operation::Delete { key: key.to_string() });
        }
    }

    Ok(DiffSet { operations, unchanged })
}

/// Executes collection operations against the remote side
#[async_trait]
pub trait CollectionApplier<T: Sync>: Send + Sync {
    /// Create the element `key`
    async fn create(&self, key: &str, desired: &T) -> Result<(), ProviderError>;
    /// Replace the element `key` with `desired`
    async fn update(&self, key: &str, desired: &T) -> Result<(), ProviderError>;
    /// Delete the element `key`
    async fn delete(&self, key: &str) -> Result<(), ProviderError>;
}

/// Execute a diff set in order, stopping at the first failure
pub async fn apply<T: Sync>(
    resource: &str,
    applier: &dyn CollectionApplier<T>,
    diff: &DiffSet<T>,
) -> Result<ApplySummary, ProviderError> {
    let mut summary = ApplySummary {
        unchanged: diff.unchanged.len(),
        ..Default::default()
    };

    for operation in &diff.operations {
        let result = match operation {
            Operation::Create { key, desired } => {
                info!("{}: creating {}", resource, key);
                applier.create(key, desired).await.map(|_| summary.created += 1)
            }
            Operation::Update { key, desired } => {
                info!("{}: updating {}", resource, key);
                applier.update(key, desired).await.map(|_| summary.updated += 1)
            }
            Operation::Delete { key } => {
                info!("{}: deleting {}", resource, key);
                applier.delete(key).await.map(|_| summary.deleted += 1)
            }
        };

        if let Err(e) = result {
            error!(
                "{}: {:?} of {} failed after {} applied operations: {}",
                resource,
                operation.kind(),
                operation.key(),
                summary.created + summary.updated + summary.deleted,
                e
            );
            return Err(e);
        }
    }

    info!(
        "{}: reconciled ({} created, {} updated, {} deleted, {} unchanged)",
        resource, summary.created, summary.updated, summary.deleted, summary.unchanged
    );
    Ok(summary)
}
