//! Declarations document
//!
//! A YAML document listing every resource the provider should manage:
//!
//! ```yaml
//! projects:
//!   - name: edge
//!     tags: ["env:prod"]
//! libvirt_clusters:
//!   - id: 5f1a...   # optional, uid of the already created cluster
//!     name: edge-1
//!     ...
//! packs:
//!   - name: kubernetes
//!     version: 1.21.1
//! ```

use crate::error::ValidationError;
use crate::{LibvirtClusterSpec, PackQuery, ProjectSpec, Validate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A declared resource, optionally bound to an existing remote resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Declared<T> {
    /// Uid of the remote resource once it exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub spec: T,
}

/// Every resource managed by one provider run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Declarations {
    #[serde(default)]
    pub projects: Vec<Declared<ProjectSpec>>,

    #[serde(default)]
    pub libvirt_clusters: Vec<Declared<LibvirtClusterSpec>>,

    #[serde(default)]
    pub packs: Vec<PackQuery>,
}

impl Declarations {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ValidationError> {
        let declarations: Declarations = serde_yaml::from_str(yaml)?;
        declarations.validate()?;
        Ok(declarations)
    }

    /// Read, parse and validate a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ValidationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// JSON schema of the document
    pub fn json_schema() -> serde_json::Value {
        schemars::schema_for!(Declarations).to_value()
    }
}

impl Validate for Declarations {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut project_names = HashSet::new();
        for project in &self.projects {
            project.spec.validate()?;
            if !project_names.insert(project.spec.name.as_str()) {
                return Err(ValidationError::DuplicateKey {
                    resource: "declarations".to_string(),
                    collection: "project",
                    key: project.spec.name.clone(),
                });
            }
        }

        let mut cluster_names = HashSet::new();
        for cluster in &self.libvirt_clusters {
            cluster.spec.validate()?;
            if !cluster_names.insert(cluster.spec.name.as_str()) {
                return Err(ValidationError::DuplicateKey {
                    resource: "declarations".to_string(),
                    collection: "libvirt_cluster",
                    key: cluster.spec.name.clone(),
                });
            }
        }

        for pack in &self.packs {
            pack.validate()?;
        }
        Ok(())
    }
}
