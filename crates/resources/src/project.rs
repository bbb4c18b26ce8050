//! Project declaration

use crate::error::ValidationError;
use crate::{Validate, require, tags};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// ProjectSpec defines the desired state of a Palette project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSpec {
    /// Project name (changing it replaces the project)
    pub name: String,

    /// Tags, `key:value` or bare `key`
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    /// Free-form description, stored as the `description` annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Observed state of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Server-assigned uid
    pub uid: String,
    pub spec: ProjectSpec,
}

impl Validate for ProjectSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        let resource = format!("project '{}'", self.name);
        require(&resource, "name", &self.name)?;
        tags::tags_to_labels(&resource, &self.tags)?;
        // Palette drops an empty annotation, so an empty description would read back as none
        if let Some(description) = &self.description {
            require(&resource, "description", description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(description: Option<&str>) -> ProjectSpec {
        ProjectSpec {
            name: "edge".to_string(),
            tags: BTreeSet::new(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_description_optional() {
        assert!(project(None).validate().is_ok());
        assert!(project(Some("Edge sites")).validate().is_ok());
    }

    #[test]
    fn test_empty_description_rejected() {
        let err = project(Some("")).validate().expect_err("empty description should be rejected");
        assert!(matches!(err, ValidationError::EmptyField { field: "description", .. }));
    }
}
