//! Project mapping

use super::{expand_tags, flatten_tags};
use crate::error::ProviderError;
use palette_client::{ObjectMeta, Project, ProjectEntity};
use resources::{ProjectSpec, ProjectState};
use std::collections::BTreeMap;

/// Annotation holding the project description
pub const DESCRIPTION_ANNOTATION: &str = "description";

/// Build the project request body. `uid` is empty for a create.
pub fn expand_project(spec: &ProjectSpec, uid: &str) -> Result<ProjectEntity, ProviderError> {
    let resource = format!("project '{}'", spec.name);

    let mut annotations = BTreeMap::new();
    if let Some(description) = spec.description.as_deref().filter(|d| !d.is_empty()) {
        annotations.insert(DESCRIPTION_ANNOTATION.to_string(), description.to_string());
    }

    Ok(ProjectEntity {
        metadata: ObjectMeta {
            name: spec.name.clone(),
            uid: uid.to_string(),
            labels: expand_tags(&resource, &spec.tags)?,
            annotations,
            ..Default::default()
        },
    })
}

pub fn flatten_project(project: &Project) -> ProjectState {
    ProjectState {
        uid: project.metadata.uid.clone(),
        spec: ProjectSpec {
            name: project.metadata.name.clone(),
            tags: flatten_tags(&project.metadata.labels),
            description: project.metadata.annotations.get(DESCRIPTION_ANNOTATION).cloned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::project_spec;

    #[test]
    fn test_expand_project() {
        let spec = project_spec("edge", &["env:prod", "team"], Some("Edge sites"));
        let entity = expand_project(&spec, "").expect("project should expand");

        assert_eq!(entity.metadata.name, "edge");
        assert_eq!(entity.metadata.uid, "");
        assert_eq!(entity.metadata.labels.get("env").map(String::as_str), Some("prod"));
        assert_eq!(entity.metadata.labels.get("team").map(String::as_str), Some("spectro__tag"));
        assert_eq!(
            entity.metadata.annotations.get(DESCRIPTION_ANNOTATION).map(String::as_str),
            Some("Edge sites")
        );
    }

    #[test]
    fn test_empty_description_not_annotated() {
        let spec = project_spec("edge", &[], Some(""));
        let entity = expand_project(&spec, "p-1").expect("project should expand");
        assert!(entity.metadata.annotations.is_empty());
        assert_eq!(entity.metadata.uid, "p-1");
    }

    #[test]
    fn test_flatten_project_round_trip() {
        let spec = project_spec("edge", &["env:prod", "team"], Some("Edge sites"));
        let mut entity = expand_project(&spec, "").expect("project should expand");
        entity.metadata.uid = "p-1".to_string();

        let state = flatten_project(&Project {
            metadata: entity.metadata,
            ..Default::default()
        });

        assert_eq!(state.uid, "p-1");
        assert_eq!(state.spec, spec);
    }

    #[test]
    fn test_duplicate_tag_key_is_configuration_error() {
        let spec = project_spec("edge", &["env:prod", "env:dev"], None);
        let err = expand_project(&spec, "").expect_err("duplicate tag keys should fail");
        assert!(matches!(err, ProviderError::Configuration(_)));
    }
}
