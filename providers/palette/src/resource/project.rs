//! Project lifecycle

use super::{check_existing, require_unchanged};
use crate::error::ProviderError;
use crate::mapper::{expand_project, flatten_project};
use palette_client::PaletteClientTrait;
use resources::{ProjectSpec, ProjectState, Validate};
use tracing::info;

fn label(spec: &ProjectSpec) -> String {
    format!("project '{}'", spec.name)
}

/// Create a project and return its state as read back from Palette
pub async fn create_project(client: &dyn PaletteClientTrait, spec: &ProjectSpec) -> Result<ProjectState, ProviderError> {
    spec.validate()?;
    let resource = label(spec);
    let body = expand_project(spec, "")?;

    let uid = client.create_project(&body).await?;
    info!("Created {} with uid {}", resource, uid);

    read_project(client, &uid)
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{} ({}) disappeared right after creation", resource, uid)))
}

/// Read a project, `None` if it no longer exists
pub async fn read_project(client: &dyn PaletteClientTrait, uid: &str) -> Result<Option<ProjectState>, ProviderError> {
    let resource = format!("project {}", uid);
    let project = check_existing(&resource, client.get_project(uid)).await?;
    Ok(project.as_ref().map(flatten_project))
}

/// Replace the tags and description of a project
pub async fn update_project(
    client: &dyn PaletteClientTrait,
    uid: &str,
    previous: &ProjectSpec,
    spec: &ProjectSpec,
) -> Result<ProjectState, ProviderError> {
    spec.validate()?;
    let resource = label(spec);
    require_unchanged(&resource, "name", &previous.name, &spec.name)?;

    if previous == spec {
        info!("{} is up-to-date", resource);
    } else {
        client.update_project(uid, &expand_project(spec, uid)?).await?;
        info!("Updated {}", resource);
    }

    read_project(client, uid)
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{} ({}) no longer exists", resource, uid)))
}

pub async fn delete_project(client: &dyn PaletteClientTrait, uid: &str) -> Result<(), ProviderError> {
    client.delete_project(uid).await?;
    info!("Deleted project {}", uid);
    Ok(())
}
