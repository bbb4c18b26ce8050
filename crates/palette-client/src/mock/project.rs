//! Project operations for MockPaletteClient

use super::helpers::{lock, new_uid, stored_metadata};
use super::{MockPaletteClient, RecordedCall};
use crate::error::PaletteError;
use crate::models::*;

pub fn create_project(client: &MockPaletteClient, body: &ProjectEntity) -> Result<String, PaletteError> {
    client.record(RecordedCall::CreateProject {
        name: body.metadata.name.clone(),
    })?;

    let mut projects = lock(&client.projects);
    if projects.values().any(|p| p.metadata.name == body.metadata.name) {
        return Err(PaletteError::Api(format!(
            "Project {} already exists",
            body.metadata.name
        )));
    }

    let uid = new_uid();
    projects.insert(
        uid.clone(),
        Project {
            metadata: stored_metadata(&body.metadata, uid.clone()),
            status: ProjectStatus::default(),
        },
    );
    Ok(uid)
}

pub fn get_project(client: &MockPaletteClient, uid: &str) -> Result<Project, PaletteError> {
    lock(&client.projects)
        .get(uid)
        .cloned()
        .ok_or_else(|| PaletteError::NotFound(format!("Project {} not found", uid)))
}

pub fn update_project(client: &MockPaletteClient, uid: &str, body: &ProjectEntity) -> Result<(), PaletteError> {
    client.record(RecordedCall::UpdateProject { uid: uid.to_string() })?;

    let mut projects = lock(&client.projects);
    let project = projects
        .get_mut(uid)
        .ok_or_else(|| PaletteError::NotFound(format!("Project {} not found", uid)))?;

    let created = project.metadata.creation_timestamp;
    project.metadata = stored_metadata(&body.metadata, uid.to_string());
    project.metadata.creation_timestamp = created;
    Ok(())
}

pub fn delete_project(client: &MockPaletteClient, uid: &str) -> Result<(), PaletteError> {
    client.record(RecordedCall::DeleteProject { uid: uid.to_string() })?;

    lock(&client.projects)
        .remove(uid)
        .map(|_| ())
        .ok_or_else(|| PaletteError::NotFound(format!("Project {} not found", uid)))
}
