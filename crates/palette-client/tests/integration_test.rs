//! Integration tests for the Palette client
//!
//! These tests require a reachable Palette instance.
//! Set PALETTE_HOST and PALETTE_API_KEY environment variables to run.

use palette_client::{PaletteClient, PaletteClientTrait, PaletteError, ProjectEntity, ObjectMeta};

fn client_from_env() -> PaletteClient {
    let host = std::env::var("PALETTE_HOST")
        .unwrap_or_else(|_| "https://api.spectrocloud.com".to_string());
    let api_key = std::env::var("PALETTE_API_KEY")
        .expect("PALETTE_API_KEY environment variable must be set");
    let project_uid = std::env::var("PALETTE_PROJECT_UID").ok();

    PaletteClient::new(host, api_key, project_uid).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running Palette instance
async fn test_list_packs() {
    let client = client_from_env();

    let packs = client.list_packs(&["spec.name=kubernetes".to_string()]).await
        .expect("Failed to list packs");

    println!("Found {} kubernetes packs", packs.len());
}

#[tokio::test]
#[ignore]
async fn test_missing_cluster_is_not_found() {
    let client = client_from_env();

    let result = client.get_cluster("000000000000000000000000").await;
    assert!(matches!(result, Err(PaletteError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_project() {
    let client = client_from_env();

    let body = ProjectEntity {
        metadata: ObjectMeta {
            name: format!("provider-it-{}", std::process::id()),
            ..Default::default()
        },
    };

    let uid = client.create_project(&body).await.expect("Failed to create project");
    println!("Created project {}", uid);

    let project = client.get_project(&uid).await.expect("Failed to read project");
    assert_eq!(project.metadata.name, body.metadata.name);

    // Clean up
    let _ = client.delete_project(&uid).await;
}
