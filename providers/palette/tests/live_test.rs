//! Integration tests against a live Palette instance
//!
//! These tests require a reachable Palette instance.
//! Set PALETTE_HOST, PALETTE_API_KEY and optionally PALETTE_PROJECT_UID to run.

use palette_client::PaletteClient;
use palette_provider::resource::{create_project, delete_project, read_libvirt_cluster, read_pack, read_project};
use palette_provider::{ProviderConfig, ProviderError};
use resources::{PackQuery, ProjectSpec};

fn client_from_env() -> PaletteClient {
    let config = ProviderConfig::from_env().expect("PALETTE_API_KEY environment variable must be set");
    PaletteClient::new(config.host, config.api_key, config.project_uid).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running Palette instance
async fn test_project_round_trip() {
    let client = client_from_env();
    let spec = ProjectSpec {
        name: format!("provider-it-{}", std::process::id()),
        tags: ["owner:provider-it".to_string()].into_iter().collect(),
        description: Some("Created by the provider integration tests".to_string()),
    };

    let created = create_project(&client, &spec).await.expect("Failed to create project");
    println!("Created project {}", created.uid);
    assert_eq!(created.spec, spec);

    // Clean up
    delete_project(&client, &created.uid).await.expect("Failed to delete project");
    let gone = read_project(&client, &created.uid).await.expect("Failed to read project");
    assert!(gone.is_none());
}

#[tokio::test]
#[ignore]
async fn test_missing_cluster_reads_as_none() {
    let client = client_from_env();
    let state = read_libvirt_cluster(&client, "000000000000000000000000")
        .await
        .expect("Failed to read cluster");
    assert!(state.is_none());
}

#[tokio::test]
#[ignore]
async fn test_kubernetes_pack_lookup() {
    let client = client_from_env();
    let query = PackQuery {
        name: Some("kubernetes".to_string()),
        version: Some("1.21.1".to_string()),
        cloud: ["libvirt".to_string()].into_iter().collect(),
        ..Default::default()
    };

    match read_pack(&client, &query).await {
        Ok(pack) => println!("Found pack {} ({})", pack.name, pack.id),
        Err(ProviderError::NotFound(message)) => println!("{}", message),
        Err(e) => panic!("Pack lookup failed: {}", e),
    }
}
