//! Palette Provider plan tool
//!
//! Loads a declarations file, reads the declared resources from Palette and
//! prints what a reconciliation would create, update or delete. Nothing is
//! applied.
//!
//! Usage:
//!   palette-provider <declarations.yaml>
//!   palette-provider --schema

use anyhow::Context;
use palette_client::{PaletteClient, PaletteClientTrait};
use palette_provider::mapper::expand_project;
use palette_provider::reconciler::plan_machine_pools;
use palette_provider::resource::{read_libvirt_cluster, read_pack, read_project};
use palette_provider::{OperationKind, ProviderConfig};
use resources::{Declarations, Declared, LibvirtClusterSpec, ProjectSpec};
use serde_json::{Value, json};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let arg = env::args()
        .nth(1)
        .context("usage: palette-provider <declarations.yaml> | --schema")?;

    if arg == "--schema" {
        println!("{}", serde_json::to_string_pretty(&Declarations::json_schema())?);
        return Ok(());
    }

    let declarations = Declarations::from_path(&arg).with_context(|| format!("failed to load {}", arg))?;
    let config = ProviderConfig::from_env()?;

    info!("Starting Palette plan");
    info!("Configuration:");
    info!("  Palette host: {}", config.host);
    info!("  Project: {}", config.project_uid.as_deref().unwrap_or("tenant scope"));
    info!("  Declarations: {}", arg);

    let client = PaletteClient::new(config.host.clone(), config.api_key.clone(), config.project_uid.clone())?;

    let mut projects = Vec::new();
    for declared in &declarations.projects {
        projects.push(plan_project(&client, declared).await?);
    }

    let mut clusters = Vec::new();
    for declared in &declarations.libvirt_clusters {
        clusters.push(plan_cluster(&client, declared).await?);
    }

    let mut packs = Vec::new();
    for query in &declarations.packs {
        let pack = read_pack(&client, query)
            .await
            .with_context(|| format!("pack lookup for {} failed", query.display_name()))?;
        packs.push(serde_json::to_value(pack)?);
    }

    let plan = json!({
        "projects": projects,
        "libvirt_clusters": clusters,
        "packs": packs,
    });
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

async fn plan_project(client: &dyn PaletteClientTrait, declared: &Declared<ProjectSpec>) -> anyhow::Result<Value> {
    let name = &declared.spec.name;
    let Some(uid) = &declared.id else {
        return Ok(json!({ "name": name, "action": "create" }));
    };

    let action = match read_project(client, uid).await? {
        None => "create",
        Some(state) => {
            // Compare request bodies so an empty description equals an absent one
            if expand_project(&state.spec, uid)? == expand_project(&declared.spec, uid)? {
                "unchanged"
            } else {
                "update"
            }
        }
    };
    Ok(json!({ "name": name, "id": uid, "action": action }))
}

async fn plan_cluster(
    client: &dyn PaletteClientTrait,
    declared: &Declared<LibvirtClusterSpec>,
) -> anyhow::Result<Value> {
    let spec = &declared.spec;
    let Some(uid) = &declared.id else {
        return Ok(json!({ "name": spec.name, "action": "create" }));
    };

    let Some(state) = read_libvirt_cluster(client, uid).await? else {
        return Ok(json!({ "name": spec.name, "id": uid, "action": "create" }));
    };

    let cloud_config = client.get_cloud_config_libvirt(&state.cloud_config_id).await?;
    let pools = plan_machine_pools(spec, &cloud_config)?;

    let mut settings = Vec::new();
    if state.backup_policy != spec.backup_policy {
        settings.push("backup_policy");
    }
    if state.scan_policy != spec.scan_policy {
        settings.push("scan_policy");
    }
    if state.os_patch_on_boot != spec.os_patch_on_boot
        || state.os_patch_schedule != spec.os_patch_schedule
        || state.os_patch_after != spec.os_patch_after
    {
        settings.push("os_patch");
    }

    let action = if pools.is_empty() && settings.is_empty() { "unchanged" } else { "update" };
    Ok(json!({
        "name": spec.name,
        "id": uid,
        "action": action,
        "machine_pools": {
            "create": pools.keys(OperationKind::Create),
            "update": pools.keys(OperationKind::Update),
            "delete": pools.keys(OperationKind::Delete),
            "unchanged": pools.unchanged(),
        },
        "settings": settings,
    }))
}
