//! Pack operations for MockPaletteClient
//!
//! Evaluates the filter terms the provider emits: `metadata.uid=`,
//! `spec.name=`, `spec.version=` and `spec.cloudTypes_in_<a,b,...>`.
//! Unknown terms match nothing, like an invalid filter on the server.

use super::MockPaletteClient;
use super::helpers::lock;
use crate::error::PaletteError;
use crate::models::*;

fn term_matches(pack: &Pack, term: &str) -> bool {
    if let Some(clouds) = term.strip_prefix("spec.cloudTypes_in_") {
        return clouds
            .split(',')
            .map(str::trim)
            .any(|cloud| pack.spec.cloud_types.iter().any(|t| t == cloud));
    }

    match term.split_once('=') {
        Some(("metadata.uid", uid)) => pack.metadata.uid == uid,
        Some(("spec.name", name)) => pack.spec.name == name,
        Some(("spec.version", version)) => pack.spec.version == version,
        _ => false,
    }
}

pub fn list_packs(client: &MockPaletteClient, filters: &[String]) -> Result<Vec<Pack>, PaletteError> {
    let terms: Vec<&str> = filters
        .iter()
        .flat_map(|f| f.split("AND"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    Ok(lock(&client.packs)
        .iter()
        .filter(|pack| terms.iter().all(|term| term_matches(pack, term)))
        .cloned()
        .collect())
}
