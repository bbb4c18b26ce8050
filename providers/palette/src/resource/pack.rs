//! Pack lookup (read-only)

use crate::error::ProviderError;
use crate::mapper::{flatten_pack, pack_filters};
use palette_client::PaletteClientTrait;
use resources::{PackQuery, PackState, Validate};
use tracing::{debug, info};

/// Find the single pack selected by `query`.
///
/// No match is a `NotFound` error; more than one match is a configuration
/// error since the query is not selective enough.
pub async fn read_pack(client: &dyn PaletteClientTrait, query: &PackQuery) -> Result<PackState, ProviderError> {
    query.validate()?;
    let filters = pack_filters(query);
    debug!("Looking up pack {} with filters {:?}", query.display_name(), filters);

    let mut packs = client.list_packs(&filters).await?;
    match packs.len() {
        0 => Err(ProviderError::NotFound(format!("{}: no matching packs", query.display_name()))),
        1 => {
            let pack = flatten_pack(&packs.remove(0));
            info!("Found pack {} {} ({})", pack.name, pack.version, pack.id);
            Ok(pack)
        }
        n => Err(ProviderError::Configuration(format!(
            "Multiple packs returned for {} ({} matches)",
            query.display_name(),
            n
        ))),
    }
}
