//! Pack lookup mapping

use palette_client::Pack;
use resources::{PackQuery, PackState};

/// Cloud type every cloud-specific query also accepts
const ALL_CLOUDS: &str = "all";

/// API filter terms selecting the queried pack.
///
/// `filters` wins over `id`, which wins over the `name`/`version`/`cloud`
/// combination.
pub fn pack_filters(query: &PackQuery) -> Vec<String> {
    if let Some(filters) = &query.filters {
        return vec![filters.clone()];
    }
    if let Some(id) = &query.id {
        return vec![format!("metadata.uid={}", id)];
    }

    let mut filters = Vec::new();
    if let Some(name) = &query.name {
        filters.push(format!("spec.name={}", name));
    }
    if let Some(version) = &query.version {
        filters.push(format!("spec.version={}", version));
    }
    if !query.cloud.is_empty() {
        let mut clouds: Vec<&str> = query.cloud.iter().map(String::as_str).collect();
        if !clouds.contains(&ALL_CLOUDS) {
            clouds.push(ALL_CLOUDS);
        }
        filters.push(format!("spec.cloudTypes_in_{}", clouds.join(",")));
    }
    filters
}

pub fn flatten_pack(pack: &Pack) -> PackState {
    PackState {
        id: pack.metadata.uid.clone(),
        name: pack.spec.name.clone(),
        version: pack.spec.version.clone(),
        cloud: pack.spec.cloud_types.iter().cloned().collect(),
        registry_uid: pack.spec.registry_uid.clone(),
        values: pack.spec.values.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::pack;

    #[test]
    fn test_filters_take_precedence() {
        let query = PackQuery {
            filters: Some("spec.name=cni-calico".to_string()),
            ..Default::default()
        };
        assert_eq!(pack_filters(&query), vec!["spec.name=cni-calico".to_string()]);
    }

    #[test]
    fn test_id_selects_by_uid() {
        let query = PackQuery {
            id: Some("pack-1".to_string()),
            ..Default::default()
        };
        assert_eq!(pack_filters(&query), vec!["metadata.uid=pack-1".to_string()]);
    }

    #[test]
    fn test_name_version_cloud() {
        let query = PackQuery {
            name: Some("kubernetes".to_string()),
            version: Some("1.21.1".to_string()),
            cloud: ["libvirt".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            pack_filters(&query),
            vec![
                "spec.name=kubernetes".to_string(),
                "spec.version=1.21.1".to_string(),
                "spec.cloudTypes_in_libvirt,all".to_string(),
            ]
        );
    }

    #[test]
    fn test_all_cloud_not_repeated() {
        let query = PackQuery {
            cloud: ["all".to_string(), "libvirt".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(pack_filters(&query), vec!["spec.cloudTypes_in_all,libvirt".to_string()]);
    }

    #[test]
    fn test_flatten_pack() {
        let state = flatten_pack(&pack("pack-1", "kubernetes", "1.21.1", &["libvirt", "all"]));
        assert_eq!(state.id, "pack-1");
        assert_eq!(state.version, "1.21.1");
        assert!(state.cloud.contains("libvirt"));
        assert_eq!(state.registry_uid, "registry-1");
    }
}
