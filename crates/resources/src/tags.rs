//! Tag syntax shared by every taggable resource
//!
//! A tag is either `key:value` or a bare `key`. Palette stores tags as labels;
//! a bare key is stored with the [`BARE_TAG_VALUE`] marker as its value.

use crate::error::ValidationError;
use std::collections::{BTreeMap, BTreeSet};

/// Label value Palette uses for tags declared without a value
pub const BARE_TAG_VALUE: &str = "spectro__tag";

/// Split a tag into its label key and value.
///
/// Only the first `:` separates key from value, so `a:b:c` is key `a`,
/// value `b:c`.
pub fn split_tag(tag: &str) -> (&str, &str) {
    match tag.split_once(':') {
        Some((key, value)) => (key, value),
        None => (tag, BARE_TAG_VALUE),
    }
}

/// Render a label back into tag syntax
pub fn join_tag(key: &str, value: &str) -> String {
    if value == BARE_TAG_VALUE {
        key.to_string()
    } else {
        format!("{}:{}", key, value)
    }
}

/// Convert a tag set into labels, rejecting empty or repeated keys
pub fn tags_to_labels(resource: &str, tags: &BTreeSet<String>) -> Result<BTreeMap<String, String>, ValidationError> {
    let mut labels = BTreeMap::new();
    for tag in tags {
        let (key, value) = split_tag(tag);
        if key.trim().is_empty() {
            return Err(ValidationError::invalid(resource, format!("tag '{}' has an empty key", tag)));
        }
        if tag.contains(':') && value == BARE_TAG_VALUE {
            return Err(ValidationError::invalid(
                resource,
                format!("tag '{}' uses the reserved value '{}', declare it as '{}'", tag, BARE_TAG_VALUE, key),
            ));
        }
        if labels.insert(key.to_string(), value.to_string()).is_some() {
            return Err(ValidationError::DuplicateKey {
                resource: resource.to_string(),
                collection: "tag key",
                key: key.to_string(),
            });
        }
    }
    Ok(labels)
}

/// Convert labels back into a tag set
pub fn labels_to_tags(labels: &BTreeMap<String, String>) -> BTreeSet<String> {
    labels.iter().map(|(k, v)| join_tag(k, v)).collect()
}
