//! Pack lookup (read-only data source)

use crate::Validate;
use crate::error::ValidationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// PackQuery selects exactly one pack from the registry.
///
/// `filters` and `id` are exclusive selectors; otherwise `name`, `version`
/// and `cloud` are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackQuery {
    /// Raw API filter expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,

    /// Pack uid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Cloud types the pack must support
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub cloud: BTreeSet<String>,
}

/// Pack found by a [`PackQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackState {
    pub id: String,
    pub name: String,
    pub version: String,
    pub cloud: BTreeSet<String>,
    pub registry_uid: String,
    pub values: String,
}

impl PackQuery {
    /// Label used in diagnostics
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }

    fn others_set(&self, except: &str) -> Vec<&'static str> {
        let fields = [
            ("filters", self.filters.is_some()),
            ("id", self.id.is_some()),
            ("name", self.name.is_some()),
            ("version", self.version.is_some()),
            ("cloud", !self.cloud.is_empty()),
        ];
        fields
            .into_iter()
            .filter(|(field, set)| *set && *field != except)
            .map(|(field, _)| field)
            .collect()
    }
}

impl Validate for PackQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        let resource = format!("pack '{}'", self.display_name());
        for (field, set) in [("filters", self.filters.is_some()), ("id", self.id.is_some())] {
            if !set {
                continue;
            }
            let others = self.others_set(field);
            if !others.is_empty() {
                return Err(ValidationError::Conflict {
                    resource,
                    field,
                    conflicts_with: others.iter().map(|o| format!("'{}'", o)).collect::<Vec<_>>().join(", "),
                });
            }
        }
        Ok(())
    }
}
