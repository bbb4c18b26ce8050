//! Declaration validation errors

use thiserror::Error;

/// Errors raised while loading or validating declarations
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("{resource}: field '{field}' must not be empty")]
    EmptyField {
        resource: String,
        field: &'static str,
    },

    /// Two elements of a keyed collection share the same key
    #[error("{resource}: duplicate {collection} '{key}'")]
    DuplicateKey {
        resource: String,
        collection: &'static str,
        key: String,
    },

    /// Mutually exclusive fields were set together
    #[error("{resource}: '{field}' conflicts with {conflicts_with}")]
    Conflict {
        resource: String,
        field: &'static str,
        conflicts_with: String,
    },

    /// Any other invariant violation
    #[error("{resource}: {message}")]
    Invalid { resource: String, message: String },

    /// Declarations document could not be parsed
    #[error("Failed to parse declarations: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Declarations file could not be read
    #[error("Failed to read declarations file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ValidationError {
    pub(crate) fn invalid(resource: &str, message: impl Into<String>) -> Self {
        ValidationError::Invalid {
            resource: resource.to_string(),
            message: message.into(),
        }
    }
}
