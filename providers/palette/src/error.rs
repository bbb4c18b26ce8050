//! Provider error types.
//!
//! Every entry point returns [`ProviderError`]. Client failures are carried
//! unchanged in [`ProviderError::Remote`] and never retried.

use palette_client::PaletteError;
use resources::ValidationError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in the Palette provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Malformed declaration or composite field, raised before any remote call
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Palette API error
    #[error("Palette error: {0}")]
    Remote(#[from] PaletteError),

    /// Readiness deadline elapsed while the resource was still pending
    #[error("Timed out after {elapsed:?} waiting for {resource} to reach {target} (last state: {last_state})")]
    Timeout {
        resource: String,
        target: String,
        last_state: String,
        elapsed: Duration,
    },

    /// Caller cancelled while waiting
    #[error("Cancelled while waiting for {0}")]
    Cancelled(String),

    /// Resource reached a state that is neither pending nor the target
    #[error("{resource} reached unexpected state {state} while waiting for {target}")]
    UnexpectedState {
        resource: String,
        state: String,
        target: String,
    },

    /// Resource was created remotely but did not become ready. `uid`
    /// identifies the created resource so it can be read or deleted later.
    #[error("{resource} ({uid}) was created but did not become ready: {source}")]
    NotReady {
        /// Label of the resource
        resource: String,
        /// Uid assigned by Palette at creation
        uid: String,
        /// Why the wait ended
        source: Box<ProviderError>,
    },

    /// Lookup found no matching remote resource
    #[error("{0}")]
    NotFound(String),
}

impl ProviderError {
    /// Uid of a resource left behind by a partially completed create
    pub fn created_uid(&self) -> Option<&str> {
        match self {
            ProviderError::NotReady { uid, .. } => Some(uid),
            _ => None,
        }
    }
}

impl From<ValidationError> for ProviderError {
    fn from(e: ValidationError) -> Self {
        ProviderError::Configuration(e.to_string())
    }
}
