//! Palette provider resource declarations
//!
//! Typed records for every resource kind the provider manages, loaded from a
//! declarations document and validated once at that boundary. The provider
//! core only ever sees validated records.

pub mod cluster_libvirt;
pub mod declarations;
pub mod error;
pub mod machine_pool;
pub mod pack;
pub mod policies;
pub mod project;
pub mod tags;

pub use cluster_libvirt::*;
pub use declarations::*;
pub use error::ValidationError;
pub use machine_pool::*;
pub use pack::*;
pub use policies::*;
pub use project::*;

/// Records that check their own invariants
pub trait Validate {
    /// Returns the first violated invariant, if any
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reject an empty (or whitespace-only) required field
pub(crate) fn require(resource: &str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            resource: resource.to_string(),
            field,
        });
    }
    Ok(())
}
