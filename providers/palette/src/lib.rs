//! Palette Provider
//!
//! Core of an infrastructure provider for Spectro Cloud Palette. Declared
//! projects, libvirt clusters and pack lookups are turned into Palette API
//! calls:
//!
//! - `mapper`: pure conversions between declarations and API models
//! - `reconciler`: create/update/delete planning and execution for machine pools
//! - `poller`: fixed-interval readiness wait with timeout and cancellation
//! - `resource`: lifecycle entry points per resource kind
//!
//! Every entry point takes the client as `&dyn PaletteClientTrait`, so the
//! same code runs against the HTTP client or the in-memory mock.

pub mod config;
pub mod error;
pub mod mapper;
pub mod poller;
pub mod reconciler;
pub mod resource;

#[cfg(test)]
mod test_utils;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use poller::{PollReport, PollerConfig, ReadinessPoller};
pub use reconciler::{ApplySummary, DiffSet, Operation, OperationKind};
