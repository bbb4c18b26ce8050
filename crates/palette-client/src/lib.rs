//! Palette REST API Client
//!
//! A Rust client library for the subset of the Spectro Cloud Palette REST API
//! used by the palette provider: projects, libvirt clusters (including their
//! cloud configs and machine pools), cluster feature configs and packs.
//!
//! # Example
//!
//! ```no_run
//! use palette_client::{PaletteClient, PaletteClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PaletteClient::new(
//!     "https://api.spectrocloud.com".to_string(),
//!     "your-api-key".to_string(),
//!     None,
//! )?;
//!
//! // Look up a cluster and its current state
//! let state = client.get_cluster_status("5f2a...").await?;
//! println!("cluster is {}", state);
//!
//! // Query packs by name
//! let packs = client.list_packs(&["spec.name=kubernetes".to_string()]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Projects**: create, read, update, delete
//! - **Libvirt clusters**: create, read, status, kubeconfig, delete
//! - **Machine pools**: create, update, delete within a cloud config
//! - **Cluster features**: profiles, backup and compliance scan configs
//! - **Packs**: filtered listing with continuation-token pagination
//! - **Mocking**: in-memory `MockPaletteClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod palette_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::PaletteClient;
pub use common::{HttpClient, ListResponse};
pub use error::PaletteError;
pub use models::*;
pub use palette_trait::PaletteClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockPaletteClient, RecordedCall};
