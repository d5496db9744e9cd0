//! Domain layer — pure types, platform capabilities, and validation logic.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`. All functions
//! take data in and return data out.

pub mod artifact;
pub mod checks;
pub mod compliance;
pub mod error;
pub mod host;
pub mod normalize;

pub use artifact::{Bucket, ConfigPayload, HostArtifacts};
pub use checks::Engine;
pub use error::{ArtifactError, ParseError, RollbackError, TemplateError, TransportError};
pub use host::{Host, Inventory, Platform};
