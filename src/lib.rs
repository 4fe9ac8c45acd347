//! Landing Blocks - Content block settings model for landing pages
//!
//! This crate defines the content blocks administrators place on an
//! organization homepage or a participatory process group landing page:
//! manifest schemas, settings validation and defaults, image slots, and the
//! per-surface display order.

pub mod config;
pub mod core;
pub mod manifests;
pub mod runtime;
mod tests;

// Re-export commonly used types
pub use crate::config::Configuration;
pub use crate::core::{BlockId, ContentBlock, LandingError, LocalizedText, Scope, ScopeName};
pub use crate::manifests::ManifestKind;
pub use crate::runtime::ContentBlockService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
