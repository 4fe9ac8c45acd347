//! Core content block types
//!
//! This module defines the block instance, its settings and image slots, the
//! manifest schemas that govern them and the registry holding those schemas.

pub mod localized;
pub mod parameter;
pub mod constraint;
pub mod scope;
pub mod images;
pub mod manifest;
pub mod block;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use block::{ContentBlock, LandingError};
pub use localized::LocalizedText;
pub use manifest::ManifestSchema;
pub use parameter::{FieldError, FieldErrorReason, SettingValue, Settings};
pub use scope::{Scope, ScopeName};

/// Unique identifier for a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Generate a new random block ID
    pub fn new() -> Self {
        BlockId(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
