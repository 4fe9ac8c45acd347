//! Content block instances and errors
//!
//! A `ContentBlock` is one configured unit placed on a landing surface. Its
//! manifest name selects the schema its settings and image slots follow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constraint::ComponentKind;
use super::images::{ImageAsset, ImagesContainer};
use super::manifest::ManifestSchema;
use super::parameter::{FieldError, SettingValue, Settings};
use super::scope::Scope;
use super::BlockId;

/// A content block placed on a landing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Unique block identifier
    pub id: BlockId,
    /// Registered manifest this block instantiates
    pub manifest_name: String,
    /// Surface the block is attached to
    pub scope: Scope,
    /// Component supplying dynamic content
    pub component_id: Option<u64>,
    /// Configuration payload
    pub settings: Settings,
    /// Uploaded images by slot
    pub images: ImagesContainer,
    /// 1-based display position within the scope
    pub weight: u32,
    /// When the block was activated
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentBlock {
    /// Setting value by name
    pub fn setting(&self, name: &str) -> Option<&SettingValue> {
        self.settings.get(name)
    }

    /// Translated text of a localized setting
    pub fn translated(&self, name: &str, locale: &str, default_locale: &str) -> Option<&str> {
        self.settings.translated(name, locale, default_locale)
    }

    /// Image in `slot`
    pub fn image(&self, slot: &str) -> Option<&ImageAsset> {
        self.images.get(slot)
    }

    /// Whether the block is placed on a surface
    pub fn is_active(&self) -> bool {
        self.published_at.is_some()
    }

    /// Whether every required field of `schema` holds a value, localized ones
    /// at least for `default_locale`
    pub fn is_complete(&self, schema: &ManifestSchema, default_locale: &str) -> bool {
        self.missing_fields(schema, default_locale).is_empty()
    }

    /// Required fields of `schema` this block does not yet fill
    pub fn missing_fields<'a>(&self, schema: &'a ManifestSchema, default_locale: &str) -> Vec<&'a str> {
        schema
            .fields
            .iter()
            .filter(|field| field.required)
            .filter(|field| match self.settings.get(&field.name) {
                None | Some(SettingValue::Null) => true,
                Some(SettingValue::Localized(text)) => !text.has_locale(default_locale),
                Some(SettingValue::Text(text)) => text.is_empty(),
                Some(_) => false,
            })
            .map(|field| field.name.as_str())
            .collect()
    }
}

/// Errors raised by content block operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandingError {
    /// Manifest name is not registered
    #[error("Unknown manifest: {0}")]
    UnknownManifest(String),

    /// Scope name unknown, resource id missing or unexpected, or manifest not allowed there
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// One or more settings fields were rejected; nothing was written
    #[error("Invalid settings: {}", join_errors(.errors))]
    SchemaValidation { errors: Vec<FieldError> },

    /// Image slot not declared by the manifest
    #[error("Manifest '{manifest}' has no image slot '{slot}'")]
    InvalidSlot { manifest: String, slot: String },

    /// Uploaded image rejected
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Manifest needs a component and none was given
    #[error("Manifest '{manifest}' requires a {kind} component")]
    MissingComponent { manifest: String, kind: ComponentKind },

    /// Linked component is of the wrong kind
    #[error("Manifest '{manifest}' requires a {expected} component, got {found}")]
    ComponentMismatch {
        manifest: String,
        expected: ComponentKind,
        found: ComponentKind,
    },

    /// No active block with this id
    #[error("Content block not found: {0}")]
    BlockNotFound(BlockId),

    /// Reorder list does not match the active blocks of the scope
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

impl LandingError {
    /// Names of the offending fields, each once, for inline highlighting
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            LandingError::SchemaValidation { errors } => {
                let mut fields: Vec<&str> = Vec::with_capacity(errors.len());
                for error in errors {
                    if !fields.contains(&error.field.as_str()) {
                        fields.push(error.field.as_str());
                    }
                }
                fields
            }
            LandingError::InvalidSlot { slot, .. } => vec![slot.as_str()],
            _ => Vec::new(),
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
