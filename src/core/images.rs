//! Image slots and the asset storage collaborator

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::block::LandingError;

/// Content types accepted for uploaded images
pub const ACCEPTED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Reference to an uploaded image held by the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Storage key
    pub key: String,
    /// Original file name, e.g. `city.jpeg`
    pub filename: String,
    /// MIME type
    pub content_type: String,
    /// Size in bytes
    pub byte_size: u64,
}

impl ImageAsset {
    pub fn new(
        key: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        byte_size: u64,
    ) -> Self {
        Self {
            key: key.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            byte_size,
        }
    }

    /// Check content type and size
    pub fn validate(&self, max_bytes: u64) -> Result<(), LandingError> {
        if !ACCEPTED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(LandingError::InvalidImage(format!(
                "{} has unsupported content type {}",
                self.filename, self.content_type
            )));
        }
        if self.byte_size > max_bytes {
            return Err(LandingError::InvalidImage(format!(
                "{} is {} bytes, limit is {}",
                self.filename, self.byte_size, max_bytes
            )));
        }
        Ok(())
    }
}

/// Image slots of a block, keyed by slot name
///
/// Every slot declared by the manifest is present; empty slots hold `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagesContainer(BTreeMap<String, Option<ImageAsset>>);

impl ImagesContainer {
    /// Empty container with the given slots
    pub fn with_slots<'a>(slots: impl IntoIterator<Item = &'a str>) -> Self {
        Self(slots.into_iter().map(|slot| (slot.to_string(), None)).collect())
    }

    /// Asset at `slot`, if the slot exists and is filled
    pub fn get(&self, slot: &str) -> Option<&ImageAsset> {
        self.0.get(slot).and_then(Option::as_ref)
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.0.contains_key(slot)
    }

    /// Put `asset` in `slot`, returning the asset it replaces
    ///
    /// Callers check the slot against the manifest first.
    pub(crate) fn replace(&mut self, slot: &str, asset: Option<ImageAsset>) -> Option<ImageAsset> {
        self.0.get_mut(slot).and_then(|current| std::mem::replace(current, asset))
    }

    /// Take every asset out, leaving the slots empty
    pub(crate) fn drain_assets(&mut self) -> Vec<ImageAsset> {
        self.0.values_mut().filter_map(Option::take).collect()
    }

    /// Whether any slot holds the asset stored under `key`
    pub fn references(&self, key: &str) -> bool {
        self.0.values().flatten().any(|asset| asset.key == key)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Filled slots only
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageAsset)> {
        self.0
            .iter()
            .filter_map(|(slot, asset)| asset.as_ref().map(|a| (slot.as_str(), a)))
    }
}

/// External storage for uploaded images
pub trait AssetStorage: Send + Sync {
    /// Called when `asset` is no longer referenced by any block
    fn release(&self, asset: &ImageAsset);
}

/// Storage that ignores releases
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardStorage;

impl AssetStorage for DiscardStorage {
    fn release(&self, _asset: &ImageAsset) {}
}

/// Storage that records released assets, for hosts that purge in batches
#[derive(Debug, Default)]
pub struct RecordingStorage {
    released: Mutex<Vec<ImageAsset>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assets released so far
    pub fn released(&self) -> Vec<ImageAsset> {
        self.released.lock().clone()
    }

    /// Take the released assets, clearing the record
    pub fn take_released(&self) -> Vec<ImageAsset> {
        std::mem::take(&mut *self.released.lock())
    }
}

impl AssetStorage for RecordingStorage {
    fn release(&self, asset: &ImageAsset) {
        self.released.lock().push(asset.clone());
    }
}
