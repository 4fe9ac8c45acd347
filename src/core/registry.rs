//! Manifest Registry - Central registry of content block kinds
//!
//! This module provides a thread-safe registry of manifest schemas. It supports:
//! - Manifest registration and unregistration
//! - Lookup by name, listing in registration order
//! - The per-scope palette of placeable manifests
//! - Search by name or public name

use crate::core::manifest::ManifestSchema;
use crate::core::scope::ScopeName;
use crate::manifests::ManifestKind;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    order: Vec<String>,
    schemas: HashMap<String, Arc<ManifestSchema>>,
}

/// Registry of manifest schemas
///
/// Cloning the registry shares the underlying schemas. Registration order is
/// kept and is the order manifests appear in the admin palette.
#[derive(Clone, Default)]
pub struct ManifestRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl ManifestRegistry {
    /// Create a new empty registry
    ///
    /// # Example
    /// ```
    /// use landing_blocks::core::registry::ManifestRegistry;
    ///
    /// let registry = ManifestRegistry::new();
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in manifest
    ///
    /// # Example
    /// ```
    /// use landing_blocks::core::registry::ManifestRegistry;
    ///
    /// let registry = ManifestRegistry::with_builtin();
    /// assert!(registry.contains("cover_full"));
    /// ```
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        {
            let mut inner = registry.inner.write();
            for kind in ManifestKind::ALL {
                let schema = kind.schema();
                inner.order.push(schema.name.clone());
                inner.schemas.insert(schema.name.clone(), Arc::new(schema));
            }
        }
        registry
    }

    /// Register a manifest schema
    ///
    /// # Returns
    /// * `Ok(())` if registration succeeds
    /// * `Err(RegistryError)` if the name is taken or the schema is inconsistent
    pub fn register(&self, schema: ManifestSchema) -> Result<(), RegistryError> {
        schema.validate().map_err(RegistryError::InvalidSchema)?;

        let mut inner = self.inner.write();
        if inner.schemas.contains_key(&schema.name) {
            return Err(RegistryError::DuplicateManifest(schema.name));
        }

        tracing::debug!(manifest = %schema.name, "registering content block manifest");
        inner.order.push(schema.name.clone());
        inner.schemas.insert(schema.name.clone(), Arc::new(schema));
        Ok(())
    }

    /// Unregister a manifest
    ///
    /// Blocks already instantiated from it are not touched.
    pub fn unregister(&self, name: &str) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();

        inner
            .schemas
            .remove(name)
            .ok_or_else(|| RegistryError::ManifestNotFound(name.to_string()))?;
        inner.order.retain(|n| n != name);

        Ok(())
    }

    /// Get a schema by manifest name
    pub fn get(&self, name: &str) -> Result<Arc<ManifestSchema>, RegistryError> {
        self.inner
            .read()
            .schemas
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::ManifestNotFound(name.to_string()))
    }

    /// All schemas in registration order
    pub fn all(&self) -> Vec<Arc<ManifestSchema>> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|name| inner.schemas.get(name).cloned())
            .collect()
    }

    /// Schemas that may be placed on `scope`, in registration order
    pub fn for_scope(&self, scope: ScopeName) -> Vec<Arc<ManifestSchema>> {
        self.all()
            .into_iter()
            .filter(|schema| schema.allows_scope(scope))
            .collect()
    }

    /// Search by manifest name or public name (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<Arc<ManifestSchema>> {
        let query = query.to_lowercase();

        self.all()
            .into_iter()
            .filter(|schema| {
                schema.name.to_lowercase().contains(&query)
                    || schema.public_name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Get the number of registered manifests
    pub fn count(&self) -> usize {
        self.inner.read().schemas.len()
    }

    /// Check if a manifest is registered
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().schemas.contains_key(name)
    }

    /// Remove every manifest
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.order.clear();
        inner.schemas.clear();
    }
}

/// Registry error types
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Manifest with given name was not found
    #[error("Manifest not found: {0}")]
    ManifestNotFound(String),

    /// Attempted to register a manifest twice
    #[error("Duplicate manifest: {0}")]
    DuplicateManifest(String),

    /// Schema failed its consistency check
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}
