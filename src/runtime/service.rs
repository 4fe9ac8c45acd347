//! Content block service
//!
//! Owns the active blocks of every landing surface. Instantiates blocks from
//! registered manifests, applies settings and image changes, and keeps the
//! per-surface display order. Each operation takes the state lock once and
//! either applies completely or leaves the state untouched.

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::{ConfigError, Configuration};
use crate::core::block::{ContentBlock, LandingError};
use crate::core::constraint::ConstraintContext;
use crate::core::images::{AssetStorage, DiscardStorage, ImageAsset, ImagesContainer};
use crate::core::localized::TranslationProvider;
use crate::core::manifest::ManifestSchema;
use crate::core::registry::ManifestRegistry;
use crate::core::scope::{AcceptAllResolver, Scope, ScopeResolver};
use crate::core::BlockId;

use super::defaults::default_settings;
use super::validation::SettingsValidator;

// ── State ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
    blocks: HashMap<BlockId, ContentBlock>,
    /// Active block ids per surface, in display order.
    order: HashMap<Scope, Vec<BlockId>>,
}

impl State {
    fn block_mut(&mut self, id: BlockId) -> Result<&mut ContentBlock, LandingError> {
        self.blocks.get_mut(&id).ok_or(LandingError::BlockNotFound(id))
    }

    /// Rewrite weights of `scope` to match its order list.
    fn renumber(&mut self, scope: &Scope) {
        let Some(ids) = self.order.get(scope) else {
            return;
        };
        for (position, id) in ids.iter().enumerate() {
            if let Some(block) = self.blocks.get_mut(id) {
                block.weight = position as u32 + 1;
            }
        }
    }

    /// Assets of `candidates` no block holds any more, each key once
    fn unreferenced(&self, candidates: Vec<ImageAsset>) -> Vec<ImageAsset> {
        let mut released: Vec<ImageAsset> = Vec::new();
        for asset in candidates {
            let in_use = self.blocks.values().any(|block| block.images.references(&asset.key));
            if !in_use && !released.iter().any(|r| r.key == asset.key) {
                released.push(asset);
            }
        }
        released
    }

    fn ordered(&self, scope: &Scope) -> Vec<ContentBlock> {
        self.order
            .get(scope)
            .map(|ids| ids.iter().filter_map(|id| self.blocks.get(id).cloned()).collect())
            .unwrap_or_default()
    }
}

// ── Service ─────────────────────────────────────────────────────────────────

/// Content block settings model and per-surface activation state
pub struct ContentBlockService {
    registry: ManifestRegistry,
    config: Configuration,
    translations: Arc<dyn TranslationProvider>,
    storage: Arc<dyn AssetStorage>,
    resolver: Arc<dyn ScopeResolver>,
    state: RwLock<State>,
}

impl ContentBlockService {
    /// Create a service; locales come from `config`, storage discards
    /// released assets and every referenced resource is trusted
    ///
    /// Fails when `config` is inconsistent, e.g. its default locale is not
    /// among the available locales.
    pub fn new(registry: ManifestRegistry, config: Configuration) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry,
            translations: Arc::new(config.clone()),
            config,
            storage: Arc::new(DiscardStorage),
            resolver: Arc::new(AcceptAllResolver),
            state: RwLock::new(State::default()),
        })
    }

    /// Use a different locale source
    pub fn with_translations(mut self, translations: Arc<dyn TranslationProvider>) -> Self {
        self.translations = translations;
        self
    }

    /// Use a storage collaborator for released images
    pub fn with_storage(mut self, storage: Arc<dyn AssetStorage>) -> Self {
        self.storage = storage;
        self
    }

    /// Use a resolver for scoped resources and components
    pub fn with_resolver(mut self, resolver: Arc<dyn ScopeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    fn schema(&self, manifest_name: &str) -> Result<Arc<ManifestSchema>, LandingError> {
        self.registry
            .get(manifest_name)
            .map_err(|_| LandingError::UnknownManifest(manifest_name.to_string()))
    }

    fn validator<'a>(&'a self, schema: &'a ManifestSchema) -> SettingsValidator<'a> {
        SettingsValidator::new(schema, self.translations.as_ref(), self.config.validate_urls)
    }

    /// Resolve a scope name and resource id, confirming the resource exists
    fn resolve_scope(&self, scope_name: &str, resource_id: Option<u64>) -> Result<Scope, LandingError> {
        let scope = Scope::parse(scope_name, resource_id)?;
        if let Some(id) = scope.resource_id {
            if !self.resolver.resource_exists(scope.name, id) {
                return Err(LandingError::InvalidScope(format!(
                    "{} {} does not exist",
                    scope.name, id
                )));
            }
        }
        Ok(scope)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Create a block of `manifest_name` with default settings and empty
    /// image slots, and append it to the surface's active blocks
    pub fn instantiate(
        &self,
        manifest_name: &str,
        scope_name: &str,
        scoped_resource_id: Option<u64>,
        component_id: Option<u64>,
    ) -> Result<ContentBlock, LandingError> {
        let schema = self.schema(manifest_name)?;
        let scope = self.resolve_scope(scope_name, scoped_resource_id)?;

        ConstraintContext::new(manifest_name, scope, component_id, self.resolver.as_ref())
            .check_constraints(&schema.constraints)
            .into_result()?;

        let settings = default_settings(&schema, self.translations.as_ref());
        let validation = self.validator(&schema).validate_all(&settings);
        if validation.has_errors() {
            return Err(LandingError::SchemaValidation {
                errors: validation.errors,
            });
        }

        let mut block = ContentBlock {
            id: BlockId::new(),
            manifest_name: schema.name.clone(),
            scope,
            component_id,
            settings,
            images: ImagesContainer::with_slots(schema.image_slots.iter().map(String::as_str)),
            weight: 0,
            published_at: Some(Utc::now()),
        };

        let mut state = self.state.write();
        let ids = state.order.entry(scope).or_default();
        ids.push(block.id);
        block.weight = ids.len() as u32;
        state.blocks.insert(block.id, block.clone());

        tracing::info!(
            block_id = %block.id,
            manifest = %block.manifest_name,
            scope = %scope,
            weight = block.weight,
            "activated content block"
        );

        Ok(block)
    }

    /// Remove a block from its surface and release its images
    pub fn deactivate(&self, id: BlockId) -> Result<ContentBlock, LandingError> {
        let (mut block, released) = {
            let mut state = self.state.write();
            let mut block = state.blocks.remove(&id).ok_or(LandingError::BlockNotFound(id))?;
            if let Some(ids) = state.order.get_mut(&block.scope) {
                ids.retain(|other| *other != id);
            }
            state.renumber(&block.scope);
            let released = state.unreferenced(block.images.drain_assets());
            (block, released)
        };

        self.release_all(&released);
        block.published_at = None;

        tracing::info!(
            block_id = %id,
            manifest = %block.manifest_name,
            scope = %block.scope,
            "deactivated content block"
        );

        Ok(block)
    }

    /// Set the display order of a surface
    ///
    /// `ordered_ids` must list every active block of the surface exactly once.
    pub fn reorder(
        &self,
        scope_name: &str,
        scoped_resource_id: Option<u64>,
        ordered_ids: &[BlockId],
    ) -> Result<Vec<ContentBlock>, LandingError> {
        let scope = Scope::parse(scope_name, scoped_resource_id)?;
        let mut state = self.state.write();
        let current = state.order.get(&scope).cloned().unwrap_or_default();

        let unique: HashSet<_> = ordered_ids.iter().collect();
        if unique.len() != ordered_ids.len() {
            return Err(LandingError::InvalidOrder("duplicate block ids".into()));
        }
        if ordered_ids.len() != current.len() || !current.iter().all(|id| unique.contains(id)) {
            return Err(LandingError::InvalidOrder(format!(
                "expected the {} active blocks of {}",
                current.len(),
                scope
            )));
        }

        state.order.insert(scope, ordered_ids.to_vec());
        state.renumber(&scope);

        tracing::info!(scope = %scope, blocks = ordered_ids.len(), "reordered content blocks");
        Ok(state.ordered(&scope))
    }

    /// Remove every block of a surface, returning how many were removed
    pub fn destroy_scope(
        &self,
        scope_name: &str,
        scoped_resource_id: Option<u64>,
    ) -> Result<usize, LandingError> {
        let scope = Scope::parse(scope_name, scoped_resource_id)?;
        let (removed, released) = {
            let mut state = self.state.write();
            let ids = state.order.remove(&scope).unwrap_or_default();
            let mut removed: Vec<ContentBlock> =
                ids.iter().filter_map(|id| state.blocks.remove(id)).collect();
            let assets = removed
                .iter_mut()
                .flat_map(|block| block.images.drain_assets())
                .collect();
            let released = state.unreferenced(assets);
            (removed, released)
        };

        self.release_all(&released);

        tracing::info!(scope = %scope, blocks = removed.len(), "destroyed content block scope");
        Ok(removed.len())
    }

    // ── Settings and images ─────────────────────────────────────────────

    /// Validate and merge a partial settings payload
    ///
    /// Keys absent from `partial` keep their values. On error nothing is
    /// written and every offending field is listed.
    pub fn update_settings(&self, id: BlockId, partial: &Value) -> Result<ContentBlock, LandingError> {
        let mut state = self.state.write();
        let block = state.block_mut(id)?;
        let schema = self.schema(&block.manifest_name)?;

        block.settings = self.validator(&schema).apply(&block.settings, partial)?;

        tracing::debug!(
            block_id = %id,
            manifest = %block.manifest_name,
            fields = partial.as_object().map_or(0, |m| m.len()),
            "updated content block settings"
        );

        Ok(block.clone())
    }

    /// Put `asset` into `slot`, releasing the asset it replaces
    pub fn attach_image(
        &self,
        id: BlockId,
        slot: &str,
        asset: ImageAsset,
    ) -> Result<ContentBlock, LandingError> {
        let (block, released) = {
            let mut state = self.state.write();
            let block = state.block_mut(id)?;
            let schema = self.schema(&block.manifest_name)?;

            if !schema.has_image_slot(slot) || !block.images.has_slot(slot) {
                return Err(LandingError::InvalidSlot {
                    manifest: block.manifest_name.clone(),
                    slot: slot.to_string(),
                });
            }
            asset.validate(self.config.max_image_bytes)?;

            let previous = block.images.replace(slot, Some(asset));
            let block = block.clone();
            let released = state.unreferenced(previous.into_iter().collect());
            (block, released)
        };

        for previous in &released {
            tracing::debug!(block_id = %id, slot, replaced = %previous.filename, "releasing replaced image");
        }
        self.release_all(&released);

        Ok(block)
    }

    /// Empty `slot`, releasing its asset
    pub fn detach_image(&self, id: BlockId, slot: &str) -> Result<ContentBlock, LandingError> {
        let (block, released) = {
            let mut state = self.state.write();
            let block = state.block_mut(id)?;

            if !block.images.has_slot(slot) {
                return Err(LandingError::InvalidSlot {
                    manifest: block.manifest_name.clone(),
                    slot: slot.to_string(),
                });
            }

            let previous = block.images.replace(slot, None);
            let block = block.clone();
            let released = state.unreferenced(previous.into_iter().collect());
            (block, released)
        };

        self.release_all(&released);

        Ok(block)
    }

    fn release_all(&self, assets: &[ImageAsset]) {
        for asset in assets {
            self.storage.release(asset);
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Active blocks of a surface in display order
    pub fn list_for_scope(
        &self,
        scope_name: &str,
        scoped_resource_id: Option<u64>,
    ) -> Result<Vec<ContentBlock>, LandingError> {
        let scope = Scope::parse(scope_name, scoped_resource_id)?;
        Ok(self.state.read().ordered(&scope))
    }

    /// Manifests that can be placed on a surface and have no active block there
    pub fn inactive_manifests(
        &self,
        scope_name: &str,
        scoped_resource_id: Option<u64>,
    ) -> Result<Vec<Arc<ManifestSchema>>, LandingError> {
        let scope = Scope::parse(scope_name, scoped_resource_id)?;
        let active: HashSet<String> = self
            .state
            .read()
            .ordered(&scope)
            .into_iter()
            .map(|block| block.manifest_name)
            .collect();

        Ok(self
            .registry
            .for_scope(scope.name)
            .into_iter()
            .filter(|schema| !active.contains(&schema.name))
            .collect())
    }

    /// Block by id
    pub fn find(&self, id: BlockId) -> Result<ContentBlock, LandingError> {
        self.state
            .read()
            .blocks
            .get(&id)
            .cloned()
            .ok_or(LandingError::BlockNotFound(id))
    }

    /// Number of active blocks across all surfaces
    pub fn count(&self) -> usize {
        self.state.read().blocks.len()
    }
}
