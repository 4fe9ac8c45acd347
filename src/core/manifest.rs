//! Manifest schemas
//!
//! A manifest describes one kind of content block: the name shown in the
//! admin palette, its settings fields, its image slots and where it may be
//! placed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::constraint::ManifestConstraint;
use super::parameter::FieldSpec;
use super::scope::ScopeName;

/// Static settings schema of a content block kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSchema {
    /// Manifest identifier, e.g. `cover_full`
    pub name: String,
    /// Name shown in the "Add content block" palette
    pub public_name: String,
    /// Settings fields in form order
    pub fields: Vec<FieldSpec>,
    /// Declared image slots
    pub image_slots: Vec<String>,
    /// Placement constraints
    pub constraints: Vec<ManifestConstraint>,
}

impl ManifestSchema {
    pub fn new(name: impl Into<String>, public_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_name: public_name.into(),
            fields: Vec::new(),
            image_slots: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add a settings field
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an image slot
    pub fn image_slot(mut self, slot: impl Into<String>) -> Self {
        self.image_slots.push(slot.into());
        self
    }

    /// Add a placement constraint
    pub fn constraint(mut self, constraint: ManifestConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Field descriptor by name
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_image_slot(&self, slot: &str) -> bool {
        self.image_slots.iter().any(|s| s == slot)
    }

    /// Whether this manifest may be placed on `scope`
    pub fn allows_scope(&self, scope: ScopeName) -> bool {
        self.constraints.iter().all(|c| c.allows_scope(scope))
    }

    /// Check the schema itself for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Manifest name cannot be empty".into());
        }
        if self.public_name.is_empty() {
            return Err(format!("Manifest '{}' has an empty public name", self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(format!(
                    "Manifest '{}' declares field '{}' twice",
                    self.name, field.name
                ));
            }
        }

        let mut seen = HashSet::new();
        for slot in &self.image_slots {
            if !seen.insert(slot.as_str()) {
                return Err(format!(
                    "Manifest '{}' declares image slot '{}' twice",
                    self.name, slot
                ));
            }
        }

        Ok(())
    }
}
