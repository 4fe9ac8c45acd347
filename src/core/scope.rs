//! Landing surfaces a content block can be attached to

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use super::block::LandingError;
use super::constraint::ComponentKind;

/// Kind of landing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeName {
    /// The organization homepage
    Homepage,
    /// Landing page of a participatory process group
    ParticipatoryProcessGroupHomepage,
}

impl ScopeName {
    pub const ALL: [ScopeName; 2] = [
        ScopeName::Homepage,
        ScopeName::ParticipatoryProcessGroupHomepage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeName::Homepage => "homepage",
            ScopeName::ParticipatoryProcessGroupHomepage => "participatory_process_group_homepage",
        }
    }

    /// Whether blocks on this surface belong to a specific resource
    pub fn requires_resource(self) -> bool {
        matches!(self, ScopeName::ParticipatoryProcessGroupHomepage)
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeName {
    type Err = LandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScopeName::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| LandingError::InvalidScope(format!("unknown scope '{s}'")))
    }
}

/// A landing surface: scope name plus the resource it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub name: ScopeName,
    pub resource_id: Option<u64>,
}

impl Scope {
    /// The organization homepage
    pub fn homepage() -> Self {
        Self {
            name: ScopeName::Homepage,
            resource_id: None,
        }
    }

    /// The landing page of process group `group_id`
    pub fn process_group(group_id: u64) -> Self {
        Self {
            name: ScopeName::ParticipatoryProcessGroupHomepage,
            resource_id: Some(group_id),
        }
    }

    /// Build a scope, checking the resource id against the scope kind
    pub fn new(name: ScopeName, resource_id: Option<u64>) -> Result<Self, LandingError> {
        match (name.requires_resource(), resource_id) {
            (true, None) => Err(LandingError::InvalidScope(format!(
                "{name} requires a scoped resource id"
            ))),
            (false, Some(id)) => Err(LandingError::InvalidScope(format!(
                "{name} does not accept a scoped resource id (got {id})"
            ))),
            _ => Ok(Self { name, resource_id }),
        }
    }

    /// Parse a scope name and build the scope
    pub fn parse(name: &str, resource_id: Option<u64>) -> Result<Self, LandingError> {
        Self::new(name.parse()?, resource_id)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource_id {
            Some(id) => write!(f, "{}#{}", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Confirms that resources and components referenced by a block exist
pub trait ScopeResolver: Send + Sync {
    /// Whether `resource_id` names an existing resource of the kind `scope` expects
    fn resource_exists(&self, scope: ScopeName, resource_id: u64) -> bool;

    /// Kind of the component `component_id`, or `None` when unknown to the resolver
    fn component_kind(&self, component_id: u64) -> Option<ComponentKind>;
}

/// Resolver that trusts every reference
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllResolver;

impl ScopeResolver for AcceptAllResolver {
    fn resource_exists(&self, _scope: ScopeName, _resource_id: u64) -> bool {
        true
    }

    fn component_kind(&self, _component_id: u64) -> Option<ComponentKind> {
        None
    }
}

/// In-memory resolver with explicitly registered resources and components
#[derive(Debug, Default)]
pub struct StaticResolver {
    resources: RwLock<HashSet<(ScopeName, u64)>>,
    components: RwLock<HashMap<u64, ComponentKind>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participatory process group
    pub fn with_process_group(self, group_id: u64) -> Self {
        self.resources
            .write()
            .insert((ScopeName::ParticipatoryProcessGroupHomepage, group_id));
        self
    }

    /// Register a component
    pub fn with_component(self, component_id: u64, kind: ComponentKind) -> Self {
        self.components.write().insert(component_id, kind);
        self
    }
}

impl ScopeResolver for StaticResolver {
    fn resource_exists(&self, scope: ScopeName, resource_id: u64) -> bool {
        self.resources.read().contains(&(scope, resource_id))
    }

    fn component_kind(&self, component_id: u64) -> Option<ComponentKind> {
        self.components.read().get(&component_id).copied()
    }
}
