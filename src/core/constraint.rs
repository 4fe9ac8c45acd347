//! Placement constraints declared by manifests
//!
//! A manifest may restrict the surfaces it can be placed on, or require a
//! feature component (a blog, a meetings space) to draw its content from.
//! Constraints are checked when a block is instantiated.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::block::LandingError;
use super::scope::{Scope, ScopeName, ScopeResolver};

/// Feature component kinds a block can read content from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Blogs,
    Meetings,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Blogs => "blogs",
            ComponentKind::Meetings => "meetings",
        };
        f.write_str(name)
    }
}

/// Constraint a manifest places on where and how it is instantiated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestConstraint {
    /// Block reads content from a component of this kind
    RequiresComponent(ComponentKind),
    /// Block may only be placed on these surfaces
    ScopeOnly(Vec<ScopeName>),
}

impl ManifestConstraint {
    /// Create a component requirement
    pub fn requires_component(kind: ComponentKind) -> Self {
        ManifestConstraint::RequiresComponent(kind)
    }

    /// Restrict the manifest to the given surfaces
    pub fn scope_only(scopes: impl IntoIterator<Item = ScopeName>) -> Self {
        ManifestConstraint::ScopeOnly(scopes.into_iter().collect())
    }

    /// Whether this constraint allows placing the manifest on `scope`
    ///
    /// Component requirements do not restrict surfaces.
    pub fn allows_scope(&self, scope: ScopeName) -> bool {
        match self {
            ManifestConstraint::ScopeOnly(scopes) => scopes.contains(&scope),
            ManifestConstraint::RequiresComponent(_) => true,
        }
    }
}

/// Context for checking constraints
pub struct ConstraintContext<'a> {
    /// Manifest being instantiated
    pub manifest: &'a str,
    /// Target surface
    pub scope: Scope,
    /// Component the block is linked to
    pub component_id: Option<u64>,
    /// Resolver for component kinds
    pub resolver: &'a dyn ScopeResolver,
}

impl<'a> ConstraintContext<'a> {
    pub fn new(
        manifest: &'a str,
        scope: Scope,
        component_id: Option<u64>,
        resolver: &'a dyn ScopeResolver,
    ) -> Self {
        Self {
            manifest,
            scope,
            component_id,
            resolver,
        }
    }

    /// Check one constraint, returning the reason it fails
    pub fn check(&self, constraint: &ManifestConstraint) -> Option<ConstraintFailure> {
        let error = match constraint {
            ManifestConstraint::ScopeOnly(scopes) if !scopes.contains(&self.scope.name) => {
                LandingError::InvalidScope(format!(
                    "manifest '{}' cannot be placed on {}",
                    self.manifest, self.scope.name
                ))
            }
            ManifestConstraint::ScopeOnly(_) => return None,
            ManifestConstraint::RequiresComponent(kind) => {
                let Some(component_id) = self.component_id else {
                    return Some(ConstraintFailure {
                        constraint: constraint.clone(),
                        error: LandingError::MissingComponent {
                            manifest: self.manifest.to_string(),
                            kind: *kind,
                        },
                    });
                };
                match self.resolver.component_kind(component_id) {
                    Some(found) if found != *kind => LandingError::ComponentMismatch {
                        manifest: self.manifest.to_string(),
                        expected: *kind,
                        found,
                    },
                    _ => return None,
                }
            }
        };

        Some(ConstraintFailure {
            constraint: constraint.clone(),
            error,
        })
    }

    /// Check all constraints of a manifest
    pub fn check_constraints(&self, constraints: &[ManifestConstraint]) -> ConstraintCheckResult {
        let failures: Vec<_> = constraints.iter().filter_map(|c| self.check(c)).collect();

        ConstraintCheckResult {
            satisfied: failures.is_empty(),
            failures,
        }
    }
}

/// Result of constraint checking
#[derive(Debug, Clone)]
pub struct ConstraintCheckResult {
    /// Whether all constraints are satisfied
    pub satisfied: bool,
    /// List of constraint failures
    pub failures: Vec<ConstraintFailure>,
}

impl ConstraintCheckResult {
    /// First failure as an error, in declaration order
    pub fn into_result(self) -> Result<(), LandingError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}

/// Information about a constraint that failed
#[derive(Debug, Clone)]
pub struct ConstraintFailure {
    /// The constraint that failed
    pub constraint: ManifestConstraint,
    /// Error reported to the caller
    pub error: LandingError,
}
