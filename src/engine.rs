//! Access decision engine
//!
//! Decides whether a role may perform a `resource.action` and, on allow,
//! returns the resource's filter mapping for query scoping. Decisions are
//! pure functions over the immutable policy table:
//! - An unknown role is an error the caller surfaces as a denial.
//! - An unlisted resource or action is a silent deny, not an error.
//! - A listed action allows and returns the filters unchanged.

use crate::cache::DecisionCache;
use crate::error::Result;
use crate::permission::Permission;
use crate::policy::PolicyTable;
use crate::subject::{RoleResolver, UppercaseResolver};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::trace;

const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the action is permitted
    pub allowed: bool,
    /// On allow, the resource's filter mapping (field name -> subject
    /// attribute name), `{}` when the resource defines none. `None` on deny.
    pub filters: Option<HashMap<String, String>>,
}

impl Decision {
    /// An allow carrying the resource's filter mapping
    pub fn allow(filters: HashMap<String, String>) -> Self {
        Decision {
            allowed: true,
            filters: Some(filters),
        }
    }

    /// A deny (no filters)
    pub fn deny() -> Self {
        Decision {
            allowed: false,
            filters: None,
        }
    }
}

/// Decision engine over a loaded policy table
///
/// The table is read-only after construction; the decision cache sits behind
/// a mutex so `authorize` takes `&self` and the engine can be shared across
/// request-handling threads.
pub struct AccessEngine<R = UppercaseResolver> {
    table: PolicyTable,
    resolver: R,
    cache: Mutex<DecisionCache>,
}

impl AccessEngine<UppercaseResolver> {
    /// Create an engine with the default upper-casing role resolver
    pub fn new(table: PolicyTable) -> Self {
        Self::with_resolver(table, UppercaseResolver)
    }
}

impl<R: RoleResolver> AccessEngine<R> {
    /// Create an engine with a caller-supplied role resolver
    pub fn with_resolver(table: PolicyTable, resolver: R) -> Self {
        Self::with_cache_capacity(table, resolver, DEFAULT_CACHE_CAPACITY)
    }

    /// Create an engine with an explicit decision cache capacity
    pub fn with_cache_capacity(table: PolicyTable, resolver: R, capacity: usize) -> Self {
        AccessEngine {
            table,
            resolver,
            cache: Mutex::new(DecisionCache::new(capacity)),
        }
    }

    /// The underlying policy table
    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// Canonical role name for a raw token
    pub fn resolve_role(&self, token: &str) -> Result<String> {
        self.resolver.resolve(token, &self.table)
    }

    /// Decide whether `role_token` may perform `permission` (`resource.action`)
    ///
    /// # Errors
    ///
    /// [`RbacError::MalformedPermission`] if the string has no dot (programmer
    /// error, fails fast) and [`RbacError::UnknownRole`] if the token resolves
    /// to no configured role (callers map this to an access-denied response).
    ///
    /// # Examples
    ///
    /// ```
    /// use rolegate::{AccessEngine, PolicyTable};
    ///
    /// let table = PolicyTable::from_yaml_str(r#"
    /// roles:
    ///   admin:
    ///     products:
    ///       permissions: [list, create]
    /// "#).unwrap();
    /// let engine = AccessEngine::new(table);
    ///
    /// assert!(engine.authorize("admin", "products.create").unwrap().allowed);
    /// assert!(!engine.authorize("admin", "products.delete").unwrap().allowed);
    /// ```
    ///
    /// [`RbacError::MalformedPermission`]: crate::RbacError::MalformedPermission
    /// [`RbacError::UnknownRole`]: crate::RbacError::UnknownRole
    pub fn authorize(&self, role_token: &str, permission: &str) -> Result<Decision> {
        let permission = Permission::parse(permission)?;
        let role = self.resolver.resolve(role_token, &self.table)?;

        if let Some(cached) =
            self.cache
                .lock()
                .get(&role, permission.resource(), permission.action())
        {
            return Ok(cached);
        }

        let decision = self.decide(&role, &permission);
        trace!(
            role = %role,
            permission = %permission,
            allowed = decision.allowed,
            "authorization decision"
        );
        self.cache.lock().put(
            &role,
            permission.resource(),
            permission.action(),
            decision.clone(),
        );
        Ok(decision)
    }

    fn decide(&self, role_name: &str, permission: &Permission) -> Decision {
        let Some(role) = self.table.role(role_name) else {
            return Decision::deny();
        };
        let Some(resource) = role.resource(permission.resource()) else {
            return Decision::deny();
        };
        if resource.permits(permission.action()) {
            Decision::allow(resource.filters.clone())
        } else {
            Decision::deny()
        }
    }

    /// Clear the decision cache
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Number of cached decisions
    pub fn cache_size(&self) -> usize {
        self.cache.lock().len()
    }
}
