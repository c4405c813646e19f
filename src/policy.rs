//! Policy table: roles, resources, permissions, and filters
//!
//! The configuration format is a YAML document with a top-level `roles`
//! mapping. Each role maps resource names to a permitted action list and an
//! optional filter mapping:
//!
//! ```yaml
//! roles:
//!   admin:
//!     products:
//!       permissions: [list, create, delete]
//!   member:
//!     products:
//!       permissions: [list]
//!       filters:
//!         account_id: account_id
//! ```
//!
//! The table is loaded once at startup and treated as immutable for the
//! process lifetime. Role names are indexed by their upper-cased form so
//! incoming role tokens resolve case-insensitively.

use crate::error::{RbacError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Per-resource policy: the permitted action set plus the filter mapping
/// used to scope query results to attributes of the authenticated subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePolicy {
    /// Actions permitted on this resource (e.g. "list", "create").
    /// Unknown action strings pass through uninterpreted; they only matter
    /// as set members at decision time.
    pub permissions: HashSet<String>,

    /// Output field name -> subject attribute name. Empty when absent.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub filters: HashMap<String, String>,
}

impl ResourcePolicy {
    /// Check whether an action is in the permitted set
    pub fn permits(&self, action: &str) -> bool {
        self.permissions.contains(action)
    }
}

/// A role's resource map
///
/// Transparent so the YAML shape stays `role: { resource: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePolicy {
    /// Resource name -> policy. A resource with no entry is implicitly denied.
    pub resources: HashMap<String, ResourcePolicy>,
}

impl RolePolicy {
    /// Policy for a named resource, if the role lists it
    pub fn resource(&self, name: &str) -> Option<&ResourcePolicy> {
        self.resources.get(name)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PolicyDoc {
    #[serde(default)]
    roles: HashMap<String, RolePolicy>,
}

/// In-memory policy table, read-only after construction
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    roles: HashMap<String, RolePolicy>,
    /// Upper-cased token -> canonical role name. Built once at load.
    index: HashMap<String, String>,
}

impl PolicyTable {
    /// Load a policy table from a YAML file
    ///
    /// Fails with [`RbacError::ConfigNotFound`] if the file is missing and
    /// [`RbacError::ConfigParse`] if the document is unparsable or a resource
    /// entry lacks a `permissions` key. Fatal at startup; surface to the
    /// operator.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RbacError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let table = Self::from_yaml_str(&raw)?;
        debug!(
            roles = table.roles.len(),
            path = %path.display(),
            "loaded policy table"
        );
        Ok(table)
    }

    /// Parse a policy table from an in-memory YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let doc: PolicyDoc = serde_yaml::from_str(yaml)?;
        Ok(Self::from_roles(doc.roles))
    }

    /// Build a table from an already-constructed role map
    pub fn from_roles(roles: HashMap<String, RolePolicy>) -> Self {
        let index = roles
            .keys()
            .map(|name| (name.to_uppercase(), name.clone()))
            .collect();
        PolicyTable { roles, index }
    }

    /// Canonical role name for a raw token, upper-casing once before lookup
    pub fn role_name(&self, token: &str) -> Option<&str> {
        self.index.get(&token.to_uppercase()).map(String::as_str)
    }

    /// Policy for a canonical role name
    pub fn role(&self, name: &str) -> Option<&RolePolicy> {
        self.roles.get(name)
    }

    /// Iterate over (canonical name, policy) pairs
    pub fn roles(&self) -> impl Iterator<Item = (&str, &RolePolicy)> {
        self.roles.iter().map(|(name, role)| (name.as_str(), role))
    }

    /// Number of configured roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True when no roles are configured
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Serialize the table back to YAML
    ///
    /// Round-trips role/resource/action/filter sets exactly.
    pub fn to_yaml(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Doc<'a> {
            roles: &'a HashMap<String, RolePolicy>,
        }
        Ok(serde_yaml::to_string(&Doc { roles: &self.roles })?)
    }

    /// Render the role map as pretty JSON for operator display
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.roles)?)
    }
}

impl fmt::Display for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => write!(f, "PolicyTable(roles={json})"),
            Err(_) => write!(f, "PolicyTable(roles=<unprintable>)"),
        }
    }
}
