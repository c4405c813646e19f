//! Permission strings of the form `resource.action`
//!
//! Routes are guarded with strings like `"products.create"`. The split happens
//! on the first `.`, so `"reports.export.csv"` names the `reports` resource
//! and the `export.csv` action. A string without a dot is a programmer error
//! and fails fast with [`RbacError::MalformedPermission`].

use crate::error::{RbacError, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed `resource.action` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    resource: String,
    action: String,
}

impl Permission {
    /// Create a permission from already-split parts
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Permission {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Parse a `resource.action` string, splitting on the first `.`
    ///
    /// # Examples
    /// ```
    /// use rolegate::Permission;
    ///
    /// let perm = Permission::parse("products.create").unwrap();
    /// assert_eq!(perm.resource(), "products");
    /// assert_eq!(perm.action(), "create");
    ///
    /// assert!(Permission::parse("products").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let (resource, action) = raw
            .split_once('.')
            .ok_or_else(|| RbacError::MalformedPermission(raw.to_string()))?;
        if resource.is_empty() || action.is_empty() {
            return Err(RbacError::MalformedPermission(raw.to_string()));
        }
        Ok(Permission::new(resource, action))
    }

    /// The resource name (left of the first dot)
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The action name (right of the first dot)
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl FromStr for Permission {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self> {
        Permission::parse(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let perm = Permission::parse("products.list").unwrap();
        assert_eq!(perm.resource(), "products");
        assert_eq!(perm.action(), "list");
    }

    #[test]
    fn test_parse_splits_on_first_dot() {
        let perm = Permission::parse("reports.export.csv").unwrap();
        assert_eq!(perm.resource(), "reports");
        assert_eq!(perm.action(), "export.csv");
    }

    #[test]
    fn test_parse_missing_dot() {
        let err = Permission::parse("products").unwrap_err();
        assert!(matches!(err, RbacError::MalformedPermission(s) if s == "products"));
    }

    #[test]
    fn test_parse_empty_sides() {
        assert!(Permission::parse(".list").is_err());
        assert!(Permission::parse("products.").is_err());
        assert!(Permission::parse(".").is_err());
        assert!(Permission::parse("").is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let perm: Permission = "products.create".parse().unwrap();
        assert_eq!(perm.to_string(), "products.create");
    }
}
