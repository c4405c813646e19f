//! Subjects, accounts, and role resolution
//!
//! The integrating application supplies two collaborators: an
//! [`AccountDirectory`] that resolves an account identifier to an [`Account`],
//! and a [`RoleResolver`] that maps a raw role token to a configured role.
//! A request admitted through the gate yields a [`Subject`], which binds the
//! role's filter mappings to concrete attribute values for query scoping.

use crate::error::{RbacError, Result};
use crate::policy::{PolicyTable, RolePolicy};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Capability set an application account must expose for access control
///
/// Filter values in the policy config name subject attributes; an account
/// provides the identifying attributes those values can reference.
pub trait Account {
    /// The ID of the account
    fn id(&self) -> i64;

    /// The name of the account
    fn name(&self) -> &str;

    /// Application-defined attributes, consulted after the built-ins
    /// (`account_id`, `account_name`, `owner`, `role`)
    fn attribute(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Account lookup supplied by the integrating application
pub trait AccountDirectory {
    /// Resolve an account identifier (e.g. an auth header value) to an account
    fn get_account(&self, identifier: &str) -> Option<Box<dyn Account>>;
}

/// Resolves a raw role token against the policy table
pub trait RoleResolver {
    /// Return the canonical role name for a token, or
    /// [`RbacError::UnknownRole`] if it maps to no configured role
    fn resolve(&self, token: &str, table: &PolicyTable) -> Result<String>;
}

/// Default resolver: upper-case the token once, then index lookup
///
/// `"admin"`, `"ADMIN"` and `"Admin"` all resolve to the same role.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseResolver;

impl RoleResolver for UppercaseResolver {
    fn resolve(&self, token: &str, table: &PolicyTable) -> Result<String> {
        table
            .role_name(token)
            .map(str::to_owned)
            .ok_or_else(|| RbacError::UnknownRole(token.to_string()))
    }
}

/// An authenticated subject admitted for a specific resource action
///
/// Combines the account identity, the resolved role, and the role's policy.
/// Handlers use [`Subject::filters`] to scope their data queries.
pub struct Subject {
    account: Box<dyn Account>,
    owner: Option<String>,
    role: String,
    resource: String,
    permissions: HashSet<String>,
    policy: RolePolicy,
}

impl Subject {
    pub(crate) fn new(
        account: Box<dyn Account>,
        owner: Option<String>,
        role: String,
        resource: String,
        policy: RolePolicy,
    ) -> Self {
        let permissions = policy
            .resource(&resource)
            .map(|r| r.permissions.clone())
            .unwrap_or_default();
        Subject {
            account,
            owner,
            role,
            resource,
            permissions,
            policy,
        }
    }

    /// The account's ID
    pub fn account_id(&self) -> i64 {
        self.account.id()
    }

    /// The account's name
    pub fn account_name(&self) -> &str {
        self.account.name()
    }

    /// Optional owning user identifier, when the request carried one
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Canonical name of the resolved role
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The resource this subject was admitted for
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Permitted actions on the admitted resource
    pub fn permissions(&self) -> &HashSet<String> {
        &self.permissions
    }

    /// Attribute value by name, as referenced by policy filter values
    pub fn attr(&self, key: &str) -> Option<String> {
        match key {
            "account_id" => Some(self.account.id().to_string()),
            "account_name" => Some(self.account.name().to_string()),
            "owner" => self.owner.clone(),
            "role" => Some(self.role.clone()),
            other => self.account.attribute(other),
        }
    }

    /// Bind the filter mapping for `resource` to concrete subject values
    ///
    /// Each filter value names a subject attribute; the result maps output
    /// field names to that attribute's value (e.g. `account_id` -> `"42"`),
    /// ready to become `WHERE` clause equivalents. A resource with no filters
    /// yields an empty map. A filter value naming an attribute the subject
    /// does not expose is [`RbacError::UnknownAttribute`].
    pub fn filters(&self, resource: &str) -> Result<HashMap<String, String>> {
        let Some(policy) = self.policy.resource(resource) else {
            return Ok(HashMap::new());
        };
        policy
            .filters
            .iter()
            .map(|(field, attr)| {
                let value = self
                    .attr(attr)
                    .ok_or_else(|| RbacError::UnknownAttribute(attr.clone()))?;
                Ok((field.clone(), value))
            })
            .collect()
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("role", &self.role)
            .field("account_id", &self.account.id())
            .field("account_name", &self.account.name())
            .field("resource", &self.resource)
            .field("permissions", &self.permissions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyTable;

    struct TestAccount {
        id: i64,
        name: String,
    }

    impl Account for TestAccount {
        fn id(&self) -> i64 {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn attribute(&self, key: &str) -> Option<String> {
            (key == "region").then(|| "eu-west".to_string())
        }
    }

    fn member_table() -> PolicyTable {
        PolicyTable::from_yaml_str(
            r#"
roles:
  member:
    products:
      permissions: [list]
      filters:
        account_id: account_id
        owner_name: account_name
"#,
        )
        .unwrap()
    }

    fn member_subject() -> Subject {
        let table = member_table();
        let policy = table.role("member").unwrap().clone();
        Subject::new(
            Box::new(TestAccount {
                id: 42,
                name: "acme".to_string(),
            }),
            Some("alice".to_string()),
            "member".to_string(),
            "products".to_string(),
            policy,
        )
    }

    #[test]
    fn test_uppercase_resolver() {
        let table = member_table();
        let resolver = UppercaseResolver;

        assert_eq!(resolver.resolve("Member", &table).unwrap(), "member");
        assert_eq!(resolver.resolve("MEMBER", &table).unwrap(), "member");

        let err = resolver.resolve("auditor", &table).unwrap_err();
        assert!(matches!(err, RbacError::UnknownRole(t) if t == "auditor"));
    }

    #[test]
    fn test_builtin_attributes() {
        let subject = member_subject();
        assert_eq!(subject.attr("account_id").as_deref(), Some("42"));
        assert_eq!(subject.attr("account_name").as_deref(), Some("acme"));
        assert_eq!(subject.attr("owner").as_deref(), Some("alice"));
        assert_eq!(subject.attr("role").as_deref(), Some("member"));
    }

    #[test]
    fn test_account_attribute_fallback() {
        let subject = member_subject();
        assert_eq!(subject.attr("region").as_deref(), Some("eu-west"));
        assert_eq!(subject.attr("tier"), None);
    }

    #[test]
    fn test_filter_binding() {
        let subject = member_subject();
        let filters = subject.filters("products").unwrap();
        assert_eq!(filters.get("account_id").map(String::as_str), Some("42"));
        assert_eq!(filters.get("owner_name").map(String::as_str), Some("acme"));
    }

    #[test]
    fn test_filters_for_unlisted_resource_are_empty() {
        let subject = member_subject();
        assert!(subject.filters("orders").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_attribute_errors() {
        let table = PolicyTable::from_yaml_str(
            r#"
roles:
  member:
    products:
      permissions: [list]
      filters:
        account_id: shoe_size
"#,
        )
        .unwrap();
        let policy = table.role("member").unwrap().clone();
        let subject = Subject::new(
            Box::new(TestAccount {
                id: 7,
                name: "acme".to_string(),
            }),
            None,
            "member".to_string(),
            "products".to_string(),
            policy,
        );

        let err = subject.filters("products").unwrap_err();
        assert!(matches!(err, RbacError::UnknownAttribute(a) if a == "shoe_size"));
    }

    #[test]
    fn test_permissions_snapshot() {
        let subject = member_subject();
        assert!(subject.permissions().contains("list"));
        assert!(!subject.permissions().contains("create"));
    }
}
