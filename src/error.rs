//! Error types for policy loading and access decisions

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a policy table or deciding access
#[derive(Error, Debug)]
pub enum RbacError {
    #[error("Policy config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse policy config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed permission {0:?} (expected \"resource.action\")")]
    MalformedPermission(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Account identifier is required")]
    MissingAccount,

    #[error("Account not found: {0}")]
    UnknownAccount(String),

    #[error("Role token is required")]
    MissingRole,

    #[error("Access to {action} forbidden for role {role}")]
    Forbidden { action: String, role: String },

    #[error("Subject has no attribute named {0:?}")]
    UnknownAttribute(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RbacError {
    /// HTTP-equivalent status code for gate-facing denials.
    ///
    /// Authentication failures (missing or unresolvable identity) map to 401,
    /// policy denials to 403. Returns `None` for errors that are not request
    /// denials (config problems, programmer errors).
    pub fn deny_status(&self) -> Option<u16> {
        match self {
            RbacError::MissingAccount
            | RbacError::UnknownAccount(_)
            | RbacError::MissingRole
            | RbacError::UnknownRole(_) => Some(401),
            RbacError::Forbidden { .. } => Some(403),
            _ => None,
        }
    }
}

/// Access control result type
pub type Result<T> = std::result::Result<T, RbacError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_status_mapping() {
        assert_eq!(RbacError::MissingAccount.deny_status(), Some(401));
        assert_eq!(
            RbacError::UnknownRole("auditor".to_string()).deny_status(),
            Some(401)
        );
        assert_eq!(
            RbacError::Forbidden {
                action: "products.delete".to_string(),
                role: "member".to_string(),
            }
            .deny_status(),
            Some(403)
        );
        assert_eq!(
            RbacError::MalformedPermission("products".to_string()).deny_status(),
            None
        );
    }

    #[test]
    fn test_forbidden_message() {
        let err = RbacError::Forbidden {
            action: "products.delete".to_string(),
            role: "MEMBER".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Access to products.delete forbidden for role MEMBER"
        );
    }
}
