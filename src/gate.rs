//! Request gate: the framework-facing admission flow
//!
//! A web framework wraps its route handlers around [`Gate::admit`]: extract
//! the auth tokens from the request into [`Credentials`], name the guarded
//! action, and either receive a [`Subject`] for the handler or an error whose
//! [`deny_status`](crate::RbacError::deny_status) gives the response code
//! (401 for identity failures, 403 for policy denials).

use crate::engine::AccessEngine;
use crate::error::{RbacError, Result};
use crate::permission::Permission;
use crate::subject::{AccountDirectory, RoleResolver, Subject, UppercaseResolver};
use tracing::warn;

/// Auth tokens extracted from an incoming request
///
/// Conventionally the `x-auth-account`, `x-auth-user` and `x-auth-role`
/// headers, but the gate only sees the extracted values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Credentials<'a> {
    /// Account identifier, resolved through the [`AccountDirectory`]
    pub account: Option<&'a str>,
    /// Optional owning user identifier, passed through to the subject
    pub owner: Option<&'a str>,
    /// Raw role token, resolved through the engine's [`RoleResolver`]
    pub role: Option<&'a str>,
}

/// Admission gate combining the decision engine with an account directory
pub struct Gate<D, R = UppercaseResolver> {
    engine: AccessEngine<R>,
    directory: D,
}

impl<D: AccountDirectory, R: RoleResolver> Gate<D, R> {
    /// Create a gate over an engine and an account directory
    pub fn new(engine: AccessEngine<R>, directory: D) -> Self {
        Gate { engine, directory }
    }

    /// The underlying decision engine
    pub fn engine(&self) -> &AccessEngine<R> {
        &self.engine
    }

    /// Admit a request to perform `action` (`resource.action`)
    ///
    /// Runs the full admission flow: require an account token, resolve the
    /// account, require and resolve the role token, then authorize. On allow,
    /// the returned [`Subject`] carries the bound identity and the role's
    /// policy for filter scoping; handlers receive it in place of the raw
    /// credentials.
    pub fn admit(&self, credentials: &Credentials<'_>, action: &str) -> Result<Subject> {
        let permission = Permission::parse(action)?;

        let account_name = credentials.account.ok_or(RbacError::MissingAccount)?;
        let account = self
            .directory
            .get_account(account_name)
            .ok_or_else(|| RbacError::UnknownAccount(account_name.to_string()))?;

        let role_token = credentials.role.ok_or(RbacError::MissingRole)?;
        let role = self.engine.resolve_role(role_token)?;

        let decision = self.engine.authorize(role_token, action)?;
        if !decision.allowed {
            warn!(
                role = %role,
                action,
                account = account_name,
                "request denied"
            );
            return Err(RbacError::Forbidden {
                action: action.to_string(),
                role,
            });
        }

        let policy = self.engine.table().role(&role).cloned().unwrap_or_default();
        Ok(Subject::new(
            account,
            credentials.owner.map(str::to_owned),
            role,
            permission.resource().to_string(),
            policy,
        ))
    }
}
