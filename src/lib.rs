//! # Rolegate - YAML-Configured Role-Based Access Control
//!
//! `rolegate` decides whether a request's role may perform a named resource
//! action and produces the per-role filter mapping used to scope the
//! handler's data query. Features:
//!
//! - **YAML policy tables** mapping roles to per-resource permission sets and filters
//! - **Pure decision engine** with an LRU decision cache, safe to share across threads
//! - **Query scoping**: filter values bind to subject attributes (e.g. `account_id`)
//! - **Framework-agnostic gate** reproducing the middleware flow: credentials in,
//!   subject or typed 401/403-class denial out
//!
//! ## Quick Start
//!
//! ```rust
//! use rolegate::{AccessEngine, PolicyTable};
//!
//! let table = PolicyTable::from_yaml_str(r#"
//! roles:
//!   admin:
//!     products:
//!       permissions: [list, create]
//!   member:
//!     products:
//!       permissions: [list]
//!       filters:
//!         account_id: account_id
//! "#).unwrap();
//!
//! let engine = AccessEngine::new(table);
//!
//! // Allowed action: filters come back for query scoping.
//! let decision = engine.authorize("member", "products.list").unwrap();
//! assert!(decision.allowed);
//! assert_eq!(
//!     decision.filters.unwrap().get("account_id").map(String::as_str),
//!     Some("account_id"),
//! );
//!
//! // Unlisted action: silent deny, not an error.
//! assert!(!engine.authorize("member", "products.create").unwrap().allowed);
//! ```
//!
//! ## Structure
//!
//! - [`policy`] - Policy table types and YAML loading
//! - [`permission`] - `resource.action` permission strings
//! - [`engine`] - The access decision engine
//! - [`cache`] - LRU decision cache
//! - [`subject`] - Account/subject traits and filter binding
//! - [`gate`] - Framework-facing admission flow
//! - [`error`] - Error types and the crate [`Result`] alias
//!
//! ## Concurrency
//!
//! The policy table is loaded once and never mutated, so a single
//! [`AccessEngine`] can serve concurrent request threads; the only interior
//! state is the decision cache behind a mutex.

pub mod cache;
pub mod engine;
pub mod error;
pub mod gate;
pub mod permission;
pub mod policy;
pub mod subject;

pub use cache::DecisionCache;
pub use engine::{AccessEngine, Decision};
pub use error::{RbacError, Result};
pub use gate::{Credentials, Gate};
pub use permission::Permission;
pub use policy::{PolicyTable, ResourcePolicy, RolePolicy};
pub use subject::{Account, AccountDirectory, RoleResolver, Subject, UppercaseResolver};
