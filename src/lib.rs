//! # path-acl - Per-User Path Access Control
//!
//! `path-acl` evaluates access-control lists that bind user identities to
//! path restrictions. A policy document is a JSON array, one object per
//! identity, with whole-line `#` comments allowed:
//!
//! ```text
//! # Users allowed on this server.
//! [
//!     {"email": "user1@mysite.com"},
//!     {"email": "user2@mysite.com", "path_restriction_reg": "/abc*$"},
//! ]
//! ```
//!
//! - **Fail closed**: identities missing from the document are denied
//! - **Default access**: a record without a restriction may access any path
//! - **Substring search**: restrictions match anywhere in the path unless
//!   anchored with `^` / `$`
//! - **Atomic loads**: a document is accepted whole or not at all
//!
//! ## Quick Start
//!
//! ```rust
//! use path_acl::{authorize, load_policy};
//!
//! # fn main() -> Result<(), path_acl::FormatError> {
//! let set = load_policy(r#"[
//!     {"email": "user1@mysite.com"},
//!     {"email": "user2@mysite.com", "path_restriction_reg": "^/reports/"}
//! ]"#)?;
//!
//! assert!(authorize(&set, "user1@mysite.com", "/anything"));
//! assert!(authorize(&set, "user2@mysite.com", "/reports/q3"));
//! assert!(!authorize(&set, "user2@mysite.com", "/admin"));
//! assert!(!authorize(&set, "stranger@mysite.com", "/"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving and Reloading
//!
//! ```rust,no_run
//! use path_acl::{load_policy_from_file, EngineConfig, PolicyEngine};
//!
//! # fn main() -> path_acl::Result<()> {
//! let config = EngineConfig::from_file("acl.toml")?;
//! let policies = load_policy_from_file("acl.json", &config.parse_options())?;
//! let engine = PolicyEngine::with_config(policies, &config);
//!
//! if engine.authorize("user1@mysite.com", "/reports/q3") {
//!     // serve the request
//! }
//!
//! // On reload signal: a bad file leaves the current policies in place
//! if let Err(err) = engine.reload_from_file("acl.json") {
//!     eprintln!("policy reload failed: {err}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::{config, error, iam, loader, preprocess, validation};

pub use crate::core::{
    config::EngineConfig,
    error::{AclError, FormatError, Result},
    iam::{
        authorize, load_policy, DecisionCache, ParseOptions, PathPattern, PolicyEngine, PolicySet,
        UserPolicy,
    },
    loader::load_policy_from_file,
};
