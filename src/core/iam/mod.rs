//! Identity-based path access control
//!
//! Provides:
//! - Comment-tolerant JSON policy documents, one record per identity
//! - Regex path restrictions with substring-search semantics
//! - Deny-by-default evaluation for unknown identities
//! - Immutable policy sets with atomic reload
//! - Optional LRU caching of decisions per policy set

mod cache;
mod engine;
mod index;
mod pattern;
mod policy;

pub use cache::DecisionCache;
pub use engine::{authorize, load_policy, PolicyEngine};
pub use index::PolicySet;
pub use pattern::PathPattern;
pub use policy::{
    parse_policies, ParseOptions, UserPolicy, EMAIL_KEY, RESTRICTION_KEY, RESTRICTION_KEY_ALIAS,
};
