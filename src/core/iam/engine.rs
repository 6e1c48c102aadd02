//! Authorization engine with atomic reload
//!
//! Answers "may `email` access `path`?" against the current [`PolicySet`].
//! Key properties:
//! - Unknown identities are denied
//! - Restrictions use substring search, never implicit anchoring
//! - Duplicate identities: the first policy in document order whose
//!   pattern matches grants access
//! - Reload swaps in a fully built set or leaves the old one serving

use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use super::{DecisionCache, ParseOptions, PolicySet};
use crate::core::config::EngineConfig;
use crate::core::error::{FormatError, Result};
use crate::core::loader::read_document;

/// Parse a policy document into a [`PolicySet`]
pub fn load_policy(document: &str) -> std::result::Result<PolicySet, FormatError> {
    PolicySet::parse(document)
}

/// Decide whether `email` may access `path` under `policies`
///
/// # Examples
///
/// ```
/// use path_acl::{authorize, load_policy};
///
/// let set = load_policy(r#"[
///     {"email": "user1@mysite.com"},
///     {"email": "user2@mysite.com", "path_restriction_reg": "/abc*$"}
/// ]"#).unwrap();
///
/// assert!(authorize(&set, "user1@mysite.com", "/zzz"));
/// assert!(authorize(&set, "user2@mysite.com", "/abcc"));
/// assert!(!authorize(&set, "user2@mysite.com", "/xyz"));
/// assert!(!authorize(&set, "unknown@x.com", "/"));
/// ```
pub fn authorize(policies: &PolicySet, email: &str, path: &str) -> bool {
    let mut known = false;

    for (position, policy) in policies.policies_for(email).enumerate() {
        known = true;
        if policy.permits(path) {
            debug!(email, path, position, pattern = %policy.pattern, "access allowed");
            return true;
        }
    }

    if known {
        debug!(email, path, "access denied: no restriction matched");
    } else {
        debug!(email, path, "access denied: unknown identity");
    }
    false
}

/// One installed policy set together with its decision cache
struct Snapshot {
    policies: Arc<PolicySet>,
    cache: Option<Mutex<DecisionCache>>,
    generation: u64,
}

impl Snapshot {
    fn new(policies: PolicySet, cache_capacity: usize, generation: u64) -> Self {
        Snapshot {
            policies: Arc::new(policies),
            cache: DecisionCache::new(cache_capacity).map(Mutex::new),
            generation,
        }
    }

    fn authorize(&self, email: &str, path: &str) -> bool {
        let Some(cache) = &self.cache else {
            return authorize(&self.policies, email, path);
        };

        if let Some(cached) = cache.lock().get(email, path) {
            trace!(email, path, allowed = cached, "decision cache hit");
            return cached;
        }

        let allowed = authorize(&self.policies, email, path);
        cache.lock().put(email, path, allowed);
        allowed
    }
}

/// Authorization engine serving the most recent good policy set
///
/// Queries may run from any number of threads. A query holds the lock only
/// long enough to clone the current snapshot handle.
pub struct PolicyEngine {
    current: RwLock<Arc<Snapshot>>,
    options: ParseOptions,
    cache_capacity: usize,
}

impl PolicyEngine {
    /// Create an engine serving `policies`, without a decision cache
    pub fn new(policies: PolicySet) -> Self {
        Self::with_config(policies, &EngineConfig::default())
    }

    /// Create an engine with a decision cache of `cache_capacity` entries
    pub fn with_cache(policies: PolicySet, cache_capacity: usize) -> Self {
        let config = EngineConfig {
            cache_capacity,
            ..EngineConfig::default()
        };
        Self::with_config(policies, &config)
    }

    /// Create an engine; `config` also governs how reloads are parsed
    pub fn with_config(policies: PolicySet, config: &EngineConfig) -> Self {
        PolicyEngine {
            current: RwLock::new(Arc::new(Snapshot::new(policies, config.cache_capacity, 0))),
            options: config.parse_options(),
            cache_capacity: config.cache_capacity,
        }
    }

    /// Parse `document` and serve it
    pub fn from_document(document: &str) -> std::result::Result<Self, FormatError> {
        Ok(Self::new(PolicySet::parse(document)?))
    }

    /// Decide whether `email` may access `path`
    ///
    /// # Examples
    ///
    /// ```
    /// use path_acl::PolicyEngine;
    ///
    /// let engine = PolicyEngine::from_document(r#"[
    ///     {"email": "ops@mysite.com", "path_restriction_reg": "^/ops/"}
    /// ]"#).unwrap();
    ///
    /// assert!(engine.authorize("ops@mysite.com", "/ops/deploy"));
    /// assert!(!engine.authorize("ops@mysite.com", "/billing"));
    /// ```
    pub fn authorize(&self, email: &str, path: &str) -> bool {
        let snapshot = Arc::clone(&self.current.read());
        snapshot.authorize(email, path)
    }

    /// Replace the active policy set with one parsed from `document`
    ///
    /// On error the previous set keeps serving and the error is returned.
    pub fn reload(&self, document: &str) -> std::result::Result<(), FormatError> {
        match PolicySet::parse_with(document, &self.options) {
            Ok(policies) => {
                self.install(policies);
                Ok(())
            }
            Err(err) => {
                warn!(
                    kind = err.kind(),
                    generation = self.generation(),
                    "rejected policy reload, keeping current policy set: {}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Read `path` and reload from its contents
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let document = read_document(path.as_ref()).map_err(|err| {
            warn!(path = %path.as_ref().display(), "policy file unreadable, keeping current policy set");
            err
        })?;
        self.reload(&document)?;
        Ok(())
    }

    /// Install an already built policy set
    pub fn install(&self, policies: PolicySet) {
        let count = policies.len();
        let identities = policies.identity_count();

        let mut current = self.current.write();
        let generation = current.generation + 1;
        *current = Arc::new(Snapshot::new(policies, self.cache_capacity, generation));
        drop(current);

        info!(generation, policies = count, identities, "installed policy set");
    }

    /// The policy set currently serving queries
    ///
    /// The returned handle stays valid and unchanged across later reloads.
    pub fn snapshot(&self) -> Arc<PolicySet> {
        Arc::clone(&self.current.read().policies)
    }

    /// Number of successful installs since construction
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// Options applied to documents passed to [`reload`](Self::reload)
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Cached decisions held for the current policy set
    pub fn cache_size(&self) -> usize {
        let snapshot = Arc::clone(&self.current.read());
        snapshot.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    /// Drop all cached decisions for the current policy set
    pub fn clear_cache(&self) {
        let snapshot = Arc::clone(&self.current.read());
        if let Some(cache) = &snapshot.cache {
            cache.lock().clear();
        }
    }
}
