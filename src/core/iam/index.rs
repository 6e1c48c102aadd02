//! Immutable policy index
//!
//! A [`PolicySet`] is built once from validated records and never changes.
//! Reloading produces a new set; see [`PolicyEngine`](super::PolicyEngine).

use ahash::AHashMap;
use tracing::info;

use super::{parse_policies, ParseOptions, UserPolicy};
use crate::core::error::FormatError;

/// Validated policies indexed by identity
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    /// Records in document order
    policies: Vec<UserPolicy>,
    /// Email -> positions in `policies`, ascending
    index: AHashMap<String, Vec<usize>>,
}

impl PolicySet {
    /// Index a list of validated policies
    ///
    /// Duplicate emails are kept; their policies stay in the given order.
    pub fn build(policies: Vec<UserPolicy>) -> Self {
        let mut index: AHashMap<String, Vec<usize>> = AHashMap::with_capacity(policies.len());
        for (pos, policy) in policies.iter().enumerate() {
            index.entry(policy.email.clone()).or_default().push(pos);
        }
        PolicySet { policies, index }
    }

    /// Parse and index a policy document with default options
    ///
    /// # Examples
    /// ```
    /// use path_acl::PolicySet;
    ///
    /// let set = PolicySet::parse(r#"[{"email": "user1@mysite.com"}]"#).unwrap();
    /// assert_eq!(set.len(), 1);
    /// assert!(set.contains("user1@mysite.com"));
    /// ```
    pub fn parse(document: &str) -> Result<Self, FormatError> {
        Self::parse_with(document, &ParseOptions::default())
    }

    /// Parse and index a policy document
    pub fn parse_with(document: &str, options: &ParseOptions) -> Result<Self, FormatError> {
        let set = Self::build(parse_policies(document, options)?);
        info!(
            policies = set.len(),
            identities = set.identity_count(),
            "loaded policy set"
        );
        Ok(set)
    }

    /// Policies for `email` in document order
    pub fn policies_for<'a>(&'a self, email: &str) -> impl Iterator<Item = &'a UserPolicy> + 'a {
        self.index
            .get(email)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.policies[pos])
    }

    /// Whether `email` has at least one policy
    pub fn contains(&self, email: &str) -> bool {
        self.index.contains_key(email)
    }

    /// All records in document order
    pub fn iter(&self) -> std::slice::Iter<'_, UserPolicy> {
        self.policies.iter()
    }

    /// Distinct identities, in no particular order
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Number of distinct identities
    pub fn identity_count(&self) -> usize {
        self.index.len()
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a UserPolicy;
    type IntoIter = std::slice::Iter<'a, UserPolicy>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
