//! Path restriction patterns
//!
//! A restriction is a regular expression evaluated with search semantics:
//! it matches when any contiguous substring of the request path matches.
//! Nothing is anchored implicitly, so `/admin` also matches `/x/admin/y`.
//! Use `^` and `$` to pin a pattern to the start or end of the path.

use regex::{Regex, RegexBuilder};
use serde::{Serialize, Serializer};

/// Compiled path restriction, owned by exactly one policy
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
}

impl PathPattern {
    /// Pattern substituted when a policy declares no restriction
    pub const DEFAULT: &'static str = ".*";

    /// Compile a pattern with the `regex` crate defaults
    ///
    /// # Examples
    /// ```
    /// use path_acl::iam::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/abc*$").unwrap();
    /// assert!(pattern.matches("/abcc"));
    /// assert!(pattern.matches("/x/ab"));
    /// assert!(!pattern.matches("/xyz"));
    /// ```
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Self::compile_with_limit(source, None)
    }

    /// Compile a pattern, optionally bounding the compiled program size
    pub fn compile_with_limit(source: &str, size_limit: Option<usize>) -> Result<Self, regex::Error> {
        let mut builder = RegexBuilder::new(source);
        if let Some(limit) = size_limit {
            builder.size_limit(limit);
        }
        Ok(PathPattern {
            regex: builder.build()?,
        })
    }

    /// Search for the pattern anywhere in `path`
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Pattern source text as written in the policy document
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether this is the implicit unrestricted default
    pub fn is_unrestricted(&self) -> bool {
        self.as_str() == Self::DEFAULT
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
