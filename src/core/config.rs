//! Engine configuration
//!
//! Read from TOML, e.g.
//!
//! ```toml
//! cache_capacity = 1000
//! allow_trailing_commas = true
//! regex_size_limit = 1048576
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;
use crate::core::iam::ParseOptions;
use crate::core::loader::read_document;

/// Tunables for [`PolicyEngine`](crate::PolicyEngine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Decisions cached per policy set; `0` disables the cache
    ///
    /// A non-zero capacity puts a mutex on the query path.
    pub cache_capacity: usize,

    /// Forgive a comma before a closing `]` or `}`
    pub allow_trailing_commas: bool,

    /// Compiled size limit for each restriction pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_size_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: 0,
            allow_trailing_commas: true,
            regex_size_limit: None,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml(&read_document(path.as_ref())?)
    }

    /// Parser options implied by this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            allow_trailing_commas: self.allow_trailing_commas,
            regex_size_limit: self.regex_size_limit,
        }
    }
}
