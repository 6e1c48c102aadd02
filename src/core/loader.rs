//! Policy loading from files
//!
//! Reading is kept apart from parsing so the engine itself never touches
//! the filesystem.

use std::path::Path;

use crate::core::error::{AclError, Result};
use crate::core::iam::{ParseOptions, PolicySet};

/// Read a UTF-8 text file
pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| AclError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a policy set from a file
pub fn load_policy_from_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<PolicySet> {
    let document = read_document(path.as_ref())?;
    Ok(PolicySet::parse_with(&document, options)?)
}
