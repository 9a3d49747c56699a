//! Storage address derivation
//!
//! Archives live at `<hex digest of caller identity>/<archive name>`. The same
//! caller asking for the same name always lands on the same key, so repeated
//! requests overwrite instead of piling up.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::batch::CallerIdentity;

/// Suffix every stored archive name carries
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Name used when the caller did not ask for one
pub const DEFAULT_ARCHIVE_STEM: &str = "download";

/// Lowercase hex MD5 digest of `input`
///
/// Not a security boundary; only used for stable, well-spread names.
pub fn hex_digest(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Ensure the desired archive name ends with `.zip`
///
/// Idempotent: a name that already carries the suffix (any case) is returned
/// unchanged apart from surrounding whitespace.
///
/// # Example
///
/// ```rust
/// use smushit_domain::storage::normalize_archive_name;
///
/// assert_eq!(normalize_archive_name("photos"), "photos.zip");
/// assert_eq!(normalize_archive_name("photos.zip"), "photos.zip");
/// assert_eq!(normalize_archive_name(""), "download.zip");
/// ```
pub fn normalize_archive_name(desired: &str) -> String {
    let trimmed = desired.trim();
    let stem = if trimmed.is_empty() {
        DEFAULT_ARCHIVE_STEM
    } else {
        trimmed
    };

    if has_archive_suffix(stem) {
        stem.to_string()
    } else {
        format!("{}{}", stem, ARCHIVE_SUFFIX)
    }
}

fn has_archive_suffix(name: &str) -> bool {
    let suffix_len = ARCHIVE_SUFFIX.len();
    name.len() >= suffix_len
        && name.is_char_boundary(name.len() - suffix_len)
        && name[name.len() - suffix_len..].eq_ignore_ascii_case(ARCHIVE_SUFFIX)
}

/// Location of an archive in the object store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageAddress {
    namespace: String,
    name: String,
}

impl StorageAddress {
    /// Derive the address for `caller` and the requested archive name
    pub fn derive(caller: &CallerIdentity, desired_name: &str) -> Self {
        Self {
            namespace: caller.namespace(),
            name: normalize_archive_name(desired_name),
        }
    }

    /// Per-caller prefix
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Normalized archive name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full object key
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for StorageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
