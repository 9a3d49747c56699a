//! Content classification and scratch file naming

mod extension;
mod sniff;

pub use extension::{
    extension_for_content_type, extension_from_url_path, resolve_extension, EXTENSION_TABLE,
};
pub use sniff::{sniff_content_type, OCTET_STREAM, SNIFF_LEN};

use crate::storage::address::hex_digest;

/// Base name of the scratch file for `url`
///
/// Stable across runs, so re-fetching a URL overwrites its previous download.
pub fn scratch_base_name(url: &str) -> String {
    hex_digest(url)
}

/// Scratch file name for `url`, with the resolved extension if any
pub fn scratch_file_name(url: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", scratch_base_name(url), ext),
        None => scratch_base_name(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_base_name_is_stable() {
        let url = "https://example.test/b";

        assert_eq!(scratch_base_name(url), scratch_base_name(url));
        assert_ne!(scratch_base_name(url), scratch_base_name("https://example.test/c"));
        assert_eq!(scratch_base_name(url).len(), 32);
    }

    #[test]
    fn test_scratch_file_name_appends_extension() {
        let url = "https://example.test/b";
        let base = scratch_base_name(url);

        assert_eq!(scratch_file_name(url, Some("gif")), format!("{}.gif", base));
        assert_eq!(scratch_file_name(url, None), base);
    }
}
