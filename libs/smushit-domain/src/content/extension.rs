//! File extension resolution
//!
//! An extension already present in the URL path always wins. Otherwise the
//! sniffed content type is looked up in a small fixed table; a type that is not
//! in the table means the file keeps no extension.

use std::path::Path;

/// Content types that get an extension appended, and that extension
pub const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
    ("image/gif", "gif"),
    ("audio/mpeg", "mp3"),
    ("audio/mp3", "mp3"),
    ("video/mp4", "mp4"),
];

/// Look up the extension for a content type
///
/// Parameters such as `; charset=utf-8` are ignored and the comparison is
/// case-insensitive.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    EXTENSION_TABLE
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}

/// Extension carried by the last segment of a URL path, kept verbatim
///
/// `url_path` is the path component only (no query or fragment).
pub fn extension_from_url_path(url_path: &str) -> Option<&str> {
    let last_segment = url_path.rsplit('/').next()?;
    Path::new(last_segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

/// Pick the extension for a downloaded resource
///
/// The URL extension takes precedence over the sniffed type.
pub fn resolve_extension<'a>(url_path: &'a str, sniffed_type: &str) -> Option<&'a str> {
    extension_from_url_path(url_path).or_else(|| extension_for_content_type(sniffed_type))
}
