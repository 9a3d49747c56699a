//! Content-type sniffing over the leading bytes of a payload
//!
//! Classification looks at no more than [`SNIFF_LEN`] bytes. Binary formats are
//! matched by signature first, then markup, then a plain-text heuristic.
//! Anything left over is `application/octet-stream`.

/// Number of leading bytes considered when classifying content
pub const SNIFF_LEN: usize = 512;

/// Generic binary classification
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Fixed-offset magic number
struct Signature {
    offset: usize,
    magic: &'static [u8],
    mime: &'static str,
}

const fn sig(offset: usize, magic: &'static [u8], mime: &'static str) -> Signature {
    Signature {
        offset,
        magic,
        mime,
    }
}

const SIGNATURES: &[Signature] = &[
    sig(0, b"%PDF-", "application/pdf"),
    sig(0, b"%!PS-Adobe-", "application/postscript"),
    sig(0, b"GIF87a", "image/gif"),
    sig(0, b"GIF89a", "image/gif"),
    sig(0, b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    sig(0, b"\xFF\xD8\xFF", "image/jpeg"),
    sig(0, b"BM", "image/bmp"),
    sig(0, b"\x00\x00\x01\x00", "image/x-icon"),
    sig(0, b"ID3", "audio/mpeg"),
    sig(0, b"OggS\x00", "application/ogg"),
    sig(0, b"\x1A\x45\xDF\xA3", "video/webm"),
    sig(0, b"PK\x03\x04", "application/zip"),
    sig(0, b"\x1F\x8B\x08", "application/x-gzip"),
    sig(0, b"Rar!\x1A\x07", "application/x-rar-compressed"),
    sig(0, b"wOFF", "font/woff"),
    sig(0, b"wOF2", "font/woff2"),
];

/// RIFF containers carry their real type at offset 8
const RIFF_FORMS: &[(&[u8], &str)] = &[
    (b"WEBP", "image/webp"),
    (b"WAVE", "audio/wave"),
    (b"AVI ", "video/avi"),
];

/// Markup openers, matched case-insensitively after leading whitespace
const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Classify `data` into a MIME type
///
/// Always returns a type; unrecognized binary content falls back to
/// [`OCTET_STREAM`].
///
/// # Example
///
/// ```rust
/// use smushit_domain::content::sniff_content_type;
///
/// assert_eq!(sniff_content_type(b"GIF89a\x01\x00\x01\x00"), "image/gif");
/// assert_eq!(sniff_content_type(&[0x00, 0x01, 0x02]), "application/octet-stream");
/// ```
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    for signature in SIGNATURES {
        let end = signature.offset + signature.magic.len();
        if data.len() >= end && &data[signature.offset..end] == signature.magic {
            return signature.mime;
        }
    }

    if let Some(mime) = sniff_riff(data) {
        return mime;
    }

    if is_mp4(data) {
        return "video/mp4";
    }

    if let Some(mime) = sniff_markup(data) {
        return mime;
    }

    if has_text_bom(data) || !data.iter().any(|&b| is_binary_byte(b)) {
        return TEXT_PLAIN;
    }

    OCTET_STREAM
}

fn sniff_riff(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 || &data[..4] != b"RIFF" {
        return None;
    }

    RIFF_FORMS
        .iter()
        .find(|(form, _)| &data[8..12] == *form)
        .map(|(_, mime)| *mime)
}

/// ISO base media file with an `ftyp` box naming an mp4 brand
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }

    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if box_size < 12 || box_size % 4 != 0 || data.len() < box_size {
        return false;
    }

    if &data[4..8] != b"ftyp" {
        return false;
    }

    // Major brand at 8, minor version at 12, compatible brands from 16.
    let major = std::iter::once(8);
    let compatible = (16..box_size).step_by(4);
    major
        .chain(compatible)
        .any(|start| start + 3 <= data.len() && &data[start..start + 3] == b"mp4")
}

fn sniff_markup(data: &[u8]) -> Option<&'static str> {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let data = &data[start..];

    if data.starts_with(b"<?xml") {
        return Some("text/xml; charset=utf-8");
    }

    HTML_TAGS
        .iter()
        .any(|tag| matches_tag(data, tag))
        .then_some("text/html; charset=utf-8")
}

/// Case-insensitive tag prefix that must be followed by a space or `>`
fn matches_tag(data: &[u8], tag: &[u8]) -> bool {
    if data.len() <= tag.len() {
        return false;
    }

    let prefix_matches = data
        .iter()
        .zip(tag)
        .all(|(d, t)| d.to_ascii_uppercase() == *t);

    prefix_matches && matches!(data[tag.len()], b' ' | b'>')
}

fn has_text_bom(data: &[u8]) -> bool {
    data.starts_with(b"\xEF\xBB\xBF") || data.starts_with(b"\xFE\xFF") || data.starts_with(b"\xFF\xFE")
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
