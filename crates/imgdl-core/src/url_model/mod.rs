//! URL modeling and filename derivation.
//!
//! Derives safe local base names from the Content-Disposition header or the
//! URL path, and maps image Content-Types to file extensions.

mod content_disposition;
mod mime;
mod path;
mod sanitize;

use sha2::{Digest, Sha256};

pub use content_disposition::parse_content_disposition_filename;
pub use mime::{extension_for_content_type, is_image_content_type};
pub use path::filename_from_url_path;
pub use sanitize::{sanitize_filename, MAX_NAME_BYTES};

/// Prefix of generated names used when neither header nor URL yields a usable name.
const GENERATED_PREFIX: &str = "image-";

/// Longest suffix after the last dot that still counts as an extension.
const MAX_EXTENSION_LEN: usize = 8;

/// Derives a sanitized base name (without collision handling).
///
/// Prefers the filename from `content_disposition` (if present and usable
/// after sanitizing), otherwise the last path segment of `url`, otherwise a
/// generated name stable for the URL.
///
/// # Examples
///
/// - `derive_base_name("https://example.com/cat.png", None)` → `"cat.png"`
/// - `derive_base_name("https://example.com/", Some("inline; filename=\"dog.jpg\""))` → `"dog.jpg"`
pub fn derive_base_name(url: &str, content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(parse_content_disposition_filename)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| is_usable(s))
        .or_else(|| {
            filename_from_url_path(url)
                .map(|raw| sanitize_filename(&raw))
                .filter(|s| is_usable(s))
        })
        .unwrap_or_else(|| generated_name(url))
}

/// Deterministic placeholder name: `image-` plus 12 hex chars of SHA-256(url).
pub fn generated_name(url: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    format!("{}{}", GENERATED_PREFIX, &digest[..12])
}

/// Splits `name` into stem and extension.
///
/// An extension is the text after the last dot when the stem is non-empty
/// and the suffix is 1..=8 ASCII alphanumerics containing at least one letter
/// (so `v1.2` has no extension but `a.png` does).
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            (stem, Some(ext))
        }
        _ => (name, None),
    }
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
