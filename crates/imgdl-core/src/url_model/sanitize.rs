//! Cross-platform safe filename sanitization.

use super::split_extension;

/// Upper bound for a sanitized name, leaving room for a `-N` disambiguator
/// and an appended extension below the common 255-byte NAME_MAX.
pub const MAX_NAME_BYTES: usize = 200;

/// Characters reserved on at least one supported filesystem.
const RESERVED: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Device names Windows refuses as file stems regardless of extension.
const DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitizes a candidate filename for use in the output directory.
///
/// - Replaces NUL, `/`, `\`, control characters, whitespace and reserved
///   characters (`< > : " | ? *`) with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing spaces, dots and underscores
/// - Prefixes Windows device names (`CON`, `LPT1`, ...) with `_`
/// - Limits length to [`MAX_NAME_BYTES`], keeping the extension when possible
///
/// May return an empty string; callers treat that as unusable.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char =
            c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() || RESERVED.contains(&c);
        let replacement = if unsafe_char { '_' } else { c };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut name = truncate_keeping_extension(trimmed, MAX_NAME_BYTES);

    let stem_upper = name.split('.').next().unwrap_or("").to_ascii_uppercase();
    if DEVICE_NAMES.contains(&stem_upper.as_str()) {
        name.insert(0, '_');
    }
    name
}

fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    match split_extension(name) {
        (stem, Some(ext)) if ext.len() + 1 < max => {
            let keep = floor_char_boundary(stem, max - ext.len() - 1);
            format!("{}.{}", stem[..keep].trim_end_matches(|c| c == '.' || c == '_'), ext)
        }
        _ => {
            let keep = floor_char_boundary(name, max);
            name[..keep].to_string()
        }
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_slash_and_backslash() {
        assert_eq!(sanitize_filename("a/b\\c.png"), "a_b_c.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
    }

    #[test]
    fn replaces_reserved_characters() {
        assert_eq!(sanitize_filename("what?<is>:this*.jpg"), "what_is_this_.jpg");
        assert_eq!(sanitize_filename("a|b\"c.gif"), "a_b_c.gif");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..  image.png  ..  "), "image.png");
    }

    #[test]
    fn collapses_underscores_and_whitespace() {
        assert_eq!(sanitize_filename("my   cat___photo.png"), "my_cat_photo.png");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("img\x00name\x1f.png"), "img_name_.png");
    }

    #[test]
    fn device_names_are_prefixed() {
        assert_eq!(sanitize_filename("con.png"), "_con.png");
        assert_eq!(sanitize_filename("LPT1"), "_LPT1");
        assert_eq!(sanitize_filename("console.png"), "console.png");
    }

    #[test]
    fn only_unsafe_chars_yields_empty() {
        assert_eq!(sanitize_filename("..."), "");
        assert_eq!(sanitize_filename("///"), "");
    }

    #[test]
    fn long_names_are_truncated_keeping_extension() {
        let long = format!("{}.jpeg", "x".repeat(400));
        let out = sanitize_filename(&long);
        assert_eq!(out.len(), MAX_NAME_BYTES);
        assert!(out.ends_with(".jpeg"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = sanitize_filename(&long);
        assert!(out.len() <= MAX_NAME_BYTES);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
