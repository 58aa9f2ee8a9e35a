//! Content-Type to file extension mapping for image responses.

/// Known image subtypes and the extension written for them.
/// Subtypes not listed here get no extension appended.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpeg", "jpg"),
    ("jpg", "jpg"),
    ("pjpeg", "jpg"),
    ("png", "png"),
    ("apng", "png"),
    ("gif", "gif"),
    ("webp", "webp"),
    ("bmp", "bmp"),
    ("x-bmp", "bmp"),
    ("x-ms-bmp", "bmp"),
    ("tiff", "tiff"),
    ("svg+xml", "svg"),
    ("x-icon", "ico"),
    ("vnd.microsoft.icon", "ico"),
    ("avif", "avif"),
    ("heic", "heic"),
    ("heif", "heif"),
    ("jxl", "jxl"),
];

/// Lowercased `type/subtype` of a Content-Type value, without parameters.
fn media_essence(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let (kind, subtype) = essence.split_once('/')?;
    if kind.is_empty() || subtype.is_empty() {
        return None;
    }
    Some(essence)
}

/// True when the Content-Type is `image/<subtype>`.
pub fn is_image_content_type(content_type: &str) -> bool {
    media_essence(content_type)
        .map(|e| e.starts_with("image/"))
        .unwrap_or(false)
}

/// Extension for an image Content-Type, e.g. `image/jpeg` → `jpg`.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = media_essence(content_type)?;
    let subtype = essence.strip_prefix("image/")?;
    IMAGE_EXTENSIONS
        .iter()
        .find(|(s, _)| *s == subtype)
        .map(|(_, ext)| *ext)
}
