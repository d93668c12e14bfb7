//! MIME type to file extension table.
//!
//! The extension a handle reports comes from this table, keyed by the MIME
//! type the codec detected. Only the first four entries are decodable from a
//! file; the rest exist so base64 sources of those types still resolve.

/// Static `(mime, extension)` pairs.
pub const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/gif", "gif"),
    ("image/bmp", "bmp"),
    ("image/vnd.microsoft.icon", "ico"),
    ("image/tiff", "tiff"),
    ("image/svg+xml", "svg"),
];

/// Look up the extension registered for a MIME type. Matching is exact.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    MIME_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
}
