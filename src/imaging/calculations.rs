//! Pure calculation functions for dimensions and size estimates.
//!
//! All functions here are pure and testable without any I/O or images.

/// Base64 encodes 3 bytes as 4 characters.
const BASE64_EXPANSION: f64 = 0.75;

/// Calculate dimensions after a uniform percentage scale.
///
/// Uses integer truncation, so `scaled_dimensions((201, 101), 50)` is
/// `Some((100, 50))`. Returns `None` when either side no longer fits in a
/// `u32`. Callers reject a zero result.
///
/// # Examples
/// ```
/// # use simple_image::imaging::scaled_dimensions;
/// assert_eq!(scaled_dimensions((200, 100), 50), Some((100, 50)));
/// assert_eq!(scaled_dimensions((640, 480), 100), Some((640, 480)));
/// assert_eq!(scaled_dimensions((200, 100), u32::MAX), None);
/// ```
pub fn scaled_dimensions(original: (u32, u32), percent: u32) -> Option<(u32, u32)> {
    let (w, h) = original;
    let scale = |v: u32| u32::try_from(u64::from(v) * u64::from(percent) / 100).ok();
    Some((scale(w)?, scale(h)?))
}

/// Round to two decimal places, halves away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Size in kilobytes of an on-disk file, rounded to two decimals.
pub fn file_size_kb(bytes: u64) -> f64 {
    round_to_hundredths(bytes as f64 / 1024.0)
}

/// Estimated decoded size in kilobytes of a base64 payload.
///
/// Based on the trailing-whitespace-trimmed string length times the 3/4
/// expansion ratio, not on the real decoded length. Padding and embedded
/// whitespace count toward the length.
pub fn base64_size_kb(encoded: &str) -> f64 {
    let len = encoded.trim_end().len() as f64;
    round_to_hundredths(len * BASE64_EXPANSION / 1024.0)
}
