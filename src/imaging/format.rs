//! Output format kinds and raw format codes.
//!
//! [`FormatKind`] is the closed set of encodings a handle can produce. Raw
//! format codes (see [`codes`]) are what a codec reports when it inspects an
//! arbitrary source, which may be a format we can identify but not dispatch.

use std::fmt;

/// Numeric image-type codes reported by [`RasterCodec`](super::RasterCodec)
/// inspection. The numbering follows the common image-type table, so codes
/// line up with what most image tooling reports.
pub mod codes {
    pub const UNKNOWN: u32 = 0;
    pub const GIF: u32 = 1;
    pub const JPEG: u32 = 2;
    pub const PNG: u32 = 3;
    pub const BMP: u32 = 6;
    pub const TIFF: u32 = 7;
    pub const ICO: u32 = 17;
    pub const WEBP: u32 = 18;
    pub const AVIF: u32 = 19;
}

/// One of the four raster encodings a handle can decode from a file and
/// encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl FormatKind {
    pub const ALL: [FormatKind; 4] = [
        FormatKind::Png,
        FormatKind::Jpeg,
        FormatKind::Gif,
        FormatKind::Bmp,
    ];

    /// Fixed file extension used when saving, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FormatKind::Png => "png",
            FormatKind::Jpeg => "jpeg",
            FormatKind::Gif => "gif",
            FormatKind::Bmp => "bmp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            FormatKind::Png => "image/png",
            FormatKind::Jpeg => "image/jpeg",
            FormatKind::Gif => "image/gif",
            FormatKind::Bmp => "image/bmp",
        }
    }

    pub fn code(self) -> u32 {
        match self {
            FormatKind::Png => codes::PNG,
            FormatKind::Jpeg => codes::JPEG,
            FormatKind::Gif => codes::GIF,
            FormatKind::Bmp => codes::BMP,
        }
    }

    /// Map a raw format code back to a dispatchable kind.
    ///
    /// Returns `None` for anything outside PNG/JPEG/GIF/BMP, including codes
    /// for formats the codec can identify (TIFF, ICO, WebP).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            codes::PNG => Some(FormatKind::Png),
            codes::JPEG => Some(FormatKind::Jpeg),
            codes::GIF => Some(FormatKind::Gif),
            codes::BMP => Some(FormatKind::Bmp),
            _ => None,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Png => "PNG",
            FormatKind::Jpeg => "JPEG",
            FormatKind::Gif => "GIF",
            FormatKind::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_back_to_kinds() {
        for kind in FormatKind::ALL {
            assert_eq!(FormatKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn identifiable_but_unsupported_codes_have_no_kind() {
        for code in [codes::UNKNOWN, codes::TIFF, codes::ICO, codes::WEBP, codes::AVIF] {
            assert_eq!(FormatKind::from_code(code), None, "code {code}");
        }
    }

    #[test]
    fn jpeg_extension_is_long_form() {
        assert_eq!(FormatKind::Jpeg.extension(), "jpeg");
    }

    #[test]
    fn display_is_uppercase_name() {
        assert_eq!(FormatKind::Bmp.to_string(), "BMP");
    }
}
