//! The image handle: a decoded raster plus the metadata read when it was
//! decoded.
//!
//! A handle is built from a file ([`ImageHandle::from_file`]) or a base64
//! string ([`ImageHandle::from_base64`]). Construction is all-or-nothing: if
//! any step fails, no handle is returned.
//!
//! ```text
//! from_file / from_base64 ──► ImageHandle ──► rescale_by_percent / resize_exact (in place)
//!                                  │
//!                                  ├──► get_encoded_bytes (cached per format)
//!                                  ├──► save_as / save_png / ... (direct to disk)
//!                                  ├──► to_data_uri (always PNG, never cached)
//!                                  └──► reopen (rebuild from origin)
//! ```
//!
//! Metadata (`mime`, `extension`, `format_code`, `bits`, `size_kb`) belongs to
//! the source and is never recomputed. Resizing replaces the raster and its
//! dimensions only.
//!
//! ## Known quirk: stale encode cache
//!
//! Resizing does not clear the encode cache. After a rescale,
//! [`get_encoded_bytes`](ImageHandle::get_encoded_bytes) keeps returning bytes
//! encoded from the old raster until called with `overwrite = true`.

use crate::imaging::{
    CodecError, FormatKind, RasterCodec, Rect, RustCodec, base64_size_kb, file_size_kb,
    scaled_dimensions,
};
use crate::mime::extension_for_mime;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine as _, engine::general_purpose};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of every data URI produced by [`ImageHandle::to_data_uri`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Lenient decoder: padding is optional, as many producers strip it.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Unsupported image format (type code {0})")]
    UnsupportedFormat(u32),
    #[error("No extension registered for MIME type '{0}'")]
    Lookup(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Image has no recorded origin to reopen from")]
    NoOrigin,
}

impl From<CodecError> for ImageError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(e) => ImageError::Io(e),
            CodecError::Decode(msg) => ImageError::Decode(msg),
            CodecError::Encode(msg) => ImageError::Encode(msg),
            CodecError::Allocate { width, height } => ImageError::InvalidArgument(format!(
                "cannot allocate a {width}x{height} raster"
            )),
        }
    }
}

/// Result type for handle operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Where a handle's raster came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    /// The base64 input exactly as given, data URI prefix included.
    Base64(String),
    /// Wrapped from an existing raster; cannot be reopened.
    Unset,
}

/// A decoded image plus its source metadata.
///
/// Generic over the [`RasterCodec`] doing the pixel work; [`RustCodec`] by
/// default. Mutation takes `&mut self`, so sharing a handle across threads
/// needs external synchronization.
pub struct ImageHandle<C: RasterCodec = RustCodec> {
    codec: C,
    origin: Origin,
    raster: C::Raster,
    width: u32,
    height: u32,
    format_code: u32,
    bits: u8,
    mime: String,
    extension: &'static str,
    size_kb: f64,
    encoded_cache: HashMap<FormatKind, Vec<u8>>,
}

impl ImageHandle<RustCodec> {
    /// Decode an image file with the default [`RustCodec`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(RustCodec::new(), path)
    }

    /// Decode a base64 payload (or `data:` URI) with the default [`RustCodec`].
    pub fn from_base64(data: &str) -> Result<Self> {
        Self::from_base64_with(RustCodec::new(), data)
    }
}

impl<C: RasterCodec> ImageHandle<C> {
    /// Decode an image file.
    ///
    /// The codec inspects the header first; only PNG, JPEG, GIF and BMP are
    /// dispatched to a decoder; any other detected format fails with
    /// [`ImageError::UnsupportedFormat`].
    pub fn from_file_with(codec: C, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let size_kb = file_size_kb(std::fs::metadata(path)?.len());

        let info = codec.inspect_file(path)?;
        let kind = FormatKind::from_code(info.format_code)
            .ok_or(ImageError::UnsupportedFormat(info.format_code))?;
        let raster = codec.decode_file(path, kind)?;
        let extension = lookup_extension(&info.mime)?;

        log::debug!(
            "Loaded {} ({}x{}, {}, {size_kb} KB)",
            path.display(),
            info.width,
            info.height,
            info.mime
        );

        Ok(Self {
            codec,
            origin: Origin::File(path.to_path_buf()),
            raster,
            width: info.width,
            height: info.height,
            format_code: info.format_code,
            bits: info.bits,
            mime: info.mime,
            extension,
            size_kb,
            encoded_cache: HashMap::new(),
        })
    }

    /// Decode a base64 payload.
    ///
    /// A `data:image/...;base64,` prefix is stripped if present. The size is
    /// estimated from the trimmed payload length, not the decoded byte count.
    pub fn from_base64_with(codec: C, data: &str) -> Result<Self> {
        let payload = strip_data_uri(data);
        let size_kb = base64_size_kb(payload);
        let bytes = decode_base64(payload)?;

        let info = codec.inspect_bytes(&bytes)?;
        let raster = codec.decode_bytes(&bytes)?;
        let extension = lookup_extension(&info.mime)?;

        log::debug!(
            "Loaded base64 image ({}x{}, {}, ~{size_kb} KB)",
            info.width,
            info.height,
            info.mime
        );

        Ok(Self {
            codec,
            origin: Origin::Base64(data.to_string()),
            raster,
            width: info.width,
            height: info.height,
            format_code: info.format_code,
            bits: info.bits,
            mime: info.mime,
            extension,
            size_kb,
            encoded_cache: HashMap::new(),
        })
    }

    /// Wrap an already-decoded raster. The handle has no origin, so
    /// [`reopen`](Self::reopen) fails with [`ImageError::NoOrigin`].
    pub fn from_raster_with(codec: C, raster: C::Raster, kind: FormatKind) -> Self {
        let (width, height) = codec.dimensions(&raster);
        Self {
            codec,
            origin: Origin::Unset,
            raster,
            width,
            height,
            format_code: kind.code(),
            bits: 8,
            mime: kind.mime().to_string(),
            extension: kind.extension(),
            size_kb: 0.0,
            encoded_cache: HashMap::new(),
        }
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Scale both dimensions by `percent` (truncating) with a smooth resample.
    ///
    /// Returns `self` for chaining. `0`, a result that rounds down to a
    /// zero-pixel dimension, or one too large to allocate fails with
    /// [`ImageError::InvalidArgument`].
    pub fn rescale_by_percent(&mut self, percent: u32) -> Result<&mut Self> {
        if percent == 0 {
            return Err(ImageError::InvalidArgument(
                "scale percent must be positive".into(),
            ));
        }
        let (new_width, new_height) = scaled_dimensions((self.width, self.height), percent)
            .ok_or_else(|| {
                ImageError::InvalidArgument(format!(
                    "{percent}% of {}x{} overflows u32 dimensions",
                    self.width, self.height
                ))
            })?;
        if new_width == 0 || new_height == 0 {
            return Err(ImageError::InvalidArgument(format!(
                "{percent}% of {}x{} is {new_width}x{new_height}",
                self.width, self.height
            )));
        }
        self.resize_exact(new_width, new_height)
    }

    /// Resample the whole raster into a new `width × height` true-color buffer.
    pub fn resize_exact(&mut self, width: u32, height: u32) -> Result<&mut Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument(format!(
                "target dimensions must be positive, got {width}x{height}"
            )));
        }

        let mut resized = self.codec.allocate_true_color(width, height)?;
        self.codec.resample_copy(
            &mut resized,
            &self.raster,
            Rect::full(width, height),
            Rect::full(self.width, self.height),
        );
        log::debug!(
            "Resized {}x{} -> {width}x{height}",
            self.width,
            self.height
        );

        self.raster = resized;
        self.width = width;
        self.height = height;
        Ok(self)
    }

    // =========================================================================
    // Encoding and saving
    // =========================================================================

    /// Encoded bytes of the raster in `kind`, memoized per format.
    ///
    /// A cached buffer is returned as-is unless `overwrite` is set. Encode
    /// failure yields an empty slice rather than an error and leaves nothing
    /// cached for `kind`.
    pub fn get_encoded_bytes(&mut self, kind: FormatKind, overwrite: bool) -> &[u8] {
        if overwrite || !self.encoded_cache.contains_key(&kind) {
            let bytes = encode_or_empty(&self.codec, &self.raster, kind);
            if bytes.is_empty() {
                self.encoded_cache.remove(&kind);
            } else {
                self.encoded_cache.insert(kind, bytes);
            }
        }
        self.encoded_cache
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Write the raster to `<directory>/<file_name>.<ext>` and return the file
    /// name.
    ///
    /// `ext` is the fixed extension of `kind`, not the handle's own
    /// [`extension`](Self::extension). `permissions` are Unix mode bits applied
    /// after writing. The encode cache is neither read nor updated.
    pub fn save_as(
        &self,
        kind: FormatKind,
        directory: impl AsRef<Path>,
        file_name: &str,
        permissions: Option<u32>,
    ) -> Result<String> {
        let base_name = format!("{file_name}.{}", kind.extension());
        let path = directory.as_ref().join(&base_name);

        self.codec.encode_to_file(&self.raster, &path, kind)?;
        if let Some(mode) = permissions {
            apply_permissions(&path, mode)?;
        }

        log::info!("Saved {}", path.display());
        Ok(base_name)
    }

    pub fn save_png(&self, directory: impl AsRef<Path>, file_name: &str) -> Result<String> {
        self.save_as(FormatKind::Png, directory, file_name, None)
    }

    pub fn save_jpeg(&self, directory: impl AsRef<Path>, file_name: &str) -> Result<String> {
        self.save_as(FormatKind::Jpeg, directory, file_name, None)
    }

    pub fn save_gif(&self, directory: impl AsRef<Path>, file_name: &str) -> Result<String> {
        self.save_as(FormatKind::Gif, directory, file_name, None)
    }

    pub fn save_bmp(&self, directory: impl AsRef<Path>, file_name: &str) -> Result<String> {
        self.save_as(FormatKind::Bmp, directory, file_name, None)
    }

    /// Freshly encode as PNG and wrap in a `data:` URI. Empty on encode failure.
    pub fn to_data_uri(&self) -> String {
        let bytes = encode_or_empty(&self.codec, &self.raster, FormatKind::Png);
        if bytes.is_empty() {
            return String::new();
        }
        format!(
            "{PNG_DATA_URI_PREFIX}{}",
            general_purpose::STANDARD.encode(bytes)
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw image-type code the codec reported at decode time.
    pub fn format_code(&self) -> u32 {
        self.format_code
    }

    /// Bits per channel as reported at decode time.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Source size in kilobytes, two decimals. Estimated for base64 sources.
    pub fn size_kb(&self) -> f64 {
        self.size_kb
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn raster(&self) -> &C::Raster {
        &self.raster
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C: RasterCodec + Clone> ImageHandle<C> {
    /// Rebuild a fresh handle from the recorded origin, with an empty cache
    /// and the original, unresized raster.
    pub fn reopen(&self) -> Result<Self> {
        match &self.origin {
            Origin::File(path) => Self::from_file_with(self.codec.clone(), path),
            Origin::Base64(data) => Self::from_base64_with(self.codec.clone(), data),
            Origin::Unset => Err(ImageError::NoOrigin),
        }
    }
}

impl<C: RasterCodec> fmt::Debug for ImageHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cached: Vec<FormatKind> = self.encoded_cache.keys().copied().collect();
        cached.sort_by_key(|k| k.code());
        f.debug_struct("ImageHandle")
            .field("origin", &self.origin)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mime", &self.mime)
            .field("extension", &self.extension)
            .field("size_kb", &self.size_kb)
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

fn lookup_extension(mime: &str) -> Result<&'static str> {
    extension_for_mime(mime).ok_or_else(|| ImageError::Lookup(mime.to_string()))
}

fn encode_or_empty<C: RasterCodec>(codec: &C, raster: &C::Raster, kind: FormatKind) -> Vec<u8> {
    match codec.encode_to_bytes(raster, kind) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Encoding as {kind} failed: {e}");
            Vec::new()
        }
    }
}

/// Strip a `data:<mime>;base64,` prefix, if present.
fn strip_data_uri(data: &str) -> &str {
    match data.split_once(";base64,") {
        Some((head, payload)) if head.trim_start().starts_with("data:") => payload,
        _ => data,
    }
}

/// Decode base64, ignoring embedded ASCII whitespace (line-wrapped payloads).
fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    LENIENT_BASE64
        .decode(compact)
        .map_err(|e| ImageError::Decode(format!("Invalid base64: {e}")))
}

#[cfg(unix)]
fn apply_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    // Only the write bits are meaningful off Unix.
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o222 == 0);
    std::fs::set_permissions(path, perms)
}
