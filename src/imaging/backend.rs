//! Raster codec trait and shared types.
//!
//! The [`RasterCodec`] trait is the seam between [`ImageHandle`](crate::ImageHandle)
//! and the library that actually decodes, encodes and resamples pixels. The
//! handle never touches pixel data itself; it sequences codec calls and keeps
//! the metadata and encode cache.
//!
//! The production implementation is [`RustCodec`](super::rust_backend::RustCodec),
//! built on the `image` crate. Tests swap in the recording
//! [`MockCodec`](tests::MockCodec) so handle logic runs without real images.

use super::format::FormatKind;
use super::params::Rect;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Cannot allocate {width}x{height} raster")]
    Allocate { width: u32, height: u32 },
}

/// Result of inspecting an image header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Raw image-type code, see [`codes`](super::format::codes).
    pub format_code: u32,
    /// Bits per channel.
    pub bits: u8,
    pub mime: String,
}

/// Decode, encode and resample primitives.
///
/// `Raster` is the codec's in-memory bitmap. A handle owns exactly one and
/// only ever hands it back to the same codec.
pub trait RasterCodec {
    type Raster;

    /// Read the header of a file: dimensions, format code, depth, MIME type.
    fn inspect_file(&self, path: &Path) -> Result<ImageInfo, CodecError>;

    /// Same as [`inspect_file`](Self::inspect_file) for in-memory bytes.
    fn inspect_bytes(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError>;

    /// Decode a file with the decoder for `kind`.
    fn decode_file(&self, path: &Path, kind: FormatKind) -> Result<Self::Raster, CodecError>;

    /// Decode bytes of any format the codec understands.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<Self::Raster, CodecError>;

    fn encode_to_bytes(
        &self,
        raster: &Self::Raster,
        kind: FormatKind,
    ) -> Result<Vec<u8>, CodecError>;

    fn encode_to_file(
        &self,
        raster: &Self::Raster,
        path: &Path,
        kind: FormatKind,
    ) -> Result<(), CodecError>;

    /// Allocate a blank true-color raster.
    ///
    /// Fails with [`CodecError::Allocate`] when the pixel buffer would not
    /// fit in memory addressing.
    fn allocate_true_color(&self, width: u32, height: u32) -> Result<Self::Raster, CodecError>;

    /// Smoothly scale `src_rect` of `src` into `dst_rect` of `dst`.
    fn resample_copy(
        &self,
        dst: &mut Self::Raster,
        src: &Self::Raster,
        dst_rect: Rect,
        src_rect: Rect,
    );

    /// Current `(width, height)` of a raster.
    fn dimensions(&self, raster: &Self::Raster) -> (u32, u32);
}
