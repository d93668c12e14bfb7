//! Raster codec layer: pure Rust, backed by the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Inspect** | `ImageReader::into_decoder` (header only) |
//! | **Decode** | per-kind `ImageReader` or `load_from_memory` |
//! | **Encode** | PNG / JPEG / GIF / BMP encoders from `image::codecs` |
//! | **Resample** | `resize_exact` with a configurable smooth filter |
//!
//! The module is split into:
//! - **Format**: [`FormatKind`] and raw image-type [`codes`]
//! - **Calculations**: Pure functions for dimension and size math (unit testable)
//! - **Parameters**: Quality, filter and rectangle types
//! - **Backend**: [`RasterCodec`] trait + [`RustCodec`]

pub mod backend;
mod calculations;
pub mod format;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, ImageInfo, RasterCodec};
pub use calculations::{base64_size_kb, file_size_kb, round_to_hundredths, scaled_dimensions};
pub use format::{FormatKind, codes};
pub use params::{Quality, Rect, ResampleFilter};
pub use rust_backend::RustCodec;
