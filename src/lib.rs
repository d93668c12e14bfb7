//! # Simple Image
//!
//! A small image handle over the `image` crate. Load a picture from a file
//! or a base64 string, read its metadata, rescale it, and write it back out
//! as PNG, JPEG, GIF or BMP, or as a PNG data URI.
//!
//! ```no_run
//! use simple_image::{FormatKind, ImageHandle};
//!
//! # fn main() -> Result<(), simple_image::ImageError> {
//! let mut image = ImageHandle::from_file("photos/dawn.jpg")?;
//! println!("{}x{} {} ({} KB)", image.width(), image.height(), image.mime(), image.size_kb());
//!
//! image.rescale_by_percent(50)?;
//! let name = image.save_as(FormatKind::Png, "out", "dawn-half", Some(0o644))?;
//! assert_eq!(name, "dawn-half.png");
//!
//! let uri = image.to_data_uri();
//! let copy = ImageHandle::from_base64(&uri)?;
//! assert_eq!(copy.width(), image.width());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`handle`] | [`ImageHandle`]: construction, rescale, encode cache, save, reopen |
//! | [`imaging`] | [`RasterCodec`](imaging::RasterCodec) trait, the `image`-backed [`RustCodec`](imaging::RustCodec), dimension math |
//! | [`mime`] | MIME type → file extension table |
//! | [`config`] | TOML codec settings (JPEG quality, resample filter) |
//!
//! # Design Decisions
//!
//! ## Injected Codec
//!
//! The handle never touches pixels. Every decode, encode and resample goes
//! through the [`RasterCodec`](imaging::RasterCodec) trait, so handle logic
//! (caching, metadata, error mapping) is unit tested against a recording mock
//! and the `image` crate is exercised separately.
//!
//! ## Closed Format Set
//!
//! Output formats are the [`FormatKind`] enum. File decoding dispatches on it
//! explicitly; anything the codec identifies outside the four kinds (TIFF,
//! ICO, WebP) is rejected with [`ImageError::UnsupportedFormat`] instead of
//! being half-supported.
//!
//! ## Metadata Belongs to the Source
//!
//! MIME type, extension, color depth and size describe what was loaded. They
//! are read once and survive rescaling untouched; only the raster and its
//! dimensions change.
//!
//! ## Failure Signalling
//!
//! Construction is all-or-nothing and returns [`ImageError`]. In-memory
//! encoding ([`ImageHandle::get_encoded_bytes`], [`ImageHandle::to_data_uri`])
//! signals failure with an empty result, logged at `warn`, so callers check
//! for emptiness. Writing to disk returns a `Result`.

pub mod config;
pub mod handle;
pub mod imaging;
pub mod mime;

pub use handle::{ImageError, ImageHandle, Origin, PNG_DATA_URI_PREFIX};
pub use imaging::{FormatKind, RustCodec};
