//! Pure Rust raster codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Inspect (header only) | `ImageReader::with_guessed_format` + `into_decoder` |
//! | Decode file (per kind) | `ImageReader::set_format` + `decode` |
//! | Decode bytes (any) | `image::load_from_memory` |
//! | Encode PNG / GIF / BMP | `DynamicImage::write_to` |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` (configurable quality) |
//! | Resample-copy | `crop_imm` + `resize_exact` + `imageops::replace` |
//!
//! JPEG has no alpha channel, so rasters are flattened to RGB8 before JPEG
//! encoding. GIF and BMP are written from RGBA8 so 16-bit sources encode too.

use super::backend::{CodecError, ImageInfo, RasterCodec};
use super::format::{FormatKind, codes};
use super::params::{Quality, Rect, ResampleFilter};
use crate::config::CodecConfig;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufRead, BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// Raster codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCodec {
    jpeg_quality: Quality,
    filter: ResampleFilter,
}

impl RustCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            jpeg_quality: Quality::new(config.encoding.jpeg_quality),
            filter: config.resample.filter,
        }
    }

    pub fn jpeg_quality(&self) -> Quality {
        self.jpeg_quality
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    fn write_encoded<W: Write + Seek>(
        &self,
        img: &DynamicImage,
        writer: &mut W,
        kind: FormatKind,
    ) -> Result<(), CodecError> {
        let result = match kind {
            FormatKind::Png => img.write_to(writer, ImageFormat::Png),
            FormatKind::Jpeg => {
                let quality = self.jpeg_quality.value() as u8;
                let encoder = JpegEncoder::new_with_quality(writer, quality);
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
            }
            FormatKind::Gif => {
                DynamicImage::ImageRgba8(img.to_rgba8()).write_to(writer, ImageFormat::Gif)
            }
            FormatKind::Bmp => {
                DynamicImage::ImageRgba8(img.to_rgba8()).write_to(writer, ImageFormat::Bmp)
            }
        };
        result.map_err(|e| CodecError::Encode(format!("{kind} encode failed: {e}")))
    }
}

fn image_format(kind: FormatKind) -> ImageFormat {
    match kind {
        FormatKind::Png => ImageFormat::Png,
        FormatKind::Jpeg => ImageFormat::Jpeg,
        FormatKind::Gif => ImageFormat::Gif,
        FormatKind::Bmp => ImageFormat::Bmp,
    }
}

/// Raw image-type code for a detected container format.
fn format_code(format: ImageFormat) -> u32 {
    match format {
        ImageFormat::Gif => codes::GIF,
        ImageFormat::Jpeg => codes::JPEG,
        ImageFormat::Png => codes::PNG,
        ImageFormat::Bmp => codes::BMP,
        ImageFormat::Tiff => codes::TIFF,
        ImageFormat::Ico => codes::ICO,
        ImageFormat::WebP => codes::WEBP,
        ImageFormat::Avif => codes::AVIF,
        _ => codes::UNKNOWN,
    }
}

/// MIME type for a detected format. ICO uses the registered IANA type so
/// it matches the extension table.
fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Ico => "image/vnd.microsoft.icon",
        other => other.to_mime_type(),
    }
}

fn bits_per_channel(color: ColorType) -> u8 {
    let channels = u16::from(color.channel_count().max(1));
    (color.bits_per_pixel() / channels) as u8
}

fn decode_error(err: image::ImageError) -> CodecError {
    match err {
        image::ImageError::IoError(io) => CodecError::Io(io),
        other => CodecError::Decode(other.to_string()),
    }
}

/// Read dimensions and color type from a reader without decoding pixels.
fn describe<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<ImageInfo, CodecError> {
    let format = reader
        .format()
        .ok_or_else(|| CodecError::Decode("Unrecognized image format".to_string()))?;
    let decoder = reader.into_decoder().map_err(decode_error)?;
    let (width, height) = decoder.dimensions();
    Ok(ImageInfo {
        width,
        height,
        format_code: format_code(format),
        bits: bits_per_channel(decoder.color_type()),
        mime: mime_for(format).to_string(),
    })
}

impl RasterCodec for RustCodec {
    type Raster = DynamicImage;

    fn inspect_file(&self, path: &Path) -> Result<ImageInfo, CodecError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        describe(reader)
    }

    fn inspect_bytes(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        describe(reader)
    }

    fn decode_file(&self, path: &Path, kind: FormatKind) -> Result<DynamicImage, CodecError> {
        log::debug!("Decoding {} as {kind}", path.display());
        let mut reader = ImageReader::open(path)?;
        reader.set_format(image_format(kind));
        reader.decode().map_err(decode_error)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        log::debug!("Decoding {} bytes", bytes.len());
        image::load_from_memory(bytes).map_err(decode_error)
    }

    fn encode_to_bytes(
        &self,
        raster: &DynamicImage,
        kind: FormatKind,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_encoded(raster, &mut buffer, kind)?;
        Ok(buffer.into_inner())
    }

    fn encode_to_file(
        &self,
        raster: &DynamicImage,
        path: &Path,
        kind: FormatKind,
    ) -> Result<(), CodecError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let written = self
            .write_encoded(raster, &mut writer, kind)
            .and_then(|()| writer.flush().map_err(CodecError::from));
        if written.is_err() {
            drop(writer);
            if let Err(e) = std::fs::remove_file(path) {
                log::debug!("Could not remove partial {}: {e}", path.display());
            }
        }
        written
    }

    fn allocate_true_color(&self, width: u32, height: u32) -> Result<DynamicImage, CodecError> {
        if rgba_buffer_len(width, height).is_none() {
            return Err(CodecError::Allocate { width, height });
        }
        Ok(DynamicImage::new_rgba8(width, height))
    }

    fn resample_copy(
        &self,
        dst: &mut DynamicImage,
        src: &DynamicImage,
        dst_rect: Rect,
        src_rect: Rect,
    ) {
        if dst_rect.is_empty() || src_rect.is_empty() {
            return;
        }
        let region = src.crop_imm(src_rect.x, src_rect.y, src_rect.width, src_rect.height);
        let scaled = region.resize_exact(dst_rect.width, dst_rect.height, self.filter.into());

        let mut canvas = dst.to_rgba8();
        image::imageops::replace(
            &mut canvas,
            &scaled.to_rgba8(),
            i64::from(dst_rect.x),
            i64::from(dst_rect.y),
        );
        *dst = DynamicImage::ImageRgba8(canvas);
    }

    fn dimensions(&self, raster: &DynamicImage) -> (u32, u32) {
        (raster.width(), raster.height())
    }
}

/// Byte length of an RGBA8 buffer, if it is addressable.
fn rgba_buffer_len(width: u32, height: u32) -> Option<usize> {
    let len = u64::from(width)
        .checked_mul(u64::from(height))?
        .checked_mul(4)?;
    let len = usize::try_from(len).ok()?;
    (len <= isize::MAX as usize).then_some(len)
}
