//! End-to-end tests for `ImageHandle` with the real `image`-backed codec.
//!
//! Every fixture is synthesized into a temp directory, so the suite needs no
//! checked-in image files.

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use simple_image::config::CodecConfig;
use simple_image::imaging::{ResampleFilter, codes};
use simple_image::{FormatKind, ImageError, ImageHandle, Origin, PNG_DATA_URI_PREFIX, RustCodec};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    }))
}

/// Write a synthetic image in `format` and return its path.
fn write_fixture(dir: &Path, name: &str, format: ImageFormat, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = gradient(width, height);
    match format {
        // GIF and BMP encoders take RGBA.
        ImageFormat::Gif | ImageFormat::Bmp => {
            DynamicImage::ImageRgba8(img.to_rgba8()).save_with_format(&path, format)
        }
        _ => img.save_with_format(&path, format),
    }
    .unwrap();
    path
}

#[test]
fn file_round_trip_preserves_dimensions_for_every_format() {
    let tmp = TempDir::new().unwrap();
    let fixtures = [
        ("in.png", ImageFormat::Png, FormatKind::Png),
        ("in.jpg", ImageFormat::Jpeg, FormatKind::Jpeg),
        ("in.gif", ImageFormat::Gif, FormatKind::Gif),
        ("in.bmp", ImageFormat::Bmp, FormatKind::Bmp),
    ];

    for (name, format, kind) in fixtures {
        let path = write_fixture(tmp.path(), name, format, 64, 40);
        let mut handle = ImageHandle::from_file(&path).unwrap();

        assert_eq!(handle.format_code(), kind.code(), "{name}");
        assert_eq!(handle.mime(), kind.mime(), "{name}");
        assert_eq!(handle.extension(), kind.extension(), "{name}");
        assert_eq!(handle.bits(), 8, "{name}");

        let bytes = handle.get_encoded_bytes(kind, false).to_vec();
        assert!(!bytes.is_empty(), "{name}");

        let reloaded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (64, 40), "{name}");
    }
}

#[test]
fn file_size_is_kilobytes_to_two_decimals() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "in.bmp", ImageFormat::Bmp, 50, 50);
    let len = std::fs::metadata(&path).unwrap().len() as f64;

    let handle = ImageHandle::from_file(&path).unwrap();
    assert_eq!(handle.size_kb(), (len / 1024.0 * 100.0).round() / 100.0);
}

#[test]
fn rescale_by_half_then_save() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "wide.png", ImageFormat::Png, 200, 100);

    let mut handle = ImageHandle::from_file(&path).unwrap();
    handle.rescale_by_percent(50).unwrap();
    assert_eq!((handle.width(), handle.height()), (100, 50));

    let name = handle
        .save_as(FormatKind::Jpeg, tmp.path(), "half", None)
        .unwrap();
    assert_eq!(name, "half.jpeg");

    let saved = image::open(tmp.path().join("half.jpeg")).unwrap();
    assert_eq!((saved.width(), saved.height()), (100, 50));
}

#[test]
fn rescale_by_hundred_is_identity_on_dimensions() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "odd.png", ImageFormat::Png, 37, 23);

    let mut handle = ImageHandle::from_file(&path).unwrap();
    handle.rescale_by_percent(100).unwrap();
    assert_eq!((handle.width(), handle.height()), (37, 23));
}

#[test]
fn oversized_rescale_is_rejected_not_panicking() {
    let mut handle =
        ImageHandle::from_raster_with(RustCodec::new(), gradient(200, 100), FormatKind::Png);

    let result = handle.rescale_by_percent(u32::MAX);
    assert!(matches!(result, Err(ImageError::InvalidArgument(_))));

    let result = handle.resize_exact(u32::MAX, u32::MAX);
    assert!(matches!(result, Err(ImageError::InvalidArgument(_))));

    assert_eq!((handle.width(), handle.height()), (200, 100));
    assert!(!handle.get_encoded_bytes(FormatKind::Png, false).is_empty());
}

#[test]
fn refused_save_leaves_no_file() {
    let tmp = TempDir::new().unwrap();
    let handle = ImageHandle::from_raster_with(
        RustCodec::new(),
        gradient(u32::from(u16::MAX) + 1, 1),
        FormatKind::Png,
    );

    let result = handle.save_gif(tmp.path(), "banner");
    assert!(matches!(result, Err(ImageError::Encode(_))));
    assert!(!tmp.path().join("banner.gif").exists());
}

#[test]
fn save_name_ignores_detected_extension() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "photo.jpg", ImageFormat::Jpeg, 20, 20);
    let handle = ImageHandle::from_file(&path).unwrap();
    assert_eq!(handle.extension(), "jpeg");

    for kind in FormatKind::ALL {
        let name = handle.save_as(kind, tmp.path(), "export", None).unwrap();
        assert_eq!(name, format!("export.{}", kind.extension()));
        assert!(tmp.path().join(&name).exists());
    }
}

#[test]
fn save_into_missing_directory_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "in.png", ImageFormat::Png, 4, 4);
    let handle = ImageHandle::from_file(&path).unwrap();

    let result = handle.save_png(tmp.path().join("does-not-exist"), "out");
    assert!(matches!(result, Err(ImageError::Io(_))));
}

#[test]
fn data_uri_round_trips_through_from_base64() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "in.gif", ImageFormat::Gif, 30, 12);
    let handle = ImageHandle::from_file(&path).unwrap();

    let uri = handle.to_data_uri();
    assert!(uri.starts_with(PNG_DATA_URI_PREFIX));

    // Re-encoded as PNG regardless of the GIF source.
    let copy = ImageHandle::from_base64(&uri).unwrap();
    assert_eq!((copy.width(), copy.height()), (30, 12));
    assert_eq!(copy.mime(), "image/png");
    assert_eq!(copy.extension(), "png");
}

#[test]
fn base64_size_is_estimated_from_string_length() {
    let mut png = Vec::new();
    gradient(40, 40)
        .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    let encoded = general_purpose::STANDARD.encode(&png);
    let input = format!("{encoded}\r\n");

    let handle = ImageHandle::from_base64(&input).unwrap();

    let expected = (encoded.len() as f64 * 0.75 / 1024.0 * 100.0).round() / 100.0;
    assert_eq!(handle.size_kb(), expected);
    assert_eq!((handle.width(), handle.height()), (40, 40));
    assert_eq!(handle.origin(), &Origin::Base64(input.clone()));
}

#[test]
fn base64_garbage_is_decode_error() {
    let not_an_image = general_purpose::STANDARD.encode(b"just some text, no pixels");
    let result = ImageHandle::from_base64(&not_an_image);
    assert!(matches!(result, Err(ImageError::Decode(_))));
}

#[test]
fn tiff_file_is_unsupported_for_file_decode() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "scan.tif", ImageFormat::Tiff, 16, 16);

    let result = ImageHandle::from_file(&path);
    assert!(matches!(result, Err(ImageError::UnsupportedFormat(codes::TIFF))));
}

#[test]
fn tiff_base64_decodes_generically() {
    let mut tiff = Vec::new();
    gradient(16, 8)
        .write_to(&mut std::io::Cursor::new(&mut tiff), ImageFormat::Tiff)
        .unwrap();

    let handle = ImageHandle::from_base64(&general_purpose::STANDARD.encode(&tiff)).unwrap();
    assert_eq!(handle.format_code(), codes::TIFF);
    assert_eq!(handle.extension(), "tiff");
    assert_eq!((handle.width(), handle.height()), (16, 8));
}

#[test]
fn webp_base64_has_no_extension_mapping() {
    let mut webp = Vec::new();
    DynamicImage::ImageRgba8(gradient(8, 8).to_rgba8())
        .write_to(&mut std::io::Cursor::new(&mut webp), ImageFormat::WebP)
        .unwrap();

    let result = ImageHandle::from_base64(&general_purpose::STANDARD.encode(&webp));
    assert!(matches!(result, Err(ImageError::Lookup(m)) if m == "image/webp"));
}

#[test]
fn reopen_matches_fresh_load_and_drops_cache() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "in.png", ImageFormat::Png, 80, 60);

    let mut handle = ImageHandle::from_file(&path).unwrap();
    let original_png = handle.get_encoded_bytes(FormatKind::Png, false).to_vec();
    handle.rescale_by_percent(50).unwrap();

    let reopened = handle.reopen().unwrap();
    let fresh = ImageHandle::from_file(&path).unwrap();

    assert_eq!(
        (reopened.width(), reopened.height(), reopened.mime()),
        (fresh.width(), fresh.height(), fresh.mime())
    );
    assert_eq!((reopened.width(), reopened.height()), (80, 60));
    assert!(format!("{reopened:?}").contains("cached: []"));

    // The rescaled handle still serves the pre-rescale bytes from its cache.
    assert_eq!(handle.get_encoded_bytes(FormatKind::Png, false), &original_png[..]);
    let refreshed = handle.get_encoded_bytes(FormatKind::Png, true).to_vec();
    let decoded = image::load_from_memory(&refreshed).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
}

#[test]
fn wrapped_raster_cannot_reopen() {
    let handle = ImageHandle::from_raster_with(RustCodec::new(), gradient(6, 3), FormatKind::Gif);
    assert_eq!((handle.width(), handle.height()), (6, 3));
    assert_eq!(handle.origin(), &Origin::Unset);
    assert!(matches!(handle.reopen(), Err(ImageError::NoOrigin)));
}

#[test]
fn configured_codec_drives_rescale() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path(), "in.png", ImageFormat::Png, 90, 30);

    let mut config = CodecConfig::default();
    config.resample.filter = ResampleFilter::Lanczos3;
    config.encoding.jpeg_quality = 30;
    let codec = RustCodec::from_config(&config);

    let mut handle = ImageHandle::from_file_with(codec, &path).unwrap();
    handle.rescale_by_percent(200).unwrap();
    assert_eq!((handle.width(), handle.height()), (180, 60));
    assert_eq!(handle.codec().filter(), ResampleFilter::Lanczos3);
    assert!(!handle.get_encoded_bytes(FormatKind::Jpeg, false).is_empty());
}
