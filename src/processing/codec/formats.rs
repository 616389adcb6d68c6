//! Maps a target format and quality onto format-specific encoder settings.
//!
//! Every encoder writes into memory; the caller decides where the bytes go.

use std::io::Cursor;
use image::codecs::avif::AvifEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::tiff::TiffEncoder;
use image::{DynamicImage, ExtendedColorType, Frame, ImageEncoder};
use crate::utils::{CodecError, ImageFormat};

type Result<T> = std::result::Result<T, CodecError>;

// ── Encoder tuning ────────────────────────────────────────────────────────────────────

/// ravif speed, 1 (slowest) to 10 (fastest)
const AVIF_SPEED: u8 = 6;
/// Quality at or above which PNG is written with default (fast) compression
const PNG_FAST_QUALITY: u8 = 90;

/// Encodes `image` as `format` at `quality` (1-100).
///
/// Lossless formats interpret quality as an effort hint: PNG switches to best
/// compression below [`PNG_FAST_QUALITY`], GIF quantizes more carefully at
/// higher quality. TIFF ignores it.
pub fn encode(image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let quality = quality.clamp(1, 100);
    match format {
        ImageFormat::JPEG => encode_jpeg(image, quality),
        ImageFormat::PNG => encode_png(image, quality),
        ImageFormat::WebP => encode_webp(image, quality),
        ImageFormat::GIF => encode_gif(image, quality),
        ImageFormat::AVIF => encode_avif(image, quality),
        ImageFormat::TIFF => encode_tiff(image),
    }
}

/// JPEG has no alpha channel, so the image is flattened to RGB first.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_png(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let compression = if quality >= PNG_FAST_QUALITY {
        CompressionType::Default
    } else {
        CompressionType::Best
    };
    let rgba = image.to_rgba8();
    let mut buf = Vec::new();
    PngEncoder::new_with_quality(&mut buf, compression, FilterType::Adaptive)
        .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
        .map_err(|e| CodecError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

/// Lossy WebP through libwebp; the `image` crate only writes lossless WebP.
fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());

    let mut config = webp::WebPConfig::new()
        .map_err(|_| CodecError::encode("failed to create WebPConfig"))?;
    config.quality = quality as f32;
    config.method = 4;

    let mem = encoder
        .encode_advanced(&config)
        .map_err(|e| CodecError::encode(format!("WebP encode failed: {e:?}")))?;
    Ok(mem.to_vec())
}

/// GIF encoder speed runs 1 (best palette) to 30 (fastest).
fn encode_gif(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let speed = 30 - (quality as i32 * 29 / 100);
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut buf, speed.clamp(1, 30));
        encoder
            .encode_frame(Frame::new(image.to_rgba8()))
            .map_err(|e| CodecError::encode(format!("GIF encode failed: {e}")))?;
    }
    Ok(buf)
}

fn encode_avif(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let mut buf = Vec::new();
    AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality)
        .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
        .map_err(|e| CodecError::encode(format!("AVIF encode failed: {e}")))?;
    Ok(buf)
}

fn encode_tiff(image: &DynamicImage) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let mut cursor = Cursor::new(Vec::new());
    TiffEncoder::new(&mut cursor)
        .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
        .map_err(|e| CodecError::encode(format!("TIFF encode failed: {e}")))?;
    Ok(cursor.into_inner())
}
