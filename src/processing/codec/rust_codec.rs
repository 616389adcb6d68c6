//! Production codec: `image` decoders plus the encoders in [`super::formats`].

use std::path::Path;
use image::{DynamicImage, ImageReader};
use tracing::debug;
use crate::utils::{CodecError, ImageFormat};

use super::ImageCodec;
use super::formats::encode;

/// Pure-Rust decode, format-specific encode. Stateless, so one instance is
/// shared by every worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Decodes by content sniffing, falling back to the file extension.
fn decode(path: &Path) -> Result<DynamicImage, CodecError> {
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| CodecError::decode(format!("Failed to load '{}': {e}", path.display())))?;

    debug!(
        "Loaded '{}': {}×{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        image.width(),
        image.height()
    );
    Ok(image)
}

impl ImageCodec for RustCodec {
    fn convert(&self, source: &Path, output: &Path, format: ImageFormat) -> Result<(), CodecError> {
        let image = decode(source)?;
        let bytes = encode(&image, format, format.default_quality())?;
        std::fs::write(output, bytes)?;
        Ok(())
    }

    fn recompress(&self, path: &Path, format: ImageFormat, quality: u8) -> Result<(), CodecError> {
        let image = decode(path)?;
        let bytes = encode(&image, format, quality)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
