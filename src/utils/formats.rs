use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    JPEG,
    PNG,
    WebP,
    GIF,
    AVIF,
    TIFF,
}

/// Formats accepted by the `/convert-all` endpoint.
///
/// TIFF is a valid conversion target for the pipeline but is not offered over HTTP.
pub const REQUEST_FORMATS: [ImageFormat; 5] = [
    ImageFormat::JPEG,
    ImageFormat::PNG,
    ImageFormat::WebP,
    ImageFormat::GIF,
    ImageFormat::AVIF,
];

impl ImageFormat {
    /// Canonical lowercase name, also used as the output file extension
    pub fn name(&self) -> &'static str {
        match self {
            Self::JPEG => "jpeg",
            Self::PNG => "png",
            Self::WebP => "webp",
            Self::GIF => "gif",
            Self::AVIF => "avif",
            Self::TIFF => "tiff",
        }
    }

    /// Quality used for the first conversion pass
    pub fn default_quality(&self) -> u8 {
        match self {
            Self::JPEG => 90,
            Self::PNG => 100,  // lossless
            Self::WebP => 90,
            Self::GIF => 100,
            Self::AVIF => 90,
            Self::TIFF => 100, // lossless
        }
    }

    /// Output file name for a source file: `<stem>.<format name>`
    pub fn output_file_name(&self, source_file_name: &str) -> String {
        let stem = std::path::Path::new(source_file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(source_file_name);
        format!("{stem}.{}", self.name())
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::GIF),
            "avif" => Ok(Self::AVIF),
            "tif" | "tiff" => Ok(Self::TIFF),
            _ => Err(unsupported(name)),
        }
    }
}

/// Parses a format requested over HTTP, restricted to [`REQUEST_FORMATS`].
pub fn parse_request_format(requested: &str) -> Result<ImageFormat, ConfigError> {
    match requested.parse::<ImageFormat>() {
        Ok(format) if REQUEST_FORMATS.contains(&format) => Ok(format),
        _ => Err(unsupported(requested.trim().to_lowercase())),
    }
}

fn unsupported(requested: String) -> ConfigError {
    ConfigError::UnsupportedFormat {
        requested,
        supported: REQUEST_FORMATS.iter().map(|f| f.name()).collect(),
    }
}
