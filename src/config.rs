//! Service configuration.
//!
//! Resolution order, later sources win:
//! 1. built-in defaults
//! 2. the TOML file passed with `--config`, else `./image-converter.toml` if present
//! 3. `IMAGE_CONVERTER_*` environment variables
//! 4. `--host` / `--port` on the command line (applied by `main`)

use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::core::{
    ConversionPolicy, DEFAULT_COMPRESSION_QUALITY, DEFAULT_COMPRESSION_THRESHOLD, DEFAULT_MAX_FILE_SIZE,
};
use crate::processing::BatchConfig;
use crate::utils::{ConfigError, ImageFormat};

/// Config file looked up in the working directory when none is given.
pub const LOCAL_CONFIG_FILE: &str = "image-converter.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub batch: BatchConfig,
    pub policy: PolicyConfig,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
        }
    }
}

/// Size thresholds applied to every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub max_file_size: u64,
    pub compression_threshold: u64,
    pub compression_quality: u8,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            compression_quality: DEFAULT_COMPRESSION_QUALITY,
        }
    }
}

impl PolicyConfig {
    /// Conversion policy for one request targeting `format`.
    pub fn policy_for(&self, format: ImageFormat) -> ConversionPolicy {
        ConversionPolicy {
            target_format: format,
            max_file_size: self.max_file_size,
            compression_threshold: self.compression_threshold,
            compression_quality: self.compression_quality,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy_for(ImageFormat::JPEG).validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".into())
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.batch.validate()?;
        self.policy.validate()
    }

    /// Applies `IMAGE_CONVERTER_*` overrides read through `lookup`.
    ///
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("IMAGE_CONVERTER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("IMAGE_CONVERTER_PORT") {
            self.server.port = v
                .trim()
                .parse()
                .with_context(|| format!("IMAGE_CONVERTER_PORT is not a port: {v}"))?;
        }
        if let Some(v) = var("IMAGE_CONVERTER_CONCURRENCY") {
            self.batch.concurrency_cap = v
                .trim()
                .parse()
                .with_context(|| format!("IMAGE_CONVERTER_CONCURRENCY is not a number: {v}"))?;
        }
        if let Some(v) = var("IMAGE_CONVERTER_GROUP_SIZE") {
            self.batch.group_size = v
                .trim()
                .parse()
                .with_context(|| format!("IMAGE_CONVERTER_GROUP_SIZE is not a number: {v}"))?;
        }
        Ok(())
    }
}

/// Subfolder of the downloads directory used when no output directory is given.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "upload-images";

/// Directories used when a request omits its source or output.
///
/// Resolved once at startup; `None` when the platform has no such folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryDefaults {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl DirectoryDefaults {
    /// The user's pictures folder in, `<downloads>/upload-images` out.
    pub fn platform() -> Self {
        Self {
            source: dirs::picture_dir(),
            output: dirs::download_dir().map(|d| d.join(DEFAULT_OUTPUT_SUBDIR)),
        }
    }
}

/// Parses a TOML config document.
pub fn from_toml(text: &str) -> anyhow::Result<AppConfig> {
    toml::from_str::<AppConfig>(text).context("Invalid config file")
}

/// Loads the config from `path`, or from the local config file, or defaults,
/// then applies environment overrides and validates.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    load_with(path, |key| std::env::var(key).ok())
}

/// Like [`load`], reading overrides through `lookup` instead of the process
/// environment.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let local = Path::new(LOCAL_CONFIG_FILE);
    let source = match path {
        Some(path) => Some(path),
        None if local.exists() => Some(local),
        None => None,
    };

    let mut cfg = match source {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            debug!("Loading config from {}", path.display());
            from_toml(&text)?
        }
        None => AppConfig::default(),
    };

    cfg.apply_env(lookup)?;
    cfg.validate()?;
    Ok(cfg)
}
