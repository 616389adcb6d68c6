//! Application state shared by the HTTP handlers.

use std::sync::Arc;
use tracing::debug;
use crate::config::{AppConfig, DirectoryDefaults};
use crate::processing::{BatchProcessor, ImageCodec, RustCodec};
use crate::utils::ConfigError;

/// State cloned into every request.
///
/// Holds configuration only; each request builds its own batch and worker
/// pools, so concurrent requests never share a concurrency cap.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    codec: Arc<dyn ImageCodec>,
    processor: Arc<BatchProcessor>,
    directories: Arc<DirectoryDefaults>,
}

impl AppState {
    /// State backed by the production codec.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        Self::with_codec(config, Arc::new(RustCodec::new()))
    }

    pub fn with_codec(config: AppConfig, codec: Arc<dyn ImageCodec>) -> Result<Self, ConfigError> {
        let processor = BatchProcessor::new(config.batch.clone())?;
        config.policy.validate()?;
        debug!("AppState initialized");

        Ok(Self {
            config: Arc::new(config),
            codec,
            processor: Arc::new(processor),
            directories: Arc::new(DirectoryDefaults::platform()),
        })
    }

    /// Replaces the platform default directories.
    pub fn with_directories(mut self, directories: DirectoryDefaults) -> Self {
        self.directories = Arc::new(directories);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn codec(&self) -> Arc<dyn ImageCodec> {
        Arc::clone(&self.codec)
    }

    pub fn processor(&self) -> &BatchProcessor {
        &self.processor
    }

    pub fn directories(&self) -> &DirectoryDefaults {
        &self.directories
    }
}
