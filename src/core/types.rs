//! Core types for conversion policy and batch results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::core::FileTask;
use crate::utils::{ConfigError, ImageFormat};

/// Files above this size are skipped entirely (5 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
/// Converted outputs above this size get a second, lossy pass (1 MB).
pub const DEFAULT_COMPRESSION_THRESHOLD: u64 = 1024 * 1024;
/// Quality used for the second pass.
pub const DEFAULT_COMPRESSION_QUALITY: u8 = 50;

/// Skip reason reported for files rejected by the size gate.
pub const SKIP_REASON_SIZE: &str = "exceeds size limit";

/// How one batch converts its files.
///
/// Built once per request and shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionPolicy {
    /// Output format for every file in the batch
    pub target_format: ImageFormat,
    /// Files strictly larger than this are skipped
    pub max_file_size: u64,
    /// Converted outputs strictly larger than this are recompressed
    pub compression_threshold: u64,
    /// Quality (1-100) for the recompression pass
    pub compression_quality: u8,
}

impl ConversionPolicy {
    /// Policy with the default thresholds for `target_format`.
    pub fn new(target_format: ImageFormat) -> Self {
        Self {
            target_format,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            compression_quality: DEFAULT_COMPRESSION_QUALITY,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_quality == 0 || self.compression_quality > 100 {
            return Err(ConfigError::InvalidQuality(self.compression_quality));
        }
        Ok(())
    }
}

/// Terminal classification of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Converted, output under the compression threshold
    Converted,
    /// Converted and then recompressed
    Compressed,
    /// Rejected by the size gate, never touched by the codec
    Skipped,
    /// Codec or IO failure
    Failed,
}

/// Result of processing a single [`FileTask`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutcome {
    pub file_name: String,
    pub status: OutcomeStatus,
    /// Source size in bytes
    pub original_size_bytes: u64,
    /// Final output size in bytes (converted/compressed only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_size_bytes: Option<u64>,
    /// Path of the written output (converted/compressed only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Why the file was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Error message for failed files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskOutcome {
    fn base(task: &FileTask, status: OutcomeStatus) -> Self {
        Self {
            file_name: task.file_name.clone(),
            status,
            original_size_bytes: task.size_bytes,
            result_size_bytes: None,
            output_path: None,
            reason: None,
            error: None,
        }
    }

    pub fn converted(task: &FileTask, output_path: PathBuf, size: u64) -> Self {
        Self {
            result_size_bytes: Some(size),
            output_path: Some(output_path),
            ..Self::base(task, OutcomeStatus::Converted)
        }
    }

    pub fn compressed(task: &FileTask, output_path: PathBuf, size: u64) -> Self {
        Self {
            result_size_bytes: Some(size),
            output_path: Some(output_path),
            ..Self::base(task, OutcomeStatus::Compressed)
        }
    }

    pub fn skipped(task: &FileTask, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::base(task, OutcomeStatus::Skipped)
        }
    }

    pub fn failed(task: &FileTask, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::base(task, OutcomeStatus::Failed)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Converted | OutcomeStatus::Compressed)
    }
}

/// Aggregated result of one batch.
///
/// Counts are derived from the outcomes, so the order in which files
/// complete does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub total_files: usize,
    /// Converted plus compressed
    pub succeeded: usize,
    /// Subset of `succeeded` that needed the second pass
    pub compressed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Number of groups the batch was partitioned into
    pub groups: usize,
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchResult {
    pub fn from_outcomes(groups: usize, outcomes: Vec<TaskOutcome>) -> Self {
        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
        let compressed = count(OutcomeStatus::Compressed);
        let succeeded = count(OutcomeStatus::Converted) + compressed;
        let skipped = count(OutcomeStatus::Skipped);
        let failed = count(OutcomeStatus::Failed);

        Self {
            total_files: outcomes.len(),
            succeeded,
            compressed,
            skipped,
            failed,
            groups,
            outcomes,
        }
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "Processed {} files: {} converted ({} compressed), {} skipped, {} failed",
            self.total_files, self.succeeded, self.compressed, self.skipped, self.failed
        )
    }
}
