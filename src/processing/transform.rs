//! Two-pass transform: convert, then recompress if the result is too large.
//!
//! The decision to recompress depends on the size of the first pass output,
//! so the two passes are separate codec calls. Both run on tokio's blocking
//! pool so the runtime is never stalled by an encoder.

use std::path::PathBuf;
use std::sync::Arc;
use crate::core::{ConversionPolicy, FileTask, TaskOutcome};
use crate::processing::codec::ImageCodec;
use crate::utils::{CodecError, file_size};

/// Converts files into one output directory under one policy.
///
/// Cheap to clone; every worker gets its own handle to the shared codec.
#[derive(Clone)]
pub struct Transformer {
    codec: Arc<dyn ImageCodec>,
    policy: Arc<ConversionPolicy>,
    output_dir: Arc<PathBuf>,
}

impl Transformer {
    pub fn new(codec: Arc<dyn ImageCodec>, policy: ConversionPolicy, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            codec,
            policy: Arc::new(policy),
            output_dir: Arc::new(output_dir.into()),
        }
    }

    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Where `task` will be written.
    pub fn output_path(&self, task: &FileTask) -> PathBuf {
        self.output_dir
            .join(self.policy.target_format.output_file_name(&task.file_name))
    }

    /// Processes one file. Failures are returned as a `failed` outcome.
    pub async fn transform(&self, task: FileTask) -> TaskOutcome {
        match self.run_passes(&task).await {
            Ok(outcome) => outcome,
            Err(e) => TaskOutcome::failed(&task, e),
        }
    }

    async fn run_passes(&self, task: &FileTask) -> Result<TaskOutcome, CodecError> {
        let format = self.policy.target_format;
        let output = self.output_path(task);

        // Pass 1: plain conversion
        let codec = Arc::clone(&self.codec);
        let (source, target) = (task.source_path.clone(), output.clone());
        tokio::task::spawn_blocking(move || codec.convert(&source, &target, format)).await??;

        let converted_size = file_size(&output).await?;
        if converted_size <= self.policy.compression_threshold {
            return Ok(TaskOutcome::converted(task, output, converted_size));
        }

        // Pass 2: overwrite in place at the compression quality
        let codec = Arc::clone(&self.codec);
        let quality = self.policy.compression_quality;
        let target = output.clone();
        tokio::task::spawn_blocking(move || codec.recompress(&target, format, quality)).await??;

        let final_size = file_size(&output).await?;
        Ok(TaskOutcome::compressed(task, output, final_size))
    }
}
