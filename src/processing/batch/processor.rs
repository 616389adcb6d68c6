use std::path::Path;
use std::sync::Arc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use crate::core::{BatchResult, ConversionPolicy, FileTask, OutcomeStatus, TaskOutcome};
use crate::processing::codec::ImageCodec;
use crate::processing::gate::{Admission, admit};
use crate::processing::transform::Transformer;
use crate::utils::{
    CodecError, ConfigError, ConverterResult, SetupError, bytes_to_mb, ensure_dir, list_files,
};
use crate::worker::WorkerPool;

use super::config::{BatchConfig, ConcurrencyScope};
use super::partition::partition;

/// Lifecycle of one batch.
///
/// `Failed` is only reachable before any file work starts; per-file failures
/// never change the batch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Pending,
    Listing,
    Partitioning,
    Executing,
    Aggregated,
    Failed,
}

fn advance(phase: &mut BatchPhase, next: BatchPhase) {
    debug!("Batch phase: {:?} -> {:?}", phase, next);
    *phase = next;
}

/// Drives a batch through partitioning, gating and bounded execution.
///
/// Holds only configuration, so one processor can serve concurrent requests;
/// every call to [`run`](Self::run) creates its own worker pools.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "Creating BatchProcessor: group size {}, concurrency cap {} ({:?})",
            config.group_size, config.concurrency_cap, config.scope
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Converts every regular file in `source_dir` into `output_dir`.
    ///
    /// The output directory is only created once the source is known to hold
    /// at least one file.
    pub async fn run_directory(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        codec: Arc<dyn ImageCodec>,
        policy: ConversionPolicy,
    ) -> ConverterResult<BatchResult> {
        let mut phase = BatchPhase::Pending;
        policy.validate()?;

        advance(&mut phase, BatchPhase::Listing);
        let files = match prepare(source_dir, output_dir).await {
            Ok(files) => files,
            Err(e) => {
                advance(&mut phase, BatchPhase::Failed);
                return Err(e.into());
            }
        };

        info!(
            "Converting {} files from {} to {} as {}",
            files.len(),
            source_dir.display(),
            output_dir.display(),
            policy.target_format
        );

        let transformer = Transformer::new(codec, policy, output_dir);
        self.execute(files, transformer, phase).await
    }

    /// Runs already-listed files through the pipeline.
    ///
    /// Once called, the batch runs to completion even if the returned future
    /// is dropped: every admitted file still reaches the codec.
    pub async fn run(&self, files: Vec<FileTask>, transformer: Transformer) -> ConverterResult<BatchResult> {
        self.execute(files, transformer, BatchPhase::Pending).await
    }

    async fn execute(
        &self,
        files: Vec<FileTask>,
        transformer: Transformer,
        phase: BatchPhase,
    ) -> ConverterResult<BatchResult> {
        // Detached from the caller so a dropped request cannot strand queued files
        let batch = tokio::spawn(drive(self.config.clone(), files, transformer, phase));
        batch.await.map_err(CodecError::from)?
    }
}

/// Partitions, gates and executes one batch, then aggregates the outcomes.
async fn drive(
    config: BatchConfig,
    files: Vec<FileTask>,
    transformer: Transformer,
    mut phase: BatchPhase,
) -> ConverterResult<BatchResult> {
    let total_files = files.len();

    advance(&mut phase, BatchPhase::Partitioning);
    let groups = partition(files, config.group_size)?;
    let group_count = groups.len();
    let shared_pool = WorkerPool::new(config.concurrency_cap)?;
    info!(
        "Processing batch of {} files in {} groups of up to {}",
        total_files, group_count, config.group_size
    );

    advance(&mut phase, BatchPhase::Executing);
    let mut outcomes = Vec::with_capacity(total_files);
    let mut group_runs = Vec::with_capacity(group_count);

    for (index, group) in groups.into_iter().enumerate() {
        debug!(
            "Group {}/{}: {}",
            index + 1,
            group_count,
            group.iter().map(|t| t.file_name.as_str()).collect::<Vec<_>>().join(", ")
        );

        // Gate before scheduling so skipped files never hold a slot
        let mut admitted = Vec::with_capacity(group.len());
        for task in group {
            match admit(&task, transformer.policy()) {
                Admission::Admitted => admitted.push(task),
                Admission::Skipped(reason) => outcomes.push(TaskOutcome::skipped(&task, reason)),
            }
        }

        let pool = match config.scope {
            ConcurrencyScope::Global => shared_pool.clone(),
            ConcurrencyScope::PerGroup => WorkerPool::new(config.concurrency_cap)?,
        };
        let transformer = transformer.clone();

        group_runs.push(async move {
            let results = pool
                .run_all(admitted, move |task| {
                    let transformer = transformer.clone();
                    async move {
                        let outcome = transformer.transform(task).await;
                        log_outcome(&outcome);
                        outcome
                    }
                })
                .await;
            debug!("Group {}/{} complete", index + 1, group_count);
            results
        });
    }

    for results in join_all(group_runs).await {
        outcomes.extend(results);
    }

    advance(&mut phase, BatchPhase::Aggregated);
    let result = BatchResult::from_outcomes(group_count, outcomes);

    if result.failed > 0 {
        warn!(
            "Batch completed with {} failed files out of {}",
            result.failed, result.total_files
        );
    }
    info!("{}", result.summary());

    Ok(result)
}

/// Lists the source and creates the output directory, in that order.
async fn prepare(source_dir: &Path, output_dir: &Path) -> Result<Vec<FileTask>, SetupError> {
    let files = list_files(source_dir).await?;
    if files.is_empty() {
        return Err(SetupError::NoFiles(source_dir.to_path_buf()));
    }
    ensure_dir(output_dir).await?;
    Ok(files)
}

/// Logs one outcome as it completes.
fn log_outcome(outcome: &TaskOutcome) {
    let size_mb = bytes_to_mb(outcome.result_size_bytes.unwrap_or_default());
    match outcome.status {
        OutcomeStatus::Converted => info!(
            "Converted {} (size: {:.2} MB) - no compression needed",
            outcome.file_name, size_mb
        ),
        OutcomeStatus::Compressed => info!(
            "Compressed and saved {} (final size: {:.2} MB)",
            outcome.file_name, size_mb
        ),
        OutcomeStatus::Failed => warn!(
            "Failed to convert {}: {}",
            outcome.file_name,
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
        OutcomeStatus::Skipped => {}
    }
}
