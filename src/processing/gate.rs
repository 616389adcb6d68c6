//! Size gate applied before any codec work is scheduled.

use tracing::info;
use crate::core::{ConversionPolicy, FileTask, SKIP_REASON_SIZE};
use crate::utils::bytes_to_mb;

/// Verdict of the size gate for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Skipped(&'static str),
}

/// Admits `task` when its size is within `policy.max_file_size`.
///
/// Uses the size recorded at listing time, so this never touches the disk and
/// never holds a concurrency slot.
pub fn admit(task: &FileTask, policy: &ConversionPolicy) -> Admission {
    if task.size_bytes <= policy.max_file_size {
        return Admission::Admitted;
    }

    info!(
        "Skipping {} (size: {:.2} MB) - exceeds {:.2} MB",
        task.file_name,
        bytes_to_mb(task.size_bytes),
        bytes_to_mb(policy.max_file_size)
    );
    Admission::Skipped(SKIP_REASON_SIZE)
}
