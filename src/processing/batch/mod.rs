//! Batch orchestration: partition, gate and run a directory's files.

mod config;
mod partition;
mod processor;

pub use config::{BatchConfig, ConcurrencyScope};
pub use partition::{BatchGroup, partition};
pub use processor::{BatchPhase, BatchProcessor};
