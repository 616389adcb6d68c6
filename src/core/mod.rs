//! Core application types and state management.
//!
//! - [`AppState`]: shared state handed to every request handler
//! - [`FileTask`]: one source file discovered by listing
//! - [`ConversionPolicy`]: how one batch converts its files
//! - [`TaskOutcome`] / [`BatchResult`]: per-file and aggregated results

mod state;
mod task;
mod types;

pub use state::AppState;
pub use task::FileTask;
pub use types::{
    BatchResult, ConversionPolicy, OutcomeStatus, TaskOutcome, DEFAULT_COMPRESSION_QUALITY,
    DEFAULT_COMPRESSION_THRESHOLD, DEFAULT_MAX_FILE_SIZE, SKIP_REASON_SIZE,
};
