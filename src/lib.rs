// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod worker;
pub mod processing;
pub mod config;
pub mod commands;
pub mod server;

// Public exports for external consumers
pub use crate::core::{AppState, BatchResult, ConversionPolicy, FileTask, OutcomeStatus, TaskOutcome};
pub use crate::processing::{BatchProcessor, ImageCodec, RustCodec};
pub use crate::utils::{ConverterError, ConverterResult, ImageFormat};
pub use crate::commands::version;

// The binary entry point is in main.rs; this file is the public API.
