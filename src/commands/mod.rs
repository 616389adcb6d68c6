//! HTTP request handlers.
//!
//! - [`convert_all`]: convert every file in a directory
//! - [`health`]: liveness check

mod convert;
mod error;
mod health;

pub use convert::{ConvertRequest, ConvertResponse, convert_all, resolve_directories};
pub use error::ApiError;
pub use health::{HealthResponse, health, version};
