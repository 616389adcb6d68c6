pub mod error;
pub mod formats;
pub mod fs;

pub use error::{CodecError, ConfigError, ConverterError, ConverterResult, SetupError};
pub use formats::{ImageFormat, REQUEST_FORMATS, parse_request_format};
pub use fs::{bytes_to_mb, ensure_dir, file_size, list_files};
