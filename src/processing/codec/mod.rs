//! Image codec abstraction.
//!
//! The [`ImageCodec`] trait is the only place the pipeline touches pixels. It
//! exposes the two passes of the conversion policy as separate operations:
//!
//! | Operation | Reads | Writes |
//! |---|---|---|
//! | **convert** | source file, any decodable format | output file in the target format |
//! | **recompress** | output file | same output file, lower quality |
//!
//! The production implementation is [`RustCodec`]: `image` for decoding and
//! most encoders, `webp` for lossy WebP. Both operations are blocking and are
//! driven from `spawn_blocking` by the transform stage.

mod formats;
mod rust_codec;

use std::path::Path;
use crate::utils::{CodecError, ImageFormat};

pub use rust_codec::RustCodec;

/// Trait for image codecs.
///
/// `Sync` so one instance can be shared by every in-flight worker.
pub trait ImageCodec: Send + Sync {
    /// Decode `source` and write it to `output` encoded as `format`.
    fn convert(&self, source: &Path, output: &Path, format: ImageFormat) -> Result<(), CodecError>;

    /// Re-encode `path` in place as `format` at `quality`.
    fn recompress(&self, path: &Path, format: ImageFormat, quality: u8) -> Result<(), CodecError>;
}
