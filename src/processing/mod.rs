pub mod batch;
pub mod codec;
pub mod gate;
pub mod transform;

pub use batch::{BatchConfig, BatchProcessor, ConcurrencyScope};
pub use codec::{ImageCodec, RustCodec};
pub use transform::Transformer;
