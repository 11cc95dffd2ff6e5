//! The transformation pipeline: admission, execution, extraction, cleanup.

pub mod cleanup;
pub mod executor;
pub mod extract;
pub mod processor;

pub use cleanup::TempUpload;
pub use executor::{PipelineRun, RunState};
pub use extract::BufferExtractor;
pub use processor::{ImagePipeline, ProcessOptions, ProcessedImage};
