//! Darkroom Core - Embeddable image transformation pipeline.
//!
//! Darkroom takes an image plus a JSON list of named transformation steps
//! and produces the transformed image bytes. Steps are validated against a
//! closed operation registry, executed strictly in order against a raster
//! engine, and the result is extracted as a single output buffer.
//!
//! # Architecture
//!
//! ```text
//! Upload → Parse Steps → Admit → [Validate → Probe → Apply]* → Extract → Bytes
//! ```
//!
//! Transform calls are queued lazily on the image state and only run when
//! the state is probed or extracted. Every run is bounded by an admission
//! gate (one at a time by default) and uploads are removed on every exit
//! path.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use darkroom_core::{Config, ImagePipeline, ProcessOptions, RasterEngine};
//!
//! #[tokio::main]
//! async fn main() -> darkroom_core::Result<()> {
//!     let config = Config::load()?;
//!     let engine = Arc::new(RasterEngine::new(config.output.clone(), config.limits.clone()));
//!     let pipeline = ImagePipeline::new(&config, engine);
//!
//!     let bytes = std::fs::read("./image.jpg")?;
//!     let steps = r#"[{"operation":"scale","params":{"width":200,"height":150}}]"#;
//!     let result = pipeline
//!         .process_bytes(bytes, steps, &ProcessOptions::default())
//!         .await
//!         .map_err(darkroom_core::DarkroomError::Pipeline)?;
//!     std::fs::write("./out.jpg", result.buffer)?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod ops;
pub mod pipeline;
pub mod types;
pub mod usage;

// Re-exports for convenient access
pub use config::Config;
pub use engine::{Engine, EngineCall, RasterEngine};
pub use error::{ConfigError, DarkroomError, PipelineError, PipelineResult, Result};
pub use gate::AdmissionGate;
pub use ops::{OperationKind, OPERATIONS};
pub use pipeline::{ImagePipeline, ProcessOptions, ProcessedImage, TempUpload};
pub use types::{ImageInfo, ImageSource, ImageState};
pub use usage::{LogUsageSink, UsageRecord, UsageSink};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_registry_is_complete() {
        assert_eq!(OPERATIONS.len(), 30);
    }
}
