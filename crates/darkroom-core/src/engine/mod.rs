//! The engine boundary: the capability that performs pixel-level work.
//!
//! The pipeline core never touches pixels itself. It queues [`EngineCall`]s
//! onto an [`ImageState`](crate::types::ImageState) and hands the state to an
//! `Engine` to probe metadata or extract the final buffer. The engine
//! materializes the queue lazily, so a queued call that cannot be performed
//! fails at the probe or extraction that runs it.

mod calls;
mod filters;
mod raster;

pub use calls::EngineCall;
pub use raster::RasterEngine;

use async_trait::async_trait;

use crate::error::PipelineResult;
use crate::types::{ImageInfo, ImageState};

/// Capability interface over an image engine.
///
/// Probing and extraction are the only suspension points in a pipeline run;
/// implementations are expected to run pixel work off the async executor.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine identifier for logs.
    fn name(&self) -> &str;

    /// Query current metrics of the state with all queued calls applied.
    async fn probe(&self, state: &ImageState) -> PipelineResult<ImageInfo>;

    /// Serialize the state, with all queued calls applied, to encoded bytes
    /// in the image's current format.
    async fn extract(&self, state: &ImageState) -> PipelineResult<Vec<u8>>;
}
