//! Pipeline orchestration - wires together all processing stages.

use std::sync::Arc;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{PipelineError, PipelineResult};
use crate::gate::AdmissionGate;
use crate::ops::{parse_steps, RawStep};
use crate::types::ImageState;
use crate::usage::{LogUsageSink, UsageRecord, UsageSink};

use super::cleanup::TempUpload;
use super::executor::PipelineRun;
use super::extract::BufferExtractor;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Options for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Caller identity for usage accounting
    pub identity: Option<String>,
}

/// The result of a successful run.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Encoded output bytes
    pub buffer: Vec<u8>,
    /// Number of steps applied
    pub steps_applied: usize,
}

/// The main pipeline that takes an upload and a step list to output bytes.
///
/// Stage order is deliberate: the size guard and step-list parse run before
/// admission, so obviously bad requests are rejected without waiting for a
/// slot. Everything after admission holds the slot until extraction is done.
pub struct ImagePipeline {
    engine: Arc<dyn Engine>,
    gate: AdmissionGate,
    extractor: BufferExtractor,
    usage: Arc<dyn UsageSink>,
    max_file_size_mb: u64,
}

impl ImagePipeline {
    /// Create a pipeline with the given configuration and engine.
    pub fn new(config: &Config, engine: Arc<dyn Engine>) -> Self {
        Self::with_usage_sink(config, engine, Arc::new(LogUsageSink))
    }

    pub fn with_usage_sink(
        config: &Config,
        engine: Arc<dyn Engine>,
        usage: Arc<dyn UsageSink>,
    ) -> Self {
        Self {
            engine: engine.clone(),
            gate: AdmissionGate::new(config.queue.concurrency),
            extractor: BufferExtractor::new(engine),
            usage,
            max_file_size_mb: config.limits.max_file_size_mb,
        }
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Process a spooled upload. The upload file is removed when this
    /// returns, on success and on every error path.
    pub async fn process_upload(
        &self,
        upload: TempUpload,
        steps_json: &str,
        options: &ProcessOptions,
    ) -> PipelineResult<ProcessedImage> {
        let metadata = tokio::fs::metadata(upload.path()).await.map_err(|e| {
            PipelineError::Engine {
                call: "stat".to_string(),
                message: e.to_string(),
            }
        })?;
        self.check_size(metadata.len())?;

        let state = ImageState::from_path(upload.path().to_path_buf());
        let result = self.run(state, steps_json, options).await;
        upload.discard();
        result
    }

    /// Process an in-memory image, for callers that never touch disk.
    pub async fn process_bytes(
        &self,
        bytes: Vec<u8>,
        steps_json: &str,
        options: &ProcessOptions,
    ) -> PipelineResult<ProcessedImage> {
        self.check_size(bytes.len() as u64)?;
        self.run(ImageState::from_bytes(bytes), steps_json, options)
            .await
    }

    async fn run(
        &self,
        state: ImageState,
        steps_json: &str,
        options: &ProcessOptions,
    ) -> PipelineResult<ProcessedImage> {
        let start = std::time::Instant::now();
        let steps: Vec<RawStep> = parse_steps(steps_json)?;
        tracing::debug!(steps = steps.len(), "admitting pipeline run");

        let _permit = self.gate.admit().await;

        let mut run = PipelineRun::new(self.engine.clone());
        let finished = run.execute(&steps, state).await?;
        let buffer = self.extractor.extract(&finished).await?;

        self.record_usage(&steps, options).await;
        tracing::debug!(
            steps = steps.len(),
            bytes = buffer.len(),
            elapsed = ?start.elapsed(),
            "pipeline run complete"
        );
        Ok(ProcessedImage {
            buffer,
            steps_applied: steps.len(),
        })
    }

    fn check_size(&self, len: u64) -> PipelineResult<()> {
        // Compare in bytes; a megabyte-floored comparison would admit inputs
        // up to a whole megabyte over the limit
        if len > self.max_file_size_mb * BYTES_PER_MB {
            return Err(PipelineError::FileTooLarge {
                size_mb: len.div_ceil(BYTES_PER_MB),
                max_mb: self.max_file_size_mb,
            });
        }
        Ok(())
    }

    async fn record_usage(&self, steps: &[RawStep], options: &ProcessOptions) {
        let record = UsageRecord::transformation(options.identity.clone(), steps.len() as u64);
        if let Err(e) = self.usage.record(&record).await {
            tracing::warn!("Failed to record usage: {}", e);
        }
    }
}
