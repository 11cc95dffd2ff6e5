//! Sequential step execution over an engine.

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::PipelineResult;
use crate::ops::{registry, ProcessStep, RawStep};
use crate::types::ImageState;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running,
    Done,
    Failed,
}

/// Executes a list of steps against one image, strictly in order.
///
/// Each step is validated, the image is probed fresh, and the step's calls
/// are queued. Probing materializes the calls queued so far, which is where
/// engine failures from earlier steps surface. The first failure of any kind
/// aborts the run; later steps never execute.
pub struct PipelineRun {
    engine: Arc<dyn Engine>,
    state: RunState,
}

impl PipelineRun {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            state: RunState::Pending,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run every step, returning the final image state for extraction.
    ///
    /// An empty step list is a valid no-op run: the state passes through
    /// untouched.
    pub async fn execute(
        &mut self,
        steps: &[RawStep],
        mut image: ImageState,
    ) -> PipelineResult<ImageState> {
        self.state = RunState::Running;
        for (index, raw) in steps.iter().enumerate() {
            match self.execute_step(raw, &mut image).await {
                Ok(step) => {
                    tracing::debug!(
                        step = index,
                        operation = %step.kind(),
                        "step applied"
                    );
                }
                Err(e) => {
                    self.state = RunState::Failed;
                    tracing::debug!(
                        step = index,
                        operation = %raw.operation,
                        error = %e,
                        "step failed, aborting run"
                    );
                    return Err(e);
                }
            }
        }
        self.state = RunState::Done;
        Ok(image)
    }

    async fn execute_step(
        &self,
        raw: &RawStep,
        image: &mut ImageState,
    ) -> PipelineResult<ProcessStep> {
        let step = ProcessStep::validate(raw)?;
        // Metadata must reflect every prior step, so probe fresh each time
        let info = self.engine.probe(image).await?;
        registry::apply(&step, image, &info);
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineCall;
    use crate::error::PipelineError;
    use crate::types::ImageInfo;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Engine that reports fixed metadata and counts probes.
    struct MockEngine {
        probes: AtomicU32,
    }

    impl MockEngine {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                probes: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Engine for MockEngine {
        fn name(&self) -> &str {
            "mock"
        }

        async fn probe(&self, _state: &ImageState) -> PipelineResult<ImageInfo> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            Ok(ImageInfo {
                width: 100,
                height: 80,
                format: "png".to_string(),
                encoded_size: 2048,
            })
        }

        async fn extract(&self, state: &ImageState) -> PipelineResult<Vec<u8>> {
            let _ = state;
            Ok(vec![])
        }
    }

    fn raw(operation: &str, params: Option<serde_json::Value>) -> RawStep {
        RawStep {
            operation: operation.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_steps_queue_calls_in_order() {
        let engine = MockEngine::new();
        let mut run = PipelineRun::new(engine.clone());
        let steps = vec![
            raw("flip", None),
            raw("scale", Some(json!({ "width": 50, "height": 40 }))),
            raw("negative", None),
        ];
        let image = run
            .execute(&steps, ImageState::from_bytes(vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(
            image.calls(),
            &[
                EngineCall::Flip,
                EngineCall::Scale {
                    width: 50,
                    height: 40
                },
                EngineCall::Negative,
            ]
        );
        assert_eq!(run.state(), RunState::Done);
    }

    #[tokio::test]
    async fn test_probes_once_per_step() {
        let engine = MockEngine::new();
        let mut run = PipelineRun::new(engine.clone());
        let steps = vec![raw("flip", None), raw("flop", None), raw("trim", None)];
        run.execute(&steps, ImageState::from_bytes(vec![]))
            .await
            .unwrap();
        assert_eq!(engine.probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unknown_operation_aborts_run() {
        let engine = MockEngine::new();
        let mut run = PipelineRun::new(engine.clone());
        let steps = vec![raw("flip", None), raw("sharpen", None), raw("flop", None)];
        let err = run
            .execute(&steps, ImageState::from_bytes(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownOperation(_)));
        assert_eq!(run.state(), RunState::Failed);
        // The failing step is second, so only the first step probed
        assert_eq!(engine.probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_schema_failure_aborts_run() {
        let engine = MockEngine::new();
        let mut run = PipelineRun::new(engine.clone());
        let steps = vec![raw("blur", Some(json!({ "wrong": 1 })))];
        let err = run
            .execute(&steps, ImageState::from_bytes(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaValidation { .. }));
        assert_eq!(run.state(), RunState::Failed);
    }

    #[tokio::test]
    async fn test_empty_steps_is_noop() {
        let engine = MockEngine::new();
        let mut run = PipelineRun::new(engine.clone());
        let image = run
            .execute(&[], ImageState::from_bytes(vec![9, 9]))
            .await
            .unwrap();
        assert!(image.is_untouched());
        assert_eq!(run.state(), RunState::Done);
        assert_eq!(engine.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blur_uses_probed_dimensions() {
        let engine = MockEngine::new();
        let mut run = PipelineRun::new(engine.clone());
        let steps = vec![raw("blur", Some(json!({ "factor": 2 })))];
        let image = run
            .execute(&steps, ImageState::from_bytes(vec![]))
            .await
            .unwrap();
        assert_eq!(
            image.calls(),
            &[
                EngineCall::Scale {
                    width: 10,
                    height: 8
                },
                EngineCall::Blur {
                    radius: 7.0,
                    sigma: 2.0
                },
                EngineCall::Scale {
                    width: 100,
                    height: 80
                },
            ]
        );
    }
}
