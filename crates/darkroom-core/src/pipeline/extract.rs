//! Final buffer extraction.

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::PipelineResult;
use crate::types::ImageState;

/// Turns a finished image state into encoded output bytes.
///
/// Extraction is where a run with queued calls finally pays for them. A
/// state with no calls passes its source bytes through byte-identical.
pub struct BufferExtractor {
    engine: Arc<dyn Engine>,
}

impl BufferExtractor {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    pub async fn extract(&self, state: &ImageState) -> PipelineResult<Vec<u8>> {
        let buffer = self.engine.extract(state).await?;
        tracing::debug!(
            bytes = buffer.len(),
            calls = state.calls().len(),
            "extracted output buffer"
        );
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::types::ImageInfo;
    use async_trait::async_trait;

    struct FixedEngine {
        output: Vec<u8>,
        fail: bool,
    }

    #[async_trait]
    impl Engine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn probe(&self, _state: &ImageState) -> PipelineResult<ImageInfo> {
            unimplemented!("not probed in these tests")
        }

        async fn extract(&self, _state: &ImageState) -> PipelineResult<Vec<u8>> {
            if self.fail {
                return Err(PipelineError::Encoding("bad output".to_string()));
            }
            Ok(self.output.clone())
        }
    }

    #[tokio::test]
    async fn test_extract_returns_engine_buffer() {
        let extractor = BufferExtractor::new(Arc::new(FixedEngine {
            output: vec![7, 8, 9],
            fail: false,
        }));
        let buffer = extractor
            .extract(&ImageState::from_bytes(vec![1]))
            .await
            .unwrap();
        assert_eq!(buffer, vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn test_extract_propagates_engine_error() {
        let extractor = BufferExtractor::new(Arc::new(FixedEngine {
            output: vec![],
            fail: true,
        }));
        let err = extractor
            .extract(&ImageState::from_bytes(vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Encoding(_)));
    }
}
