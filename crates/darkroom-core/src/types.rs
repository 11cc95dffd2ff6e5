//! Core data types threaded through a pipeline run.

use std::path::{Path, PathBuf};

use crate::engine::EngineCall;

/// Where the pipeline input comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A readable file on disk (typically an ephemeral upload)
    Path(PathBuf),

    /// An already-read byte buffer
    Buffer(Vec<u8>),
}

/// The single-owner mutable carrier for one pipeline run.
///
/// An `ImageState` owns the source representation plus the queue of pending
/// transform calls to the engine. It is threaded by move through each step;
/// exactly one exists per run, and it is consumed by buffer extraction.
///
/// The engine materializes lazily: queued calls are only executed when the
/// state is probed or extracted.
#[derive(Debug)]
pub struct ImageState {
    source: ImageSource,
    queue: Vec<EngineCall>,
}

impl ImageState {
    /// Create a state backed by a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ImageSource::Path(path.into()),
            queue: Vec::new(),
        }
    }

    /// Create a state backed by an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            source: ImageSource::Buffer(bytes),
            queue: Vec::new(),
        }
    }

    /// Queue a transform call for the engine.
    pub fn push(&mut self, call: EngineCall) {
        self.queue.push(call);
    }

    /// The input source.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// The pending transform calls, in queue order.
    pub fn calls(&self) -> &[EngineCall] {
        &self.queue
    }

    /// Whether any transform calls are queued.
    pub fn is_untouched(&self) -> bool {
        self.queue.is_empty()
    }
}

impl ImageSource {
    /// The backing file path, if filesystem-backed.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageSource::Path(p) => Some(p),
            ImageSource::Buffer(_) => None,
        }
    }
}

/// Transient snapshot of the image during execution.
///
/// Recomputed fresh before each step: prior operations can change every
/// field, so values are never cached across steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Current width in pixels
    pub width: u32,

    /// Current height in pixels
    pub height: u32,

    /// Current encoded format ("jpeg", "png", ...)
    pub format: String,

    /// Size of the state encoded in its current format, in bytes
    pub encoded_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_starts_with_empty_queue() {
        let state = ImageState::from_bytes(vec![1, 2, 3]);
        assert!(state.is_untouched());
        assert!(state.calls().is_empty());
    }

    #[test]
    fn test_push_preserves_queue_order() {
        let mut state = ImageState::from_bytes(vec![]);
        state.push(EngineCall::Flip);
        state.push(EngineCall::Flop);
        state.push(EngineCall::Trim);
        let names: Vec<_> = state.calls().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["flip", "flop", "trim"]);
    }

    #[test]
    fn test_source_path_accessor() {
        let state = ImageState::from_path("/tmp/upload-1.jpg");
        assert_eq!(
            state.source().path(),
            Some(Path::new("/tmp/upload-1.jpg"))
        );

        let state = ImageState::from_bytes(vec![0xff]);
        assert!(state.source().path().is_none());
    }
}
