use crate::{foundation::error::LayerScopeResult, frame::model::Frame};

/// Consumer of finalized frames.
///
/// Ordering contract: `append_frame` is called once per frame, in finalization order.
pub trait FrameSink {
    fn append_frame(&mut self, frame: Frame) -> LayerScopeResult<()>;
}

/// In-memory sink for tests and offline export.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Frames in finalization order.
    pub frames: Vec<Frame>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl FrameSink for InMemorySink {
    fn append_frame(&mut self, frame: Frame) -> LayerScopeResult<()> {
        self.frames.push(frame);
        Ok(())
    }
}

impl FrameSink for Vec<Frame> {
    fn append_frame(&mut self, frame: Frame) -> LayerScopeResult<()> {
        self.push(frame);
        Ok(())
    }
}
