use std::sync::Arc;

use crate::{
    assets::texture_cache::{ContentKey, DecodedImage},
    foundation::error::LayerScopeResult,
    protocol::codec::Packet,
    session::assembler::{FrameAssembler, SessionOpts, SessionStats},
    session::sink::FrameSink,
};

/// A frame assembler bound to the sink that receives its frames.
///
/// Each instance is independent, so concurrent debugging connections use one session each.
pub struct Session<S> {
    assembler: FrameAssembler,
    sink: S,
}

impl<S: FrameSink> Session<S> {
    pub fn new(sink: S, opts: SessionOpts) -> Self {
        Self {
            assembler: FrameAssembler::new(opts),
            sink,
        }
    }

    pub fn begin(&mut self) {
        self.assembler.begin();
    }

    /// Discard the active frame and per-session texture state.
    pub fn end(&mut self) {
        self.assembler.end();
    }

    /// Feed one wire packet. Only sink failures are returned; bad packets are dropped.
    pub fn push(&mut self, bytes: &[u8]) -> LayerScopeResult<()> {
        match self.assembler.input(bytes) {
            Some(frame) => self.sink.append_frame(frame),
            None => Ok(()),
        }
    }

    /// Feed one already-decoded packet.
    pub fn push_packet(&mut self, packet: Packet) -> LayerScopeResult<()> {
        match self.assembler.process(packet) {
            Some(frame) => self.sink.append_frame(frame),
            None => Ok(()),
        }
    }

    pub fn find_image(&self, key: &ContentKey) -> Option<Arc<DecodedImage>> {
        self.assembler.find_image(key)
    }

    pub fn stats(&self) -> SessionStats {
        self.assembler.stats()
    }

    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (S, FrameAssembler) {
        (self.sink, self.assembler)
    }
}
