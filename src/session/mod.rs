//! Session-oriented packet processing.
//!
//! A [`assembler::FrameAssembler`] folds packets into frames; [`capture_session::Session`] hands
//! them to a [`sink::FrameSink`]; [`worker::DecodeWorker`] runs the same pipeline on a
//! background thread.

/// Packet stream to frame state machine.
pub mod assembler;
/// Assembler bound to a frame sink.
pub mod capture_session;
/// Frame sink trait and built-in sinks.
pub mod sink;
/// Background decode thread.
pub mod worker;
