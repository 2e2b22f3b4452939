//! LayerScope capture decoding and frame reconstruction.
//!
//! A compositor instrumented with LayerScope streams protobuf packets describing each composited
//! frame: solid colors, texture uploads, the flat layer list and per-quad draw calls. This crate
//! turns that stream back into navigable frames.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: wire bytes -> [`Packet`] ([`decode`])
//! 2. **Intern**: texture payloads -> [`ContentKey`] in a [`TextureCache`] (decoded at most once)
//! 3. **Assemble**: packets -> [`Frame`]s with a reconstructed layer forest ([`FrameAssembler`])
//! 4. **Deliver**: frames -> a [`FrameSink`], optionally from a [`DecodeWorker`] thread
//! 5. **Persist** (optional): frames and images to an archive directory ([`export`], [`import`])
//!
//! Malformed input never aborts a session: bad packets are logged with `tracing` and dropped.
#![forbid(unsafe_code)]

/// Texture normalization and caching.
pub mod assets;
/// Shared types and errors.
pub mod foundation;
/// Frame data model.
pub mod frame;
/// Archive export/import.
pub mod persist;
/// Wire protocol.
pub mod protocol;
/// Session and worker APIs.
pub mod session;

pub use assets::pixels::{GL_BGRA, GL_RGBA, LZ4_FORMAT_BIT, TextureFormat};
pub use assets::texture_cache::{ContentKey, DecodedImage, MAX_TEXTURE_BYTES, TextureCache};
pub use foundation::core::{
    FloatRect, IntRect, IntSize, LayerMatrix, abgr_to_rgba, hex16, join_u64, split_u64,
};
pub use foundation::error::{LayerScopeError, LayerScopeResult};
pub use frame::display_list::{DisplayItem, DisplayItemId, DisplayList, FieldValue};
pub use frame::model::{
    ColorEntry, DrawObject, Frame, LayerKind, LayerRecord, LayerShadow, LayerTreeNode,
    ScaleFilter, ScrollDirection, TextureNode, TextureTarget,
};
pub use frame::tree::{MAX_LAYER_DEPTH, build_layer_tree};
pub use persist::archive::{export, import};
pub use protocol::capture::{CaptureReader, CaptureWriter};
pub use protocol::codec::{DecodeOpts, Packet, TexturePayload, decode, decode_with};
pub use protocol::command::{CommandKind, decode_command, encode_command};
pub use session::assembler::{AssemblerState, FrameAssembler, SessionOpts, SessionStats};
pub use session::capture_session::Session;
pub use session::sink::{FrameSink, InMemorySink};
pub use session::worker::{DecodeWorker, FrameMessage};
