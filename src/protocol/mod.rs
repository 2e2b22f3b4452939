//! LayerScope wire protocol.
//!
//! The transport delivers one complete message per buffer; [`codec`] turns it into a
//! [`codec::Packet`]. Commands travel the other way through [`command`].

/// Capture file framing.
pub mod capture;
/// Wire message to [`codec::Packet`] decoding.
pub mod codec;
/// Viewer-to-target command packets.
pub mod command;
/// Hand-declared protobuf messages.
pub mod wire;
