use prost::Message as _;

use crate::{
    foundation::error::{LayerScopeError, LayerScopeResult},
    protocol::wire,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Capture option toggled by a viewer-to-target command.
pub enum CommandKind {
    NoOp,
    /// Dump the layer tree with every frame.
    LayersTree,
    /// Dump layer buffers (textures) with every frame.
    LayersBuffer,
}

impl CommandKind {
    fn to_wire(self) -> wire::CmdType {
        match self {
            CommandKind::NoOp => wire::CmdType::NoOp,
            CommandKind::LayersTree => wire::CmdType::LayersTree,
            CommandKind::LayersBuffer => wire::CmdType::LayersBuffer,
        }
    }

    fn from_wire(t: wire::CmdType) -> Self {
        match t {
            wire::CmdType::NoOp => CommandKind::NoOp,
            wire::CmdType::LayersTree => CommandKind::LayersTree,
            wire::CmdType::LayersBuffer => CommandKind::LayersBuffer,
        }
    }
}

/// Encode a command packet for the transport to send.
pub fn encode_command(kind: CommandKind, value: bool) -> Vec<u8> {
    wire::CommandPacket {
        r#type: kind.to_wire() as i32,
        value: Some(value),
    }
    .encode_to_vec()
}

/// Decode a command packet. A missing `value` reads as `false`.
pub fn decode_command(bytes: &[u8]) -> LayerScopeResult<(CommandKind, bool)> {
    let msg = wire::CommandPacket::decode(bytes)?;
    let kind = wire::CmdType::try_from(msg.r#type)
        .map(CommandKind::from_wire)
        .map_err(|_| LayerScopeError::protocol(format!("unknown command type {}", msg.r#type)))?;
    Ok((kind, msg.value.unwrap_or(false)))
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/command.rs"]
mod tests;
