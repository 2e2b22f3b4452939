use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    assets::texture_cache::{ContentKey, DecodedImage, TextureCache},
    frame::model::{Frame, TextureNode},
    frame::tree::build_layer_tree,
    protocol::codec::{self, DecodeOpts, Packet, TexturePayload},
};

/// Options controlling a capture session.
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// Bounded channel capacity between the packet producer and the decode worker.
    pub worker_channel_capacity: usize,
    /// Parse display-list dumps carried by painted layers.
    pub parse_display_lists: bool,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            worker_channel_capacity: 64,
            parse_display_lists: true,
        }
    }
}

impl SessionOpts {
    pub(crate) fn decode_opts(&self) -> DecodeOpts {
        DecodeOpts {
            parse_display_lists: self.parse_display_lists,
        }
    }
}

/// Session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Packets that decoded and were applied.
    pub packets_processed: u64,
    /// Packets dropped because they did not decode.
    pub decode_failures: u64,
    /// Packets of a type this viewer does not know.
    pub unknown_packets: u64,
    /// Frames finalized and handed out.
    pub frames_emitted: u64,
    /// Texture occurrences that could not be resolved to content.
    pub textures_dropped: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblerState {
    /// No active frame.
    Idle,
    /// An active frame is accepting packets.
    Accumulating,
}

/// Folds a packet stream into frames.
///
/// Packets must be applied in arrival order from a single producer. Frame boundaries are
/// tolerant: a FRAMESTART while a frame is open finalizes it, content outside a frame opens one
/// with timestamp 0, and a FRAMEEND with no open frame is ignored.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    opts: SessionOpts,
    active: Option<Frame>,
    cache: TextureCache,
    // Last content key uploaded under each GL texture name; `None` after a zero-area upload.
    names: HashMap<u32, Option<ContentKey>>,
    stats: SessionStats,
}

impl FrameAssembler {
    pub fn new(opts: SessionOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    pub fn state(&self) -> AssemblerState {
        if self.active.is_some() {
            AssemblerState::Accumulating
        } else {
            AssemblerState::Idle
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The in-progress frame, if any.
    pub fn active_frame(&self) -> Option<&Frame> {
        self.active.as_ref()
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn into_cache(self) -> TextureCache {
        self.cache
    }

    /// Look up decoded texture content. `None` means "not available yet".
    pub fn find_image(&self, key: &ContentKey) -> Option<Arc<DecodedImage>> {
        self.cache.lookup(key)
    }

    /// Images interned since the previous call.
    pub fn take_new_images(&mut self) -> Vec<(ContentKey, Arc<DecodedImage>)> {
        self.cache.take_new_images()
    }

    /// Start a session: clears all state and counters.
    pub fn begin(&mut self) {
        self.active = None;
        self.cache.clear();
        self.names.clear();
        self.stats = SessionStats::default();
        tracing::debug!("capture session started");
    }

    /// Stop a session: drops the active frame, the texture name map and cached content.
    pub fn end(&mut self) {
        if let Some(frame) = self.active.take() {
            tracing::debug!(frame = frame.id, "discarding active frame at session end");
        }
        self.names.clear();
        self.cache.clear();
    }

    /// Decode and apply one wire packet. Undecodable packets are logged and dropped.
    pub fn input(&mut self, bytes: &[u8]) -> Option<Frame> {
        match codec::decode_with(bytes, self.opts.decode_opts()) {
            Ok(packet) => self.process(packet),
            Err(err) => {
                self.stats.decode_failures += 1;
                tracing::warn!(error = %err, len = bytes.len(), "dropping undecodable packet");
                None
            }
        }
    }

    /// Apply one decoded packet; returns a frame when this packet finalized one.
    pub fn process(&mut self, packet: Packet) -> Option<Frame> {
        self.stats.packets_processed += 1;
        tracing::trace!(kind = packet.kind_name(), "packet");

        match packet {
            Packet::FrameStart { timestamp } => {
                let stale = self.finalize();
                if let Some(frame) = &stale {
                    tracing::debug!(frame = frame.id, "FRAMESTART without FRAMEEND, finalizing");
                }
                self.active = Some(Frame::new(timestamp));
                stale
            }
            Packet::FrameEnd => {
                let done = self.finalize();
                if done.is_none() {
                    tracing::debug!("FRAMEEND with no active frame");
                }
                done
            }
            Packet::Color(color) => {
                self.active_mut().colors.push(color);
                None
            }
            Packet::Texture(tex) => {
                self.add_texture(tex);
                None
            }
            Packet::Layers { records } => {
                let frame = self.active_mut();
                frame.layer_tree = build_layer_tree(records);
                None
            }
            Packet::Draw(draw) => {
                self.active_mut().draws.push(draw);
                None
            }
            Packet::Meta { composed_by_hwc } => {
                tracing::trace!(composed_by_hwc, "meta packet ignored");
                None
            }
            Packet::Unknown(tag) => {
                self.stats.unknown_packets += 1;
                tracing::warn!(tag, "skipping packet of unknown type");
                None
            }
        }
    }

    fn active_mut(&mut self) -> &mut Frame {
        self.active.get_or_insert_with(|| {
            tracing::debug!("content before FRAMESTART, opening frame 0");
            Frame::new(0)
        })
    }

    fn finalize(&mut self) -> Option<Frame> {
        let frame = self.active.take()?;
        self.stats.frames_emitted += 1;
        tracing::debug!(
            frame = frame.id,
            colors = frame.colors.len(),
            textures = frame.texture_nodes.len(),
            layers = frame.layer_count(),
            draws = frame.draws.len(),
            "frame finalized"
        );
        Some(frame)
    }

    fn add_texture(&mut self, tex: TexturePayload) {
        self.active_mut();

        let (content_key, has_new_content) = match tex.pixels.as_deref() {
            Some(bytes) => {
                match self
                    .cache
                    .intern(bytes, tex.width, tex.height, tex.data_format, tex.stride)
                {
                    Ok(key) => {
                        self.names.insert(tex.name, key);
                        (key, true)
                    }
                    Err(err) => {
                        self.stats.textures_dropped += 1;
                        tracing::warn!(name = tex.name, error = %err, "texture not interned");
                        return;
                    }
                }
            }
            None => match self.names.get(&tex.name) {
                Some(key) => (*key, false),
                None => {
                    self.stats.textures_dropped += 1;
                    tracing::warn!(
                        name = tex.name,
                        layer = tex.layer_ref,
                        "texture reuses a name with no prior content, dropping"
                    );
                    return;
                }
            },
        };

        self.active_mut().texture_nodes.push(TextureNode {
            name: tex.name,
            target: tex.target,
            content_key,
            layer_ref: tex.layer_ref,
            context_ref: tex.context_ref,
            has_new_content,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/assembler.rs"]
mod tests;
