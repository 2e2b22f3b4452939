use prost::Message as _;

use crate::{
    foundation::core::{FloatRect, IntRect, IntSize, LayerMatrix},
    foundation::error::{LayerScopeError, LayerScopeResult},
    frame::display_list::DisplayList,
    frame::model::{
        ColorEntry, DrawObject, LayerKind, LayerRecord, LayerShadow, ScaleFilter, ScrollDirection,
        TextureTarget,
    },
    protocol::wire,
};

/// Options for turning wire messages into packets.
#[derive(Clone, Copy, Debug)]
pub struct DecodeOpts {
    /// Parse `displayListLog` dumps into [`DisplayList`]s. When off, dumps are discarded.
    pub parse_display_lists: bool,
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self {
            parse_display_lists: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// TEXTURE payload, before content interning.
pub struct TexturePayload {
    pub layer_ref: u64,
    pub name: u32,
    pub target: TextureTarget,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub data_format: u32,
    pub context_ref: u64,
    /// Raw pixel bytes; `None` means "content unchanged since the last upload of `name`".
    pub pixels: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq)]
/// One decoded protocol message.
pub enum Packet {
    FrameStart { timestamp: u64 },
    FrameEnd,
    Color(ColorEntry),
    Texture(TexturePayload),
    Layers { records: Vec<LayerRecord> },
    Draw(DrawObject),
    Meta { composed_by_hwc: bool },
    /// A packet type this viewer does not know.
    Unknown(i32),
}

impl Packet {
    /// Short uppercase name as used by the protocol.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Packet::FrameStart { .. } => "FRAMESTART",
            Packet::FrameEnd => "FRAMEEND",
            Packet::Color(_) => "COLOR",
            Packet::Texture(_) => "TEXTURE",
            Packet::Layers { .. } => "LAYERS",
            Packet::Draw(_) => "DRAW",
            Packet::Meta { .. } => "META",
            Packet::Unknown(_) => "UNKNOWN",
        }
    }
}

/// Decode one complete wire message with default options.
pub fn decode(bytes: &[u8]) -> LayerScopeResult<Packet> {
    decode_with(bytes, DecodeOpts::default())
}

/// Decode one complete wire message.
///
/// Unknown packet types decode to [`Packet::Unknown`]; a known type without its payload
/// sub-message is a decode error.
pub fn decode_with(bytes: &[u8], opts: DecodeOpts) -> LayerScopeResult<Packet> {
    let msg = wire::Packet::decode(bytes)?;
    let Some(raw_type) = msg.r#type else {
        return Err(LayerScopeError::decode("packet has no type field"));
    };
    let Ok(data_type) = wire::DataType::try_from(raw_type) else {
        return Ok(Packet::Unknown(raw_type));
    };

    match data_type {
        wire::DataType::FrameStart => Ok(Packet::FrameStart {
            timestamp: msg.frame.and_then(|f| f.value).unwrap_or(0),
        }),
        wire::DataType::FrameEnd => Ok(Packet::FrameEnd),
        wire::DataType::Color => {
            let c = require(msg.color, "COLOR")?;
            Ok(Packet::Color(ColorEntry {
                layer_ref: c.layerref,
                color: c.color.unwrap_or(0),
                width: c.width.unwrap_or(0),
                height: c.height.unwrap_or(0),
            }))
        }
        wire::DataType::Texture => {
            let t = require(msg.texture, "TEXTURE")?;
            Ok(Packet::Texture(TexturePayload {
                layer_ref: t.layerref,
                name: t.name.unwrap_or(0),
                target: TextureTarget::from_gl(t.target.unwrap_or(0)),
                width: t.width.unwrap_or(0),
                height: t.height.unwrap_or(0),
                stride: t.stride.unwrap_or(0),
                data_format: t.dataformat.unwrap_or(0),
                context_ref: t.glcontext.unwrap_or(0),
                pixels: t.data.filter(|d| !d.is_empty()),
            }))
        }
        wire::DataType::Layers => {
            let l = require(msg.layers, "LAYERS")?;
            let records = l
                .layer
                .into_iter()
                .map(|layer| layer_record(layer, opts))
                .collect();
            Ok(Packet::Layers { records })
        }
        wire::DataType::Meta => Ok(Packet::Meta {
            composed_by_hwc: msg.meta.and_then(|m| m.composed_by_hwc).unwrap_or(false),
        }),
        wire::DataType::Draw => {
            let d = require(msg.draw, "DRAW")?;
            draw_object(d).map(Packet::Draw)
        }
    }
}

fn require<T>(payload: Option<T>, kind: &str) -> LayerScopeResult<T> {
    payload.ok_or_else(|| LayerScopeError::decode(format!("{kind} packet carries no payload")))
}

fn draw_object(d: wire::DrawPacket) -> LayerScopeResult<DrawObject> {
    if d.total_rects == 0 || d.total_rects > DrawObject::MAX_RECTS {
        return Err(LayerScopeError::decode(format!(
            "DRAW totalRects {} outside 1..={}",
            d.total_rects,
            DrawObject::MAX_RECTS
        )));
    }
    let total = d.total_rects as usize;
    if d.layer_rect.len() < total {
        return Err(LayerScopeError::decode(format!(
            "DRAW declares {} rects but carries {}",
            total,
            d.layer_rect.len()
        )));
    }
    let mv_matrix: [f32; 16] = d.mv_matrix.as_slice().try_into().map_err(|_| {
        LayerScopeError::decode(format!(
            "DRAW mvMatrix has {} entries, expected 16",
            d.mv_matrix.len()
        ))
    })?;

    Ok(DrawObject {
        layer_ref: d.layerref,
        mv_matrix: mv_matrix.map(|v| finite(v, "mvMatrix")),
        offset_x: finite(d.offset_x, "offsetX"),
        offset_y: finite(d.offset_y, "offsetY"),
        layer_rects: d
            .layer_rect
            .iter()
            .take(total)
            .map(|r| FloatRect {
                x: finite(r.x, "layerRect"),
                y: finite(r.y, "layerRect"),
                w: finite(r.w, "layerRect"),
                h: finite(r.h, "layerRect"),
            })
            .collect(),
        total_rects: d.total_rects,
        tex_ids: d.tex_ids,
    })
}

fn layer_record(l: wire::Layer, opts: DecodeOpts) -> LayerRecord {
    let display_list = if opts.parse_display_lists {
        l.display_list_log.as_deref().map(display_list_from_log)
    } else {
        None
    };

    LayerRecord {
        layer_type: layer_kind(l.r#type),
        ptr: l.ptr,
        parent_ptr: l.parent_ptr,
        clip: l.clip.as_ref().map(int_rect),
        transform: l.transform.map(matrix),
        region: l.v_region.as_ref().map(region),
        shadow: l.shadow.map(|s| LayerShadow {
            clip: s.clip.as_ref().map(int_rect),
            transform: s.transform.map(matrix),
            region: s.v_region.as_ref().map(region),
        }),
        opacity: l.opacity.map(|v| finite(v, "opacity")),
        opaque: l.c_opaque,
        alpha: l.c_alpha,
        scroll_dir: l
            .direct
            .and_then(|d| wire::ScrollingDirect::try_from(d).ok())
            .map(|d| match d {
                wire::ScrollingDirect::Vertical => ScrollDirection::Vertical,
                wire::ScrollingDirect::Horizontal => ScrollDirection::Horizontal,
            }),
        bar_id: l.bar_id,
        mask: l.mask,
        hit_region: l.hit_region.as_ref().map(region),
        valid: l.valid.as_ref().map(region),
        color: l.color,
        filter: l
            .filter
            .and_then(|f| wire::Filter::try_from(f).ok())
            .map(scale_filter),
        ref_id: l.ref_id,
        size: l.size.map(|s| IntSize {
            w: s.w.unwrap_or(0),
            h: s.h.unwrap_or(0),
        }),
        display_list,
    }
}

fn display_list_from_log(log: &[u8]) -> DisplayList {
    DisplayList::parse(&String::from_utf8_lossy(log))
}

fn layer_kind(raw: i32) -> LayerKind {
    match wire::LayerType::try_from(raw) {
        Ok(wire::LayerType::LayerManager) => LayerKind::LayerManager,
        Ok(wire::LayerType::ContainerLayer) => LayerKind::Container,
        Ok(wire::LayerType::PaintedLayer) => LayerKind::Painted,
        Ok(wire::LayerType::CanvasLayer) => LayerKind::Canvas,
        Ok(wire::LayerType::ImageLayer) => LayerKind::Image,
        Ok(wire::LayerType::ColorLayer) => LayerKind::Color,
        Ok(wire::LayerType::TextLayer) => LayerKind::Text,
        Ok(wire::LayerType::RefLayer) => LayerKind::Ref,
        Ok(wire::LayerType::ReadbackLayer) => LayerKind::Readback,
        Ok(wire::LayerType::DisplayItemLayer) => LayerKind::DisplayItem,
        Ok(wire::LayerType::UnknownLayer) | Err(_) => LayerKind::Unknown,
    }
}

fn scale_filter(f: wire::Filter) -> ScaleFilter {
    match f {
        wire::Filter::Fast => ScaleFilter::Fast,
        wire::Filter::Good => ScaleFilter::Good,
        wire::Filter::Best => ScaleFilter::Best,
        wire::Filter::Nearest => ScaleFilter::Nearest,
        wire::Filter::Bilinear => ScaleFilter::Bilinear,
        wire::Filter::Gaussian => ScaleFilter::Gaussian,
        wire::Filter::Sentinel => ScaleFilter::Sentinel,
        wire::Filter::Linear => ScaleFilter::Linear,
        wire::Filter::Point => ScaleFilter::Point,
    }
}

fn int_rect(r: &wire::LayerRect) -> IntRect {
    IntRect::new(
        r.x.unwrap_or(0),
        r.y.unwrap_or(0),
        r.w.unwrap_or(0),
        r.h.unwrap_or(0),
    )
}

fn region(r: &wire::LayerRegion) -> Vec<IntRect> {
    r.r.iter().map(int_rect).collect()
}

fn matrix(m: wire::LayerMatrix) -> LayerMatrix {
    LayerMatrix {
        is_2d: m.is_2d.unwrap_or(false),
        is_id: m.is_id.unwrap_or(false),
        m: m.m.into_iter().map(|v| finite(v, "transform")).collect(),
    }
}

// serde_json writes NaN and infinities as `null`, which a float field will not read back.
fn finite(v: f32, field: &'static str) -> f32 {
    if v.is_finite() {
        return v;
    }
    tracing::warn!(field, value = %v, "replacing non-finite float");
    if v.is_nan() { 0.0 } else { v.signum() * f32::MAX }
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/codec.rs"]
mod tests;
