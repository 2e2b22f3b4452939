//! LayerScope wire messages (proto2), declared by hand for `prost`.
//!
//! Field tags and enum values match the compositor side of the protocol. Only fields the viewer
//! consumes are declared; unknown fields are skipped by `prost` on decode.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum DataType {
    FrameStart = 1,
    FrameEnd = 2,
    Color = 3,
    Texture = 4,
    Layers = 5,
    Meta = 6,
    Draw = 7,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FramePacket {
    #[prost(uint64, optional, tag = "1")]
    pub value: Option<u64>,
    #[prost(float, optional, tag = "2")]
    pub scale: Option<f32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ColorPacket {
    #[prost(uint64, required, tag = "1")]
    pub layerref: u64,
    #[prost(uint32, optional, tag = "2")]
    pub width: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub height: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    pub color: Option<u32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TexturePacket {
    #[prost(uint64, required, tag = "1")]
    pub layerref: u64,
    #[prost(uint32, optional, tag = "2")]
    pub width: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub height: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    pub stride: Option<u32>,
    #[prost(uint32, optional, tag = "5")]
    pub name: Option<u32>,
    #[prost(uint32, optional, tag = "6")]
    pub target: Option<u32>,
    #[prost(uint32, optional, tag = "7")]
    pub dataformat: Option<u32>,
    #[prost(uint64, optional, tag = "8")]
    pub glcontext: Option<u64>,
    #[prost(bytes = "vec", optional, tag = "9")]
    pub data: Option<Vec<u8>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum LayerType {
    UnknownLayer = 0,
    LayerManager = 1,
    ContainerLayer = 2,
    PaintedLayer = 3,
    CanvasLayer = 4,
    ImageLayer = 5,
    ColorLayer = 6,
    TextLayer = 7,
    RefLayer = 8,
    ReadbackLayer = 9,
    DisplayItemLayer = 10,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ScrollingDirect {
    Vertical = 1,
    Horizontal = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Filter {
    Fast = 0,
    Good = 1,
    Best = 2,
    Nearest = 3,
    Bilinear = 4,
    Gaussian = 5,
    Sentinel = 6,
    Linear = 7,
    Point = 8,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LayerSize {
    #[prost(int32, optional, tag = "1")]
    pub w: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub h: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LayerRect {
    #[prost(int32, optional, tag = "1")]
    pub x: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub y: Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub w: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub h: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LayerRegion {
    #[prost(message, repeated, tag = "1")]
    pub r: Vec<LayerRect>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LayerMatrix {
    #[prost(bool, optional, tag = "1")]
    pub is_2d: Option<bool>,
    #[prost(bool, optional, tag = "2")]
    pub is_id: Option<bool>,
    #[prost(float, repeated, packed = "false", tag = "3")]
    pub m: Vec<f32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LayerShadow {
    #[prost(message, optional, tag = "1")]
    pub clip: Option<LayerRect>,
    #[prost(message, optional, tag = "2")]
    pub transform: Option<LayerMatrix>,
    #[prost(message, optional, tag = "3")]
    pub v_region: Option<LayerRegion>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Layer {
    #[prost(enumeration = "LayerType", required, tag = "1")]
    pub r#type: i32,
    #[prost(uint64, required, tag = "2")]
    pub ptr: u64,
    #[prost(uint64, required, tag = "3")]
    pub parent_ptr: u64,
    #[prost(message, optional, tag = "10")]
    pub clip: Option<LayerRect>,
    #[prost(message, optional, tag = "11")]
    pub transform: Option<LayerMatrix>,
    #[prost(message, optional, tag = "12")]
    pub v_region: Option<LayerRegion>,
    #[prost(message, optional, tag = "13")]
    pub shadow: Option<LayerShadow>,
    #[prost(float, optional, tag = "14")]
    pub opacity: Option<f32>,
    #[prost(bool, optional, tag = "15")]
    pub c_opaque: Option<bool>,
    #[prost(bool, optional, tag = "16")]
    pub c_alpha: Option<bool>,
    #[prost(enumeration = "ScrollingDirect", optional, tag = "17")]
    pub direct: Option<i32>,
    #[prost(uint64, optional, tag = "18")]
    pub bar_id: Option<u64>,
    #[prost(uint64, optional, tag = "19")]
    pub mask: Option<u64>,
    #[prost(message, optional, tag = "20")]
    pub hit_region: Option<LayerRegion>,
    #[prost(message, optional, tag = "100")]
    pub valid: Option<LayerRegion>,
    #[prost(uint32, optional, tag = "101")]
    pub color: Option<u32>,
    #[prost(enumeration = "Filter", optional, tag = "102")]
    pub filter: Option<i32>,
    #[prost(uint64, optional, tag = "103")]
    pub ref_id: Option<u64>,
    #[prost(message, optional, tag = "104")]
    pub size: Option<LayerSize>,
    #[prost(uint32, optional, tag = "105")]
    pub display_list_log_length: Option<u32>,
    #[prost(bytes = "vec", optional, tag = "106")]
    pub display_list_log: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LayersPacket {
    #[prost(message, repeated, tag = "1")]
    pub layer: Vec<Layer>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetaPacket {
    #[prost(bool, optional, tag = "1")]
    pub composed_by_hwc: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DrawRect {
    #[prost(float, required, tag = "1")]
    pub x: f32,
    #[prost(float, required, tag = "2")]
    pub y: f32,
    #[prost(float, required, tag = "3")]
    pub w: f32,
    #[prost(float, required, tag = "4")]
    pub h: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DrawPacket {
    #[prost(float, required, tag = "1")]
    pub offset_x: f32,
    #[prost(float, required, tag = "2")]
    pub offset_y: f32,
    #[prost(float, repeated, packed = "false", tag = "3")]
    pub mv_matrix: Vec<f32>,
    #[prost(uint32, required, tag = "4")]
    pub total_rects: u32,
    #[prost(message, repeated, tag = "5")]
    pub layer_rect: Vec<DrawRect>,
    #[prost(uint64, required, tag = "6")]
    pub layerref: u64,
    #[prost(uint32, repeated, packed = "false", tag = "7")]
    pub tex_ids: Vec<u32>,
}

/// Top-level message carried by every transport frame.
///
/// `type` is declared optional so a packet that omits it is distinguishable from FRAMESTART.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Packet {
    #[prost(enumeration = "DataType", optional, tag = "1")]
    pub r#type: Option<i32>,
    #[prost(message, optional, tag = "2")]
    pub frame: Option<FramePacket>,
    #[prost(message, optional, tag = "3")]
    pub color: Option<ColorPacket>,
    #[prost(message, optional, tag = "4")]
    pub texture: Option<TexturePacket>,
    #[prost(message, optional, tag = "5")]
    pub layers: Option<LayersPacket>,
    #[prost(message, optional, tag = "6")]
    pub meta: Option<MetaPacket>,
    #[prost(message, optional, tag = "7")]
    pub draw: Option<DrawPacket>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum CmdType {
    NoOp = 0,
    LayersTree = 1,
    LayersBuffer = 2,
}

/// Viewer-to-target request toggling a capture option.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CommandPacket {
    #[prost(enumeration = "CmdType", required, tag = "1")]
    pub r#type: i32,
    #[prost(bool, optional, tag = "2")]
    pub value: Option<bool>,
}
