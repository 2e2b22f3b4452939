use crate::{
    assets::texture_cache::ContentKey,
    foundation::core::{FloatRect, IntRect, IntSize, LayerMatrix},
    frame::display_list::DisplayList,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One compositor snapshot, the unit handed to rendering.
///
/// A frame is plain data: it serializes to JSON for persistence, with display-item parent links
/// skipped (see [`Frame::relink`]).
pub struct Frame {
    /// Capture timestamp reported by FRAMESTART (0 when the frame was opened implicitly).
    pub id: u64,
    /// Solid-color layers in arrival order.
    pub colors: Vec<ColorEntry>,
    /// Texture references in arrival order.
    pub texture_nodes: Vec<TextureNode>,
    /// Reconstructed layer forest (usually a single root).
    pub layer_tree: Vec<LayerTreeNode>,
    /// Per-quad draw calls (only emitted by targets using the quad renderer).
    #[serde(default)]
    pub draws: Vec<DrawObject>,
}

impl Frame {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.texture_nodes.is_empty()
            && self.layer_tree.is_empty()
            && self.draws.is_empty()
    }

    /// Depth-first search of every root for the layer at address `ptr`.
    pub fn find_layer_by_id(&self, ptr: u64) -> Option<&LayerTreeNode> {
        self.layer_tree.iter().find_map(|root| root.find(ptr))
    }

    /// Total number of layers reachable from the roots.
    pub fn layer_count(&self) -> usize {
        self.layer_tree.iter().map(LayerTreeNode::subtree_len).sum()
    }

    /// Distinct content keys referenced by this frame, in first-seen order.
    pub fn content_keys(&self) -> Vec<ContentKey> {
        let mut out = Vec::<ContentKey>::new();
        for key in self.texture_nodes.iter().filter_map(|n| n.content_key) {
            if !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }

    /// Rebuild display-item parent links after deserialization.
    pub fn relink(&mut self) {
        for root in &mut self.layer_tree {
            root.visit_mut(&mut |node| {
                if let Some(list) = node.value.display_list.as_mut() {
                    list.relink();
                }
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A solid-color layer.
pub struct ColorEntry {
    /// Owning layer address.
    pub layer_ref: u64,
    /// Packed little-endian ABGR.
    pub color: u32,
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl ColorEntry {
    /// Color as `[r, g, b, a]`.
    pub fn rgba(&self) -> [u8; 4] {
        crate::foundation::core::abgr_to_rgba(self.color)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// GL texture target a texture was bound to.
pub enum TextureTarget {
    /// `GL_TEXTURE_2D`.
    Texture2D,
    /// `GL_TEXTURE_EXTERNAL_OES`.
    External,
    /// `GL_TEXTURE_RECTANGLE`.
    Rectangle,
    /// Any other target enum, kept verbatim.
    Other(u32),
}

impl TextureTarget {
    const GL_TEXTURE_2D: u32 = 0x0DE1;
    const GL_TEXTURE_RECTANGLE: u32 = 0x84F5;
    const GL_TEXTURE_EXTERNAL: u32 = 0x8D65;

    pub fn from_gl(v: u32) -> Self {
        match v {
            Self::GL_TEXTURE_2D => Self::Texture2D,
            Self::GL_TEXTURE_EXTERNAL => Self::External,
            Self::GL_TEXTURE_RECTANGLE => Self::Rectangle,
            other => Self::Other(other),
        }
    }

    pub fn as_gl(self) -> u32 {
        match self {
            Self::Texture2D => Self::GL_TEXTURE_2D,
            Self::External => Self::GL_TEXTURE_EXTERNAL,
            Self::Rectangle => Self::GL_TEXTURE_RECTANGLE,
            Self::Other(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Reference from a frame to texture content held by the texture cache.
pub struct TextureNode {
    /// GL texture name reported by the target.
    pub name: u32,
    /// GL texture target.
    pub target: TextureTarget,
    /// Key into the texture cache. Never embeds pixels. `None` for a zero-area upload, which
    /// has no content to cache.
    pub content_key: Option<ContentKey>,
    /// Address of the owning layer.
    pub layer_ref: u64,
    /// Owning GL context.
    pub context_ref: u64,
    /// True when this occurrence carried fresh pixel bytes.
    pub has_new_content: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Compositor layer class.
pub enum LayerKind {
    Unknown,
    LayerManager,
    Container,
    Painted,
    Canvas,
    Image,
    Color,
    Text,
    Ref,
    Readback,
    DisplayItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScrollDirection {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Sampling filter used when compositing an image or canvas layer.
pub enum ScaleFilter {
    Fast,
    Good,
    Best,
    Nearest,
    Bilinear,
    Gaussian,
    Sentinel,
    Linear,
    Point,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Pre-transform geometry recorded for layers with a shadow (async) transform.
pub struct LayerShadow {
    pub clip: Option<IntRect>,
    pub transform: Option<LayerMatrix>,
    pub region: Option<Vec<IntRect>>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One flat layer entry from a LAYERS packet.
pub struct LayerRecord {
    /// Layer class.
    pub layer_type: LayerKind,
    /// Address of this layer.
    pub ptr: u64,
    /// Address of the parent layer, 0 for a root.
    pub parent_ptr: u64,
    pub clip: Option<IntRect>,
    pub transform: Option<LayerMatrix>,
    /// Visible region.
    pub region: Option<Vec<IntRect>>,
    pub shadow: Option<LayerShadow>,
    pub opacity: Option<f32>,
    /// Content is opaque.
    pub opaque: Option<bool>,
    /// Uses component alpha.
    pub alpha: Option<bool>,
    pub scroll_dir: Option<ScrollDirection>,
    pub bar_id: Option<u64>,
    /// Address of the mask layer.
    pub mask: Option<u64>,
    pub hit_region: Option<Vec<IntRect>>,

    // Variant-specific fields.
    /// Valid region (painted layers).
    pub valid: Option<Vec<IntRect>>,
    /// Fill color (color layers), packed ABGR.
    pub color: Option<u32>,
    /// Scale filter (image and canvas layers).
    pub filter: Option<ScaleFilter>,
    /// Target layers id (ref layers).
    pub ref_id: Option<u64>,
    /// Readback size (readback layers).
    pub size: Option<IntSize>,
    /// Parsed display list (painted layers, when the target dumps one).
    pub display_list: Option<DisplayList>,
}

impl LayerRecord {
    /// Minimal record with only identity fields set.
    pub fn new(layer_type: LayerKind, ptr: u64, parent_ptr: u64) -> Self {
        Self {
            layer_type,
            ptr,
            parent_ptr,
            clip: None,
            transform: None,
            region: None,
            shadow: None,
            opacity: None,
            opaque: None,
            alpha: None,
            scroll_dir: None,
            bar_id: None,
            mask: None,
            hit_region: None,
            valid: None,
            color: None,
            filter: None,
            ref_id: None,
            size: None,
            display_list: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_ptr == 0
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A node of the reconstructed layer forest.
pub struct LayerTreeNode {
    pub value: LayerRecord,
    /// Children in flat-list encounter order.
    pub children: Vec<LayerTreeNode>,
}

impl LayerTreeNode {
    pub fn new(value: LayerRecord) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    pub fn find(&self, ptr: u64) -> Option<&LayerTreeNode> {
        if self.value.ptr == ptr {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(ptr))
    }

    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(LayerTreeNode::subtree_len)
            .sum::<usize>()
    }

    pub(crate) fn visit_mut(&mut self, f: &mut impl FnMut(&mut LayerTreeNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One GPU draw call (quad-based renderer variant).
pub struct DrawObject {
    pub layer_ref: u64,
    /// Column-major 4x4 model-view matrix.
    pub mv_matrix: [f32; 16],
    pub offset_x: f32,
    pub offset_y: f32,
    /// Sub-rectangles batched into this call; exactly `total_rects` entries.
    pub layer_rects: Vec<FloatRect>,
    /// Number of instanced rectangles, in `1..=4`.
    pub total_rects: u32,
    /// GL texture names bound for the call.
    #[serde(default)]
    pub tex_ids: Vec<u32>,
}

impl DrawObject {
    pub const MAX_RECTS: u32 = 4;
}

#[cfg(test)]
#[path = "../../tests/unit/frame/model.rs"]
mod tests;
