/// Integer rectangle in layer or device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Float rectangle used by per-quad draw records.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FloatRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntSize {
    pub w: i32,
    pub h: i32,
}

/// Layer transform as dumped by the compositor.
///
/// `m` holds 6 entries for a 2D affine (`is_2d`) and 16 for a full 3D matrix, row-major.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerMatrix {
    pub is_2d: bool,
    pub is_id: bool,
    pub m: Vec<f32>,
}

/// Split a 64-bit address or timestamp into its `(high, low)` 32-bit halves.
pub fn split_u64(v: u64) -> (u32, u32) {
    ((v >> 32) as u32, v as u32)
}

/// Join `(high, low)` 32-bit halves back into one 64-bit value.
pub fn join_u64(high: u32, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

/// Format a 64-bit value as a fixed-width `0x` prefixed hex string (16 digits).
pub fn hex16(v: u64) -> String {
    format!("0x{v:016x}")
}

/// Unpack a little-endian ABGR color word into `[r, g, b, a]`.
pub fn abgr_to_rgba(v: u32) -> [u8; 4] {
    let [r, g, b, a] = v.to_le_bytes();
    [r, g, b, a]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
