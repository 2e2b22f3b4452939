/// Bit of the texture `dataformat` word marking an LZ4 block payload.
pub const LZ4_FORMAT_BIT: u32 = 1 << 16;
/// `GL_BGRA`.
pub const GL_BGRA: u32 = 0x80E1;
/// `GL_RGBA`.
pub const GL_RGBA: u32 = 0x1908;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Decoded view of a texture `dataformat` word.
pub struct TextureFormat {
    /// GL pixel format from the low 16 bits.
    pub gl_format: u32,
    /// Payload is a raw LZ4 block.
    pub lz4: bool,
}

impl TextureFormat {
    pub fn from_word(word: u32) -> Self {
        Self {
            gl_format: word & 0xFFFF,
            lz4: word & LZ4_FORMAT_BIT != 0,
        }
    }

    pub fn is_bgra(self) -> bool {
        self.gl_format == GL_BGRA
    }
}

/// Decompress an LZ4 block into a zeroed buffer of `expected_len` bytes.
///
/// On failure the buffer is returned as-is (possibly partially written) together with the error.
pub(crate) fn lz4_decompress(
    payload: &[u8],
    expected_len: usize,
) -> (Vec<u8>, Option<lz4_flex::block::DecompressError>) {
    let mut out = vec![0u8; expected_len];
    match lz4_flex::block::decompress_into(payload, &mut out) {
        Ok(written) => {
            if written < expected_len {
                tracing::trace!(written, expected_len, "lz4 payload shorter than stride*height");
            }
            (out, None)
        }
        Err(err) => (out, Some(err)),
    }
}

/// Copy `height` rows of `width` RGBA pixels, `stride` bytes apart in `src`, into a tightly
/// packed buffer. Missing source bytes read as zero.
pub(crate) fn pack_rows(src: &[u8], width: usize, height: usize, stride: usize) -> Vec<u8> {
    let row_len = width * 4;
    let mut out = vec![0u8; row_len * height];

    if stride == row_len {
        let n = out.len().min(src.len());
        out[..n].copy_from_slice(&src[..n]);
        return out;
    }

    for (j, dst_row) in out.chunks_exact_mut(row_len).enumerate() {
        let start = j.saturating_mul(stride);
        if start >= src.len() {
            break;
        }
        let end = start.saturating_add(row_len).min(src.len());
        dst_row[..end - start].copy_from_slice(&src[start..end]);
    }
    out
}

/// Swap the red and blue byte of every 4-byte pixel.
pub(crate) fn swap_red_blue_in_place(px: &mut [u8]) {
    for p in px.chunks_exact_mut(4) {
        p.swap(0, 2);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pixels.rs"]
mod tests;
