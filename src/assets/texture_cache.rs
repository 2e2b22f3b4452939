use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use crate::{
    assets::pixels::{self, TextureFormat},
    foundation::error::{LayerScopeError, LayerScopeResult},
    foundation::math::content_hash128,
};

/// Upper bound on one normalized texture (256 MiB); larger dimensions are treated as corrupt.
pub const MAX_TEXTURE_BYTES: usize = 256 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Opaque dedup handle for texture content: a 128-bit hash of the raw wire payload.
///
/// Serializes as a 32-digit lower-case hex string, which is also its archive file stem.
pub struct ContentKey(u128);

impl ContentKey {
    pub fn from_u128(raw: u128) -> Self {
        Self(raw)
    }

    pub fn as_u128(self) -> u128 {
        self.0
    }

    /// Key for a raw (pre-decompression) payload.
    pub fn for_payload(payload: &[u8]) -> Self {
        Self(content_hash128(payload))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for ContentKey {
    type Err = LayerScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(LayerScopeError::serde(format!(
                "content key must be 32 hex digits, got '{s}'"
            )));
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| LayerScopeError::serde(format!("invalid content key '{s}': {e}")))
    }
}

impl serde::Serialize for ContentKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ContentKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Normalized texture content.
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major, tightly packed RGBA8 (straight alpha).
    pub rgba8: Arc<Vec<u8>>,
}

/// Content-addressed store of decoded texture images.
///
/// Identical payloads are decompressed and normalized once; later occurrences return the existing
/// key. `intern` takes `&mut self`, so decoding is serialized per cache; images are handed out as
/// `Arc`s for concurrent readers.
#[derive(Clone, Debug, Default)]
pub struct TextureCache {
    images: HashMap<ContentKey, Arc<DecodedImage>>,
    fresh: Vec<ContentKey>,
    decode_count: u64,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern one texture payload and return its content key.
    ///
    /// Returns `Ok(None)`, the invalid key, for a zero-area or oversized texture: a malformed but
    /// recoverable packet. An empty `payload` is a caller bug and returns an error.
    pub fn intern(
        &mut self,
        payload: &[u8],
        width: u32,
        height: u32,
        data_format: u32,
        stride: u32,
    ) -> LayerScopeResult<Option<ContentKey>> {
        if payload.is_empty() {
            return Err(LayerScopeError::texture(
                "intern called without pixel bytes",
            ));
        }
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "ignoring zero-area texture");
            return Ok(None);
        }
        let Some(packed_len) = packed_len(width, height) else {
            tracing::warn!(width, height, "ignoring texture larger than the decode limit");
            return Ok(None);
        };

        let key = ContentKey::for_payload(payload);
        if self.images.contains_key(&key) {
            return Ok(Some(key));
        }

        let format = TextureFormat::from_word(data_format);
        let (w, h) = (width as usize, height as usize);
        // Targets that omit the stride send tightly packed rows.
        let stride = if stride == 0 { w * 4 } else { stride as usize };

        let decompressed;
        let source: &[u8] = if format.lz4 {
            let expected = stride.saturating_mul(h).min(MAX_TEXTURE_BYTES);
            let (buf, err) = pixels::lz4_decompress(payload, expected);
            if let Some(err) = err {
                tracing::warn!(%key, error = %err, "lz4 decompression failed, keeping partial pixels");
            }
            decompressed = buf;
            &decompressed
        } else {
            payload
        };

        let mut rgba8 = pixels::pack_rows(source, w, h, stride);
        debug_assert_eq!(rgba8.len(), packed_len);
        if format.is_bgra() {
            pixels::swap_red_blue_in_place(&mut rgba8);
        }

        self.decode_count += 1;
        self.images.insert(
            key,
            Arc::new(DecodedImage {
                width,
                height,
                rgba8: Arc::new(rgba8),
            }),
        );
        self.fresh.push(key);
        Ok(Some(key))
    }

    /// Look up an interned image. `None` means "not available yet", not an error.
    pub fn lookup(&self, key: &ContentKey) -> Option<Arc<DecodedImage>> {
        self.images.get(key).cloned()
    }

    pub fn contains(&self, key: &ContentKey) -> bool {
        self.images.contains_key(key)
    }

    /// Insert an already-decoded image (archive import). An existing entry is kept.
    pub fn insert_image(&mut self, key: ContentKey, image: DecodedImage) {
        if self.images.contains_key(&key) {
            tracing::debug!(%key, "image already cached, keeping existing entry");
            return;
        }
        self.images.insert(key, Arc::new(image));
    }

    /// Drain images interned since the previous call, in intern order.
    pub fn take_new_images(&mut self) -> Vec<(ContentKey, Arc<DecodedImage>)> {
        let fresh = std::mem::take(&mut self.fresh);
        fresh
            .into_iter()
            .filter_map(|k| self.images.get(&k).map(|img| (k, Arc::clone(img))))
            .collect()
    }

    /// Iterate all cached images in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ContentKey, &Arc<DecodedImage>)> {
        let mut keys: Vec<&ContentKey> = self.images.keys().collect();
        keys.sort();
        keys.into_iter().map(|k| (*k, &self.images[k]))
    }

    /// Number of payloads actually decompressed/normalized.
    pub fn decode_count(&self) -> u64 {
        self.decode_count
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.fresh.clear();
        self.decode_count = 0;
    }
}

fn packed_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
        .filter(|&n| n <= MAX_TEXTURE_BYTES)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/texture_cache.rs"]
mod tests;
