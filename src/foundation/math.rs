use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x4c53_636f_7065_0001;

/// Streaming 128-bit content hasher used for texture payload identity.
pub(crate) struct ContentHasher {
    inner: Xxh3,
}

impl ContentHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn finish128(&self) -> u128 {
        self.inner.digest128()
    }
}

pub(crate) fn content_hash128(bytes: &[u8]) -> u128 {
    let mut h = ContentHasher::new();
    h.write_bytes(bytes);
    h.finish128()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
