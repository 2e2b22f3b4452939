//! Texture payload normalization and the content-addressed image cache.

/// Texture format words and pixel normalization.
pub mod pixels;
/// Content-addressed texture cache.
pub mod texture_cache;
