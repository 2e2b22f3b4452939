//! Archive directories: `layertree.json` plus `image/<key>.png`.

/// Export and import of frames and cached images.
pub mod archive;
