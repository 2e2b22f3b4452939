//! Frame data model and layer tree reconstruction.

/// Display-list dumps attached to painted layers.
pub mod display_list;
/// Frames, layers, textures and draw records.
pub mod model;
/// Flat layer records to layer forest.
pub mod tree;
