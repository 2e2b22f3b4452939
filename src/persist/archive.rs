use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::texture_cache::{ContentKey, DecodedImage, TextureCache},
    foundation::error::{LayerScopeError, LayerScopeResult},
    frame::model::Frame,
};

/// Frames document inside an archive directory.
pub const LAYER_TREE_FILE: &str = "layertree.json";
/// Sub-directory holding one `<content key>.png` per cached image.
pub const IMAGE_DIR: &str = "image";

/// Write `frames` and every image in `cache` under `dir`.
#[tracing::instrument(skip_all, fields(dir = %dir.display(), frames = frames.len(), images = cache.len()))]
pub fn export(dir: &Path, frames: &[Frame], cache: &TextureCache) -> LayerScopeResult<()> {
    let image_dir = dir.join(IMAGE_DIR);
    std::fs::create_dir_all(&image_dir)
        .with_context(|| format!("create archive dir '{}'", image_dir.display()))?;

    for (key, img) in cache.iter() {
        let path = image_dir.join(format!("{key}.png"));
        image::save_buffer_with_format(
            &path,
            img.rgba8.as_slice(),
            img.width,
            img.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
    }

    let json = serde_json::to_vec(frames)?;
    let tree_path = dir.join(LAYER_TREE_FILE);
    std::fs::write(&tree_path, json)
        .with_context(|| format!("write '{}'", tree_path.display()))?;

    tracing::info!("archive written");
    Ok(())
}

/// Read an archive written by [`export`]. Display-list parent links are rebuilt.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn import(dir: &Path) -> LayerScopeResult<(Vec<Frame>, TextureCache)> {
    let tree_path = dir.join(LAYER_TREE_FILE);
    if !tree_path.is_file() {
        return Err(LayerScopeError::persist(format!(
            "'{}' is not a layerscope archive: missing {LAYER_TREE_FILE}",
            dir.display()
        )));
    }
    let bytes =
        std::fs::read(&tree_path).with_context(|| format!("read '{}'", tree_path.display()))?;
    let mut frames: Vec<Frame> = serde_json::from_slice(&bytes)?;
    for frame in &mut frames {
        frame.relink();
    }

    let mut cache = TextureCache::new();
    let image_dir = dir.join(IMAGE_DIR);
    if image_dir.is_dir() {
        let entries = std::fs::read_dir(&image_dir)
            .with_context(|| format!("list '{}'", image_dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<ContentKey>().ok())
            else {
                tracing::warn!(path = %path.display(), "skipping image with a non-key file name");
                continue;
            };

            let rgba = image::open(&path)?.to_rgba8();
            let (width, height) = rgba.dimensions();
            cache.insert_image(
                key,
                DecodedImage {
                    width,
                    height,
                    rgba8: Arc::new(rgba.into_raw()),
                },
            );
        }
    }

    tracing::info!(frames = frames.len(), images = cache.len(), "archive loaded");
    Ok((frames, cache))
}

#[cfg(test)]
#[path = "../../tests/unit/persist/archive.rs"]
mod tests;
