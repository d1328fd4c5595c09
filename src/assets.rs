//! Sprite and raster-track loading
//!
//! Images are loaded once and handed out by name. Collision footprints are
//! derived from a sprite's alpha channel after scaling it to the car size.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::UVec2;
use image::{RgbaImage, imageops};

use crate::sim::{CollisionMask, FinalizedTrack, SpawnPose, SurfacePolarity};

/// Loaded images keyed by file stem
#[derive(Debug, Default)]
pub struct Assets {
    root: PathBuf,
    sprites: HashMap<String, RgbaImage>,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sprites: HashMap::new(),
        }
    }

    /// Load `<root>/<name>.png` unless it is already cached
    pub fn load_sprite(&mut self, name: &str) -> image::ImageResult<&RgbaImage> {
        if !self.sprites.contains_key(name) {
            let path = self.root.join(format!("{name}.png"));
            let image = image::open(&path)?.to_rgba8();
            log::debug!(
                "Loaded sprite {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            self.sprites.insert(name.to_string(), image);
        }
        Ok(&self.sprites[name])
    }

    /// Register an already decoded sprite
    pub fn insert_sprite(&mut self, name: impl Into<String>, image: RgbaImage) {
        self.sprites.insert(name.into(), image);
    }

    pub fn sprite(&self, name: &str) -> Option<&RgbaImage> {
        self.sprites.get(name)
    }

    /// Footprint mask for a sprite drawn at `size`
    pub fn footprint(&self, name: &str, size: UVec2) -> Option<CollisionMask> {
        let sprite = self.sprites.get(name)?;
        Some(footprint_from_sprite(sprite, size))
    }
}

/// Scale `sprite` to `size` and take its opaque pixels as the footprint
pub fn footprint_from_sprite(sprite: &RgbaImage, size: UVec2) -> CollisionMask {
    if sprite.dimensions() == (size.x, size.y) {
        return CollisionMask::from_alpha(sprite);
    }
    let scaled = imageops::resize(sprite, size.x, size.y, imageops::FilterType::Nearest);
    CollisionMask::from_alpha(&scaled)
}

/// Race-ready track from a raster image; no gates, so no laps are counted
pub fn load_raster_track(
    path: &Path,
    scale: u32,
    polarity: SurfacePolarity,
    spawn: SpawnPose,
) -> image::ImageResult<FinalizedTrack> {
    let image = image::open(path)?.to_rgba8();
    let mask = CollisionMask::from_raster(&image, scale, polarity);
    log::info!(
        "Imported raster track {} at x{} ({}x{})",
        path.display(),
        scale,
        mask.width(),
        mask.height()
    );
    Ok(FinalizedTrack::from_raster(mask, spawn))
}
