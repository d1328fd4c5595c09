//! Game settings and preferences
//!
//! Persisted as JSON next to the track directory. Missing fields fall back to
//! their defaults so older settings files keep loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{CarTuning, TrackTuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub screen_width: u32,
    pub screen_height: u32,
    /// Frame rate cap; headless runs tick at this rate
    pub fps_cap: u32,

    // === Race ===
    /// Laps needed to win
    pub total_laps: u32,
    /// Computer-driven cars alongside the player
    pub agent_count: u32,
    /// Seed for the computer drivers
    pub agent_seed: u64,

    // === World ===
    /// Size of the raster a vector track is painted into
    pub world_width: u32,
    pub world_height: u32,
    /// Where named track files live
    pub tracks_dir: PathBuf,
    /// Camera easing per tick
    pub camera_scroll_speed: f32,

    // === Balance ===
    pub car: CarTuning,
    pub track: TrackTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1280,
            screen_height: 720,
            fps_cap: TARGET_FPS as u32,

            total_laps: DEFAULT_TOTAL_LAPS,
            agent_count: 1,
            agent_seed: 0,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            tracks_dir: PathBuf::from("assets/tracks"),
            camera_scroll_speed: CAMERA_SCROLL_SPEED,

            car: CarTuning::default(),
            track: TrackTuning::default(),
        }
    }
}

impl Settings {
    pub fn world_size(&self) -> UVec2 {
        UVec2::new(self.world_width, self.world_height)
    }

    /// Seconds per frame at the frame rate cap
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.fps_cap.max(1) as f32
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.screen_width as f32, self.screen_height as f32)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
