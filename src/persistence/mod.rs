//! Track save/load by name
//!
//! One JSON file per track under the store's root directory:
//! `{ "Points": [[x, y], ...], "SpawnPoint": [x, y], "TrackWidth": w, "TrackColour": [r, g, b] }`

mod error;

pub use error::TrackLoadError;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Track;

/// On-disk track layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFile {
    #[serde(rename = "Points")]
    pub points: Vec<[f32; 2]>,
    #[serde(rename = "SpawnPoint")]
    pub spawn_point: [f32; 2],
    #[serde(rename = "TrackWidth")]
    pub track_width: f32,
    #[serde(rename = "TrackColour")]
    pub track_colour: [u8; 3],
}

impl From<&Track> for TrackFile {
    fn from(track: &Track) -> Self {
        Self {
            points: track.points.iter().map(|p| p.to_array()).collect(),
            spawn_point: track.spawn_point.to_array(),
            track_width: track.track_width,
            track_colour: track.track_colour,
        }
    }
}

impl From<TrackFile> for Track {
    fn from(file: TrackFile) -> Self {
        Self {
            points: file.points.into_iter().map(Vec2::from_array).collect(),
            spawn_point: Vec2::from_array(file.spawn_point),
            track_width: file.track_width,
            track_colour: file.track_colour,
            ..Track::default()
        }
    }
}

/// Directory of named track files
#[derive(Debug, Clone)]
pub struct TrackStore {
    root: PathBuf,
}

impl TrackStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    pub fn load(&self, name: &str) -> Result<Track, TrackLoadError> {
        let path = self.path_for(name);
        let json = fs::read_to_string(&path).map_err(|source| TrackLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let file: TrackFile =
            serde_json::from_str(&json).map_err(|source| TrackLoadError::Malformed {
                path: path.clone(),
                source,
            })?;
        log::info!("Loaded track '{}' ({} points)", name, file.points.len());
        Ok(file.into())
    }

    pub fn save(&self, name: &str, track: &Track) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string(&TrackFile::from(track)).map_err(io::Error::other)?;
        let path = self.path_for(name);
        fs::write(&path, json)?;
        log::info!("Saved track '{}' to {}", name, path.display());
        Ok(())
    }

    /// Names of all stored tracks, sorted. A missing directory lists nothing.
    pub fn list(&self) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
