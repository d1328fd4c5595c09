//! Track editor interaction
//!
//! Left click on empty ground adds a point, left click on a point picks it up,
//! the picked point follows the pointer until the next left click drops it.
//! Right click deletes the point under the pointer.

use glam::Vec2;

use crate::consts::POINT_PICK_RADIUS;
use crate::input::{InputSnapshot, PointerButton};
use crate::sim::{Checkpoint, CurveSegment, SampleDensity, Track};
use crate::tuning::TrackTuning;

/// Curves and gates for drawing the track being edited
#[derive(Debug, Clone, Default)]
pub struct EditorPreview {
    pub curves: Vec<CurveSegment>,
    pub checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Clone)]
pub struct Editor {
    pub track: Track,
    /// World units per screen pixel
    pub zoom: f32,
    pub pick_radius: f32,
    selected: Option<usize>,
}

impl Editor {
    pub fn new(track: Track, zoom: f32) -> Self {
        Self {
            track,
            zoom,
            pick_radius: POINT_PICK_RADIUS,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen * self.zoom
    }

    /// Apply this tick's clicks, then drag the picked point to the pointer
    pub fn handle(&mut self, input: &InputSnapshot) {
        let pointer = self.to_world(input.pointer);

        for &button in &input.clicks {
            match button {
                PointerButton::Left => self.left_click(pointer),
                PointerButton::Right => self.right_click(pointer),
            }
        }

        if let Some(index) = self.selected {
            self.track.move_point(index, pointer);
        }
    }

    fn left_click(&mut self, pointer: Vec2) {
        if self.selected.take().is_some() {
            return;
        }
        match self.track.hovered_point(pointer, self.pick_radius) {
            Some(index) => self.selected = Some(index),
            None => {
                self.track.add_point(pointer);
                log::debug!("Added point {} at {}", self.track.points.len() - 1, pointer);
            }
        }
    }

    fn right_click(&mut self, pointer: Vec2) {
        let Some(index) = self.track.hovered_point(pointer, self.pick_radius) else {
            return;
        };
        self.track.remove_point(Some(index));
        // Keep the selection pointing at the same point
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
    }

    /// Curves and gates at edit-time sampling
    pub fn preview(&self, tuning: &TrackTuning) -> EditorPreview {
        let curves = self.track.build_curves(&SampleDensity::edit(tuning));
        let checkpoints = self.track.checkpoints(&curves, tuning);
        EditorPreview {
            curves,
            checkpoints,
        }
    }
}
