//! Editable track and its finalized, race-ready form

use glam::{UVec2, Vec2};

use super::checkpoint::{self, Checkpoint, CheckpointParams};
use super::mask::CollisionMask;
use super::spline::{self, CurveSegment, SampleDensity};
use crate::consts::*;
use crate::direction_to_heading;
use crate::tuning::TrackTuning;

/// RGB colour
pub type Colour = [u8; 3];

/// Where and which way cars start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPose {
    pub position: Vec2,
    /// Heading in degrees (0 = up the screen)
    pub heading: f32,
}

/// A loop of control points plus its appearance, as edited by the user
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub points: Vec<Vec2>,
    pub spawn_point: Vec2,
    pub spawn_angle: f32,
    pub track_width: f32,
    pub track_colour: Colour,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            spawn_point: Vec2::new(WORLD_WIDTH as f32 / 2.0, WORLD_HEIGHT as f32 / 2.0),
            spawn_angle: 0.0,
            track_width: DEFAULT_TRACK_WIDTH,
            track_colour: DEFAULT_TRACK_COLOUR,
        }
    }
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, pos: Vec2) {
        self.points.push(pos);
    }

    /// Out-of-range indices are ignored
    pub fn move_point(&mut self, index: usize, pos: Vec2) {
        if let Some(point) = self.points.get_mut(index) {
            *point = pos;
        }
    }

    /// Remove the point at `index`, or the last point when `None`.
    ///
    /// No-op on an empty track or an out-of-range index.
    pub fn remove_point(&mut self, index: Option<usize>) {
        let index = match index {
            Some(i) => i,
            None => match self.points.len().checked_sub(1) {
                Some(last) => last,
                None => return,
            },
        };
        if index < self.points.len() {
            self.points.remove(index);
        }
    }

    /// First point (in stored order) strictly within `radius` of `pos`
    pub fn hovered_point(&self, pos: Vec2, radius: f32) -> Option<usize> {
        self.points.iter().position(|p| p.distance(pos) < radius)
    }

    pub fn is_closed_loop(&self) -> bool {
        self.points.len() >= MIN_LOOP_POINTS
    }

    pub fn build_curves(&self, density: &SampleDensity) -> Vec<CurveSegment> {
        spline::build_curves(&self.points, density)
    }

    pub fn checkpoints(&self, curves: &[CurveSegment], tuning: &TrackTuning) -> Vec<Checkpoint> {
        checkpoint::derive(
            curves,
            self.track_width,
            CheckpointParams {
                frequency: tuning.checkpoint_frequency,
                edge_offset: tuning.checkpoint_edge_offset,
            },
        )
    }

    /// Compute curves, collision mask and checkpoints once for racing.
    ///
    /// Curves and checkpoints use edit-time sampling; the mask is painted from
    /// a denser resampling so the road edge stays smooth.
    pub fn finalize(&self, tuning: &TrackTuning, world_size: UVec2) -> FinalizedTrack {
        let curves = self.build_curves(&SampleDensity::edit(tuning));
        let checkpoints = self.checkpoints(&curves, tuning);

        let fine_curves = self.build_curves(&SampleDensity::collision(tuning));
        let mask = CollisionMask::build(&fine_curves, self.track_width, world_size);

        let spawn = spawn_from_curves(&curves).unwrap_or(SpawnPose {
            position: self.spawn_point,
            heading: self.spawn_angle,
        });

        log::info!(
            "Finalized track: {} points, {} curves, {} checkpoints",
            self.points.len(),
            curves.len(),
            checkpoints.len()
        );

        FinalizedTrack {
            curves,
            mask,
            checkpoints,
            spawn,
            track_width: self.track_width,
            track_colour: self.track_colour,
        }
    }
}

/// Spawn at the last control point, facing along the loop.
///
/// Uses the final two samples of the segment that ends at the last point.
fn spawn_from_curves(curves: &[CurveSegment]) -> Option<SpawnPose> {
    let curve = curves.len().checked_sub(2).map(|i| &curves[i])?;
    let [.., before, last] = curve.points.as_slice() else {
        return None;
    };
    let dir = (*last - *before).try_normalize()?;
    Some(SpawnPose {
        position: *last,
        heading: direction_to_heading(dir),
    })
}

/// Immutable race-ready track
#[derive(Debug, Clone)]
pub struct FinalizedTrack {
    pub curves: Vec<CurveSegment>,
    /// Set bits block movement
    pub mask: CollisionMask,
    pub checkpoints: Vec<Checkpoint>,
    pub spawn: SpawnPose,
    pub track_width: f32,
    pub track_colour: Colour,
}

impl FinalizedTrack {
    /// Race-ready track from an imported raster mask (no gates)
    pub fn from_raster(mask: CollisionMask, spawn: SpawnPose) -> Self {
        Self {
            curves: Vec::new(),
            mask,
            checkpoints: Vec::new(),
            spawn,
            track_width: 0.0,
            track_colour: DEFAULT_TRACK_COLOUR,
        }
    }

    /// Whether there is anything to drive on
    pub fn is_raceable(&self) -> bool {
        !self.mask.is_empty()
    }

    /// Whether laps can be counted on this track
    pub fn has_checkpoints(&self) -> bool {
        !self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Track {
        let mut track = Track::new();
        for p in [(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0), (0.0, 1000.0)] {
            track.add_point(Vec2::new(p.0, p.1));
        }
        track
    }

    #[test]
    fn test_editing_points() {
        let mut track = square();
        track.move_point(1, Vec2::new(900.0, 50.0));
        assert_eq!(track.points[1], Vec2::new(900.0, 50.0));

        track.remove_point(None);
        assert_eq!(track.points.len(), 3);
        assert!(!track.is_closed_loop());

        track.remove_point(Some(0));
        assert_eq!(track.points[0], Vec2::new(900.0, 50.0));

        // Out of range is ignored
        track.move_point(10, Vec2::ZERO);
        track.remove_point(Some(10));
        assert_eq!(track.points.len(), 2);

        let mut empty = Track::new();
        empty.remove_point(None);
        assert!(empty.points.is_empty());
    }

    #[test]
    fn test_hovered_point_is_first_match_not_nearest() {
        let mut track = Track::new();
        track.add_point(Vec2::new(0.0, 0.0));
        track.add_point(Vec2::new(10.0, 0.0));

        assert_eq!(track.hovered_point(Vec2::new(9.0, 0.0), 15.0), Some(0));
        assert_eq!(track.hovered_point(Vec2::new(20.0, 0.0), 15.0), Some(1));
        assert_eq!(track.hovered_point(Vec2::new(100.0, 0.0), 15.0), None);
        // Radius is exclusive
        assert_eq!(track.hovered_point(Vec2::new(25.0, 0.0), 15.0), None);
    }

    #[test]
    fn test_finalize_square() {
        let track = square();
        let finalized = track.finalize(&TrackTuning::default(), UVec2::new(1400, 1400));

        assert!(finalized.is_raceable());
        assert_eq!(finalized.curves.len(), 4);
        assert!(finalized.mask.is_drivable(Vec2::new(500.0, 0.0)));
        assert!(!finalized.mask.is_drivable(Vec2::new(500.0, 600.0)));

        // Spawn at the last control point, the loop curls up and left from there
        assert!(finalized.spawn.position.distance(Vec2::new(0.0, 1000.0)) < 1e-3);
        let facing = crate::heading_to_direction(finalized.spawn.heading);
        assert!(facing.x < 0.0 && facing.y < 0.0, "facing {facing}");
    }

    #[test]
    fn test_finalize_too_few_points_is_not_raceable() {
        let mut track = square();
        track.remove_point(None);
        let finalized = track.finalize(&TrackTuning::default(), UVec2::new(1400, 1400));

        assert!(!finalized.is_raceable());
        assert!(finalized.curves.is_empty());
        assert!(!finalized.has_checkpoints());
        assert_eq!(finalized.spawn.position, track.spawn_point);
    }
}
