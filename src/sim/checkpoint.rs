//! Ordered gates across the track, used to validate lap progress

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spline::CurveSegment;
use crate::point_segment_distance;

/// A gate segment perpendicular to the centerline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub a: Vec2,
    pub b: Vec2,
}

impl Checkpoint {
    /// Gate midpoint (the centerline sample it was built from)
    pub fn center(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// Distance from `p` to the gate segment
    pub fn distance_to(&self, p: Vec2) -> f32 {
        point_segment_distance(p, self.a, self.b)
    }
}

/// Where gates are placed along each segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckpointParams {
    /// Emit a gate every `frequency` samples
    pub frequency: usize,
    /// Samples at each end of a segment that never get a gate
    pub edge_offset: usize,
}

/// Derive gates along `curves` in traversal order.
///
/// Each gate spans `track_width` to either side of its centerline sample.
pub fn derive(
    curves: &[CurveSegment],
    track_width: f32,
    params: CheckpointParams,
) -> Vec<Checkpoint> {
    let frequency = params.frequency.max(1);
    let offset = params.edge_offset;
    let mut checkpoints = Vec::new();

    for curve in curves {
        let usable = curve.len().saturating_sub(offset * 2 + 1);
        for index in 0..usable {
            let k = index + offset;
            if k % frequency != 0 {
                continue;
            }
            let point = curve.points[k];
            let Some(tangent) = (curve.points[k + 1] - point).try_normalize() else {
                continue;
            };
            let normal = tangent.perp() * track_width;
            checkpoints.push(Checkpoint {
                a: point + normal,
                b: point - normal,
            });
        }
    }

    log::debug!("Derived {} checkpoints from {} curves", checkpoints.len(), curves.len());
    checkpoints
}
