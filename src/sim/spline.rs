//! Closed Catmull-Rom loops through user-placed control points
//!
//! A loop of `n` control points yields `n` segments, one per pair of
//! consecutive points (wrapping last to first). Each segment is sampled from a
//! 4-point window: the segment's two endpoints plus one neighbour on each side.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_LOOP_POINTS;
use crate::tuning::TrackTuning;

/// How densely a segment is sampled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleDensity {
    /// Samples used for short segments
    pub min_samples: usize,
    /// Chord length above which `spacing` takes over
    pub long_chord: f32,
    /// Target distance between samples on long segments
    pub spacing: f32,
}

impl SampleDensity {
    /// Coarser sampling used for editing, drawing and checkpoints
    pub fn edit(tuning: &TrackTuning) -> Self {
        Self {
            min_samples: tuning.min_curve_samples,
            long_chord: tuning.long_chord,
            spacing: tuning.edit_spacing,
        }
    }

    /// Denser sampling used once to rasterize the collision mask
    pub fn collision(tuning: &TrackTuning) -> Self {
        Self {
            min_samples: tuning.min_curve_samples,
            long_chord: tuning.long_chord,
            spacing: tuning.collision_spacing,
        }
    }

    /// Sample count for a segment whose inner points are `chord` apart
    pub fn samples_for(&self, chord: f32) -> usize {
        let min = self.min_samples.max(1);
        if chord > self.long_chord && self.spacing > 0.0 {
            ((chord / self.spacing) as usize).max(min)
        } else {
            min
        }
    }
}

impl Default for SampleDensity {
    fn default() -> Self {
        Self::edit(&TrackTuning::default())
    }
}

/// Evaluate the Catmull-Rom cubic for window `p` at `t` in [0, 1].
///
/// Passes through `p[1]` at t=0 and `p[2]` at t=1.
#[inline]
pub fn catmull_rom(p: &[Vec2; 4], t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p[1]
        + (-p[0] + p[2]) * t
        + (2.0 * p[0] - 5.0 * p[1] + 4.0 * p[2] - p[3]) * t2
        + (-p[0] + 3.0 * p[1] - 3.0 * p[2] + p[3]) * t3)
}

/// Lazy sampler over one spline window.
///
/// Yields `samples + 1` points, t = 0, 1/samples, ..., 1.
#[derive(Debug, Clone)]
pub struct CurveSampler {
    window: [Vec2; 4],
    samples: usize,
    next: usize,
}

impl CurveSampler {
    pub fn new(window: [Vec2; 4], density: &SampleDensity) -> Self {
        let samples = density.samples_for(window[1].distance(window[2]));
        Self {
            window,
            samples,
            next: 0,
        }
    }
}

impl Iterator for CurveSampler {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.next > self.samples {
            return None;
        }
        let t = self.next as f32 / self.samples as f32;
        self.next += 1;
        Some(catmull_rom(&self.window, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.samples + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveSampler {}

/// One sampled spline piece between two consecutive control points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub points: Vec<Vec2>,
}

impl CurveSegment {
    pub fn first(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Vec2> for CurveSegment {
    fn from_iter<I: IntoIterator<Item = Vec2>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Index windows for a closed loop of `n` points, in traversal order.
///
/// Window `k` covers the segment from point `k` to point `k + 1` (mod n).
pub fn loop_windows(n: usize) -> Vec<[usize; 4]> {
    if n < MIN_LOOP_POINTS {
        return Vec::new();
    }
    let mut windows = Vec::with_capacity(n);
    windows.push([n - 1, 0, 1, 2]);
    for i in 0..n - 3 {
        windows.push([i, i + 1, i + 2, i + 3]);
    }
    windows.push([n - 3, n - 2, n - 1, 0]);
    windows.push([n - 2, n - 1, 0, 1]);
    windows
}

/// Lazily sample every segment of the loop through `points`
pub fn curve_samplers<'a>(
    points: &'a [Vec2],
    density: &'a SampleDensity,
) -> impl Iterator<Item = CurveSampler> + 'a {
    loop_windows(points.len()).into_iter().map(move |w| {
        CurveSampler::new(
            [points[w[0]], points[w[1]], points[w[2]], points[w[3]]],
            density,
        )
    })
}

/// Build all curve segments of the closed loop through `points`.
///
/// Returns an empty list for fewer than four points.
pub fn build_curves(points: &[Vec2], density: &SampleDensity) -> Vec<CurveSegment> {
    curve_samplers(points, density)
        .map(|sampler| sampler.collect())
        .collect()
}

/// Total number of samples across all segments
pub fn sample_count(curves: &[CurveSegment]) -> usize {
    curves.iter().map(CurveSegment::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1000.0, 0.0),
            Vec2::new(1000.0, 1000.0),
            Vec2::new(0.0, 1000.0),
        ]
    }

    #[test]
    fn test_too_few_points_builds_nothing() {
        let density = SampleDensity::default();
        assert!(build_curves(&[], &density).is_empty());
        assert!(build_curves(&square()[..3], &density).is_empty());
    }

    #[test]
    fn test_square_builds_four_segments() {
        let density = SampleDensity::default();
        let curves = build_curves(&square(), &density);
        assert_eq!(curves.len(), 4);
        for curve in &curves {
            assert!(curve.len() >= density.min_samples);
        }
    }

    #[test]
    fn test_segments_pass_through_control_points() {
        let points = square();
        let curves = build_curves(&points, &SampleDensity::default());
        for (k, curve) in curves.iter().enumerate() {
            let start = curve.first().unwrap();
            let end = curve.last().unwrap();
            assert!(start.distance(points[k]) < 1e-3, "segment {k} start");
            assert!(end.distance(points[(k + 1) % points.len()]) < 1e-3, "segment {k} end");
        }
    }

    #[test]
    fn test_loop_is_continuous() {
        let points = vec![
            Vec2::new(100.0, 200.0),
            Vec2::new(2400.0, 150.0),
            Vec2::new(2600.0, 1900.0),
            Vec2::new(1300.0, 2300.0),
            Vec2::new(300.0, 1500.0),
        ];
        let curves = build_curves(&points, &SampleDensity::default());
        assert_eq!(curves.len(), points.len());
        for i in 0..curves.len() {
            let end = curves[i].last().unwrap();
            let next_start = curves[(i + 1) % curves.len()].first().unwrap();
            assert!(end.distance(next_start) < 1e-2, "gap after segment {i}");
        }
    }

    #[test]
    fn test_long_chords_sample_by_spacing() {
        let density = SampleDensity {
            min_samples: 50,
            long_chord: 1000.0,
            spacing: 25.0,
        };
        assert_eq!(density.samples_for(500.0), 50);
        assert_eq!(density.samples_for(1000.0), 50);
        assert_eq!(density.samples_for(2000.0), 80);

        let tuning = TrackTuning::default();
        let fine = SampleDensity::collision(&tuning);
        assert_eq!(fine.samples_for(2000.0), 400);
    }

    #[test]
    fn test_sampler_is_lazy_and_exact_size() {
        let points = square();
        let mut sampler = CurveSampler::new(
            [points[3], points[0], points[1], points[2]],
            &SampleDensity::default(),
        );
        assert_eq!(sampler.len(), 51);
        sampler.next();
        assert_eq!(sampler.len(), 50);
        assert_eq!(sampler.count(), 50);
    }

    #[test]
    fn test_square_bulges_outward() {
        // Segment (0,0)->(1000,0) overshoots to y = -125 at its midpoint
        let points = square();
        let mid = catmull_rom(&[points[3], points[0], points[1], points[2]], 0.5);
        assert!((mid.x - 500.0).abs() < 1e-3);
        assert!((mid.y + 125.0).abs() < 1e-3);
    }
}
