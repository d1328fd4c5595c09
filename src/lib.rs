//! Spline Racer - a 2D track editor and arcade racing core
//!
//! Core modules:
//! - `sim`: Track geometry, collision masks, vehicle dynamics, lap tracking
//! - `editor`: Control point editing driven by pointer events
//! - `render`: Abstract drawing surface and draw routines
//! - `persistence`: Track save/load by name
//! - `mode`: Top-level mode state machine
//! - `tuning`: Data-driven car and track balance
//! - `settings`: Player-facing configuration loaded from JSON
//! - `assets`: Sprite cache, footprints and raster track import

pub mod assets;
pub mod editor;
pub mod input;
pub mod mode;
pub mod persistence;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::{TrackLoadError, TrackStore};
pub use settings::Settings;
pub use tuning::{CarTuning, TrackTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-tick tuning constants assume
    pub const TARGET_FPS: f32 = 60.0;

    /// World raster dimensions (pixels) for vector-built tracks
    pub const WORLD_WIDTH: u32 = 6000;
    pub const WORLD_HEIGHT: u32 = 6000;

    /// Steering lock in degrees
    pub const MAX_WHEEL_ANGLE: f32 = 45.0;

    /// Per-tick speed loss factor when scraping a wall (10 / FPS)
    pub const WALL_SCRAPE_DAMPING: f32 = 10.0 / TARGET_FPS;

    /// Minimum control points for a closed spline loop
    pub const MIN_LOOP_POINTS: usize = 4;

    /// Default track appearance
    pub const DEFAULT_TRACK_WIDTH: f32 = 250.0;
    pub const DEFAULT_TRACK_COLOUR: [u8; 3] = [50, 50, 50];

    /// Editor pick radius for control points
    pub const POINT_PICK_RADIUS: f32 = 15.0;

    /// Camera easing factor per tick
    pub const CAMERA_SCROLL_SPEED: f32 = 0.1;

    /// Default race length
    pub const DEFAULT_TOTAL_LAPS: u32 = 3;
}

/// Unit direction a vehicle faces for a heading in degrees.
///
/// Heading 0 points up the screen (negative y) and increases clockwise.
#[inline]
pub fn heading_to_direction(heading_deg: f32) -> Vec2 {
    let rad = heading_deg.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

/// Inverse of [`heading_to_direction`], for any non-zero direction
#[inline]
pub fn direction_to_heading(dir: Vec2) -> f32 {
    dir.x.atan2(-dir.y).to_degrees()
}

/// Move `value` toward zero by `amount` without crossing it
#[inline]
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}

/// Shortest distance from `p` to segment `a`-`b`
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Whether segments `p1`-`p2` and `q1`-`q2` intersect (touching counts)
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = (p2 - p1).perp_dot(q1 - p1);
    let d2 = (p2 - p1).perp_dot(q2 - p1);
    let d3 = (q2 - q1).perp_dot(p1 - q1);
    let d4 = (q2 - q1).perp_dot(p2 - q1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Collinear / endpoint touching cases
    let on_segment = |a: Vec2, b: Vec2, p: Vec2| point_segment_distance(p, a, b) < 1e-4;
    (d1 == 0.0 && on_segment(p1, p2, q1))
        || (d2 == 0.0 && on_segment(p1, p2, q2))
        || (d3 == 0.0 && on_segment(q1, q2, p1))
        || (d4 == 0.0 && on_segment(q1, q2, p2))
}
