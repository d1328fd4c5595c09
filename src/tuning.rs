//! Data-driven car and track balance
//!
//! Defaults reproduce the feel the game shipped with. Both structs are
//! serde-friendly so a tuning file can override any subset of fields.

use serde::{Deserialize, Serialize};

/// Vehicle handling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarTuning {
    /// Top forward speed (px/s); reverse tops out at half of this
    pub max_speed: f32,
    /// Forward acceleration (px/s²); reverse accelerates at half rate
    pub acceleration: f32,
    /// Rolling friction coefficient (1/s)
    pub friction: f32,
    /// Brake coefficient when pressing against current motion (1/s)
    pub brake_strength: f32,
    /// Constant deceleration added on top of friction/brake (px/s²)
    pub stopping_offset: f32,
    /// Wheel turn rate while steering (deg/s)
    pub steer_speed: f32,
    /// Wheel self-centering rate with no steer input (deg/s)
    pub steer_center_speed: f32,
    /// Footprint width (px)
    pub width: u32,
    /// Footprint height (px), nose to tail
    pub height: u32,
    /// Wheelbase constant as a multiple of `height`
    pub wheelbase_factor: f32,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            max_speed: 800.0,
            acceleration: 300.0,
            friction: 0.5,
            brake_strength: 3.0,
            stopping_offset: 50.0,
            steer_speed: 60.0,
            steer_center_speed: 90.0,
            width: 80,
            height: 106,
            wheelbase_factor: 4.0,
        }
    }
}

impl CarTuning {
    /// Wheelbase constant `k` used for the turning radius `k / tan(wheel)`
    pub fn wheelbase(&self) -> f32 {
        self.height as f32 * self.wheelbase_factor
    }

    /// Fastest reverse speed (magnitude)
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed / 2.0
    }
}

/// Track construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTuning {
    /// Minimum samples per curve segment
    pub min_curve_samples: usize,
    /// Chord length beyond which sampling switches to fixed spacing
    pub long_chord: f32,
    /// Sample spacing (px) for editing and checkpoints
    pub edit_spacing: f32,
    /// Sample spacing (px) used once to rasterize the collision mask
    pub collision_spacing: f32,
    /// Emit a checkpoint every N samples
    pub checkpoint_frequency: usize,
    /// Samples skipped at each end of a segment before gates may appear
    pub checkpoint_edge_offset: usize,
    /// Distance from a gate that still counts as touching it (px)
    pub gate_reach: f32,
}

impl Default for TrackTuning {
    fn default() -> Self {
        Self {
            min_curve_samples: 50,
            long_chord: 1000.0,
            edit_spacing: 25.0,
            collision_spacing: 5.0,
            checkpoint_frequency: 15,
            checkpoint_edge_offset: 20,
            gate_reach: 20.0,
        }
    }
}
