//! Arcade car model
//!
//! Speed is a signed scalar along the heading; steering turns the front wheels
//! which curve the path with a bicycle-style turning radius. Movement is
//! resolved per axis against the track's collision mask so a car pressed into
//! a wall slides along it and scrapes speed off instead of bouncing.

use glam::{IVec2, UVec2, Vec2};

use super::mask::CollisionMask;
use crate::consts::{MAX_WHEEL_ANGLE, WALL_SCRAPE_DAMPING};
use crate::tuning::CarTuning;
use crate::{approach_zero, heading_to_direction};

/// Longitudinal input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Throttle {
    Forward,
    #[default]
    Idle,
    Reverse,
}

/// Steering input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    #[default]
    Straight,
    Right,
}

impl Steer {
    pub fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Straight => 0.0,
            Steer::Right => 1.0,
        }
    }

    /// Map -1 / 0 / 1 (any sign) to a steer direction
    pub fn from_sign(value: i32) -> Self {
        match value.signum() {
            -1 => Steer::Left,
            1 => Steer::Right,
            _ => Steer::Straight,
        }
    }
}

/// Controls applied for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveInput {
    pub throttle: Throttle,
    pub steer: Steer,
}

/// Which axes were blocked this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    pub x_blocked: bool,
    pub y_blocked: bool,
}

impl MoveOutcome {
    pub fn collided(&self) -> bool {
        self.x_blocked || self.y_blocked
    }
}

/// A car on the track
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Top-left corner of the footprint in world space
    pub pos: Vec2,
    /// Signed speed along the heading (px/s), forward positive
    pub speed: f32,
    /// Facing in degrees; 0 is up the screen, clockwise positive
    pub heading: f32,
    /// Front wheel angle in degrees, within ±[`MAX_WHEEL_ANGLE`]
    pub wheel_angle: f32,
    pub tuning: CarTuning,
    footprint: CollisionMask,
}

impl Vehicle {
    /// Car with a solid rectangular footprint, centred on `center`
    pub fn new(center: Vec2, heading: f32, tuning: CarTuning) -> Self {
        let footprint = CollisionMask::filled(UVec2::new(tuning.width, tuning.height));
        Self::with_footprint(center, heading, tuning, footprint)
    }

    /// Car whose footprint comes from its sprite (see `Assets::footprint`)
    pub fn with_footprint(
        center: Vec2,
        heading: f32,
        tuning: CarTuning,
        footprint: CollisionMask,
    ) -> Self {
        let size = footprint.size().as_vec2();
        Self {
            pos: center - size * 0.5,
            speed: 0.0,
            heading,
            wheel_angle: 0.0,
            tuning,
            footprint,
        }
    }

    pub fn footprint(&self) -> &CollisionMask {
        &self.footprint
    }

    pub fn size(&self) -> Vec2 {
        self.footprint.size().as_vec2()
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size() * 0.5
    }

    /// Advance one tick: throttle, steering, heading, then movement
    pub fn update(&mut self, dt: f32, input: DriveInput, track: &CollisionMask) -> MoveOutcome {
        self.apply_throttle(input.throttle, dt);
        self.apply_steering(input.steer, dt);
        self.update_heading(dt);
        self.resolve_movement(dt, track)
    }

    pub fn apply_throttle(&mut self, throttle: Throttle, dt: f32) {
        let t = &self.tuning;
        self.speed = match throttle {
            Throttle::Forward if self.speed >= 0.0 => {
                (self.speed + t.acceleration * dt).min(t.max_speed)
            }
            Throttle::Reverse if self.speed <= 0.0 => {
                (self.speed - t.acceleration / 2.0 * dt).max(-t.max_reverse_speed())
            }
            // Pressing against the current motion brakes
            Throttle::Forward | Throttle::Reverse => approach_zero(
                self.speed,
                (self.speed.abs() * t.brake_strength + t.stopping_offset) * dt,
            ),
            Throttle::Idle => approach_zero(
                self.speed,
                (self.speed.abs() * t.friction + t.stopping_offset) * dt,
            ),
        };
    }

    pub fn apply_steering(&mut self, steer: Steer, dt: f32) {
        self.wheel_angle = match steer {
            Steer::Straight => approach_zero(self.wheel_angle, self.tuning.steer_center_speed * dt),
            turn => (self.wheel_angle + turn.sign() * self.tuning.steer_speed * dt)
                .clamp(-MAX_WHEEL_ANGLE, MAX_WHEEL_ANGLE),
        };
    }

    /// Current turning radius, `None` when driving straight
    pub fn turning_radius(&self) -> Option<f32> {
        if self.wheel_angle == 0.0 {
            return None;
        }
        Some(self.tuning.wheelbase() / self.wheel_angle.to_radians().tan())
    }

    pub fn update_heading(&mut self, dt: f32) {
        if self.speed == 0.0 {
            return;
        }
        if let Some(radius) = self.turning_radius() {
            let angular_velocity = self.speed / radius;
            self.heading = (self.heading + (angular_velocity * dt).to_degrees()).rem_euclid(360.0);
        }
    }

    fn mask_offset(pos: Vec2) -> IVec2 {
        pos.floor().as_ivec2()
    }

    /// Move along each axis unless the footprint would hit the track mask.
    ///
    /// Both axis candidates are tested from the start-of-tick position.
    pub fn resolve_movement(&mut self, dt: f32, track: &CollisionMask) -> MoveOutcome {
        let delta = heading_to_direction(self.heading) * self.speed * dt;
        let start = self.pos;
        let (sin, cos) = self.heading.to_radians().sin_cos();

        let x_blocked = track
            .overlap(&self.footprint, Self::mask_offset(start + Vec2::new(delta.x, 0.0)))
            .is_some();
        let y_blocked = track
            .overlap(&self.footprint, Self::mask_offset(start + Vec2::new(0.0, delta.y)))
            .is_some();

        if x_blocked {
            self.speed -= self.speed * sin.abs() * WALL_SCRAPE_DAMPING;
        } else {
            self.pos.x += delta.x;
        }

        if y_blocked {
            self.speed -= self.speed * cos.abs() * WALL_SCRAPE_DAMPING;
        } else {
            self.pos.y += delta.y;
        }

        MoveOutcome {
            x_blocked,
            y_blocked,
        }
    }
}
