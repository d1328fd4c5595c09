//! Where a vehicle's controls come from each tick
//!
//! Player and computer cars share the same dynamics; only the policy differs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::vehicle::{DriveInput, Steer, Throttle, Vehicle};
use crate::input::{InputSnapshot, Key};

/// Produces the controls for one vehicle for the current tick
pub trait InputPolicy {
    fn drive(&mut self, vehicle: &Vehicle, input: &InputSnapshot) -> DriveInput;
}

/// Key assignments for a human driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub accelerate: Key,
    pub reverse: Key,
    pub left: Key,
    pub right: Key,
}

impl KeyBindings {
    pub const WASD: KeyBindings = KeyBindings {
        accelerate: Key::W,
        reverse: Key::S,
        left: Key::A,
        right: Key::D,
    };

    pub const ARROWS: KeyBindings = KeyBindings {
        accelerate: Key::Up,
        reverse: Key::Down,
        left: Key::Left,
        right: Key::Right,
    };
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::WASD
    }
}

/// Human driver reading held keys from the input snapshot
#[derive(Debug, Clone, Default)]
pub struct KeyboardPolicy {
    pub bindings: KeyBindings,
}

impl KeyboardPolicy {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }
}

impl InputPolicy for KeyboardPolicy {
    fn drive(&mut self, _vehicle: &Vehicle, input: &InputSnapshot) -> DriveInput {
        let b = &self.bindings;
        // Opposite keys cancel out
        let accel = input.is_pressed(b.accelerate) as i32 - input.is_pressed(b.reverse) as i32;
        let steer = input.is_pressed(b.right) as i32 - input.is_pressed(b.left) as i32;

        let throttle = match accel {
            1 => Throttle::Forward,
            -1 => Throttle::Reverse,
            _ => Throttle::Idle,
        };
        DriveInput {
            throttle,
            steer: Steer::from_sign(steer),
        }
    }
}

/// Stand-in computer driver: full throttle, random steering every tick
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl InputPolicy for RandomPolicy {
    fn drive(&mut self, _vehicle: &Vehicle, _input: &InputSnapshot) -> DriveInput {
        DriveInput {
            throttle: Throttle::Forward,
            steer: Steer::from_sign(self.rng.random_range(-1..=1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::CarTuning;
    use glam::Vec2;

    fn car() -> Vehicle {
        Vehicle::new(Vec2::ZERO, 0.0, CarTuning::default())
    }

    #[test]
    fn test_keyboard_maps_keys() {
        let mut policy = KeyboardPolicy::default();
        let input = InputSnapshot::with_keys(&[Key::W, Key::D]);
        let controls = policy.drive(&car(), &input);
        assert_eq!(controls.throttle, Throttle::Forward);
        assert_eq!(controls.steer, Steer::Right);

        let input = InputSnapshot::with_keys(&[Key::W, Key::S, Key::A]);
        let controls = policy.drive(&car(), &input);
        assert_eq!(controls.throttle, Throttle::Idle);
        assert_eq!(controls.steer, Steer::Left);
    }

    #[test]
    fn test_arrow_bindings() {
        let mut policy = KeyboardPolicy::new(KeyBindings::ARROWS);
        let controls = policy.drive(&car(), &InputSnapshot::with_keys(&[Key::Down]));
        assert_eq!(controls.throttle, Throttle::Reverse);
        // WASD keys are ignored under arrow bindings
        let controls = policy.drive(&car(), &InputSnapshot::with_keys(&[Key::W]));
        assert_eq!(controls.throttle, Throttle::Idle);
    }

    #[test]
    fn test_random_policy_always_accelerates() {
        let mut policy = RandomPolicy::new(7);
        let input = InputSnapshot::default();
        let mut seen = [false; 3];
        for _ in 0..300 {
            let controls = policy.drive(&car(), &input);
            assert_eq!(controls.throttle, Throttle::Forward);
            seen[(controls.steer.sign() + 1.0) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_random_policy_is_seeded() {
        let mut a = RandomPolicy::new(42);
        let mut b = RandomPolicy::new(42);
        let input = InputSnapshot::default();
        for _ in 0..50 {
            assert_eq!(a.drive(&car(), &input), b.drive(&car(), &input));
        }
    }
}
