//! Per-tick input snapshot handed to the core by the windowing layer

use std::collections::HashSet;

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
}

/// Everything the core needs to know about the user for one tick
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Keys currently held
    pub pressed: HashSet<Key>,
    /// Pointer position in screen space
    pub pointer: Vec2,
    /// Button presses that happened this tick, in order
    pub clicks: Vec<PointerButton>,
    /// Window close / quit request
    pub quit: bool,
}

impl InputSnapshot {
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Snapshot with the given keys held and nothing else
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            pressed: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    /// Snapshot with a single click at `pointer`
    pub fn click(button: PointerButton, pointer: Vec2) -> Self {
        Self {
            pointer,
            clicks: vec![button],
            ..Default::default()
        }
    }
}
