//! Sequential checkpoint progress and lap counting

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::checkpoint::Checkpoint;
use crate::segments_intersect;

/// What happened to a vehicle's lap progress this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapEvent {
    None,
    /// Passed the gate with this index
    Checkpoint(usize),
    /// Passed the last gate of the loop; carries the new lap count
    Lap(u32),
}

/// Per-vehicle progress around the loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapState {
    pub next_checkpoint: usize,
    pub laps_completed: u32,
}

impl LapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the expected gate against a move from `from` to `to`.
    ///
    /// Only the expected gate counts, so later gates reached out of order are
    /// ignored. A gate is passed when the move crosses it or ends within
    /// `reach` of it.
    pub fn advance(
        &mut self,
        from: Vec2,
        to: Vec2,
        checkpoints: &[Checkpoint],
        reach: f32,
    ) -> LapEvent {
        let Some(gate) = checkpoints.get(self.next_checkpoint) else {
            return LapEvent::None;
        };

        let crossed =
            segments_intersect(from, to, gate.a, gate.b) || gate.distance_to(to) <= reach;
        if !crossed {
            return LapEvent::None;
        }

        let passed = self.next_checkpoint;
        self.next_checkpoint = (self.next_checkpoint + 1) % checkpoints.len();
        if self.next_checkpoint == 0 {
            self.laps_completed += 1;
            log::debug!("Lap {} completed", self.laps_completed);
            LapEvent::Lap(self.laps_completed)
        } else {
            LapEvent::Checkpoint(passed)
        }
    }

    pub fn has_finished(&self, total_laps: u32) -> bool {
        self.laps_completed >= total_laps
    }
}
