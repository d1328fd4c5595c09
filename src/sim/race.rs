//! Race mode: vehicles driving a finalized track until someone finishes
//!
//! Each tick reads one input snapshot and advances every racer in order:
//! policy → dynamics against the shared mask → lap progress.

use glam::Vec2;

use super::camera::Camera;
use super::laps::{LapEvent, LapState};
use super::policy::InputPolicy;
use super::track::FinalizedTrack;
use super::vehicle::{MoveOutcome, Vehicle};
use crate::input::InputSnapshot;
use crate::tuning::CarTuning;

/// Current phase of a race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Running,
    /// First racer (by index) to reach the lap target
    Finished { winner: usize },
}

/// A vehicle together with its driver and lap progress
pub struct Racer {
    pub name: String,
    pub vehicle: Vehicle,
    pub laps: LapState,
    policy: Box<dyn InputPolicy>,
}

impl std::fmt::Debug for Racer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Racer")
            .field("name", &self.name)
            .field("vehicle", &self.vehicle)
            .field("laps", &self.laps)
            .finish_non_exhaustive()
    }
}

/// Per-racer result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RacerTick {
    pub movement: MoveOutcome,
    pub lap: LapEvent,
}

#[derive(Debug)]
pub struct Race {
    track: FinalizedTrack,
    racers: Vec<Racer>,
    pub total_laps: u32,
    /// How close to a gate counts as touching it
    pub gate_reach: f32,
    pub camera: Camera,
    phase: RacePhase,
    /// Simulated seconds since the start
    pub elapsed: f32,
    pub ticks: u64,
}

impl Race {
    pub fn new(track: FinalizedTrack, total_laps: u32, gate_reach: f32, viewport: Vec2) -> Self {
        let mut camera = Camera::new(viewport);
        camera.snap_to(track.spawn.position);
        Self {
            track,
            racers: Vec::new(),
            total_laps,
            gate_reach,
            camera,
            phase: RacePhase::Running,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn track(&self) -> &FinalizedTrack {
        &self.track
    }

    pub fn racers(&self) -> &[Racer] {
        &self.racers
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    /// A fresh vehicle parked on the spawn point
    pub fn spawn_vehicle(&self, tuning: CarTuning) -> Vehicle {
        Vehicle::new(self.track.spawn.position, self.track.spawn.heading, tuning)
    }

    /// Add a racer; the first one added is followed by the camera
    pub fn add_racer(
        &mut self,
        name: impl Into<String>,
        vehicle: Vehicle,
        policy: Box<dyn InputPolicy>,
    ) -> usize {
        let name = name.into();
        log::info!("Racer {} joined: {}", self.racers.len(), name);
        self.racers.push(Racer {
            name,
            vehicle,
            laps: LapState::new(),
            policy,
        });
        self.racers.len() - 1
    }

    /// Advance every racer by `dt` seconds (the measured frame interval)
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32) -> Vec<RacerTick> {
        if self.phase != RacePhase::Running {
            return Vec::new();
        }
        self.ticks += 1;
        self.elapsed += dt;

        let track = &self.track;
        let mut results = Vec::with_capacity(self.racers.len());

        for (index, racer) in self.racers.iter_mut().enumerate() {
            let controls = racer.policy.drive(&racer.vehicle, input);
            let before = racer.vehicle.center();
            let movement = racer.vehicle.update(dt, controls, &track.mask);
            let lap = racer.laps.advance(
                before,
                racer.vehicle.center(),
                &track.checkpoints,
                self.gate_reach,
            );

            if let LapEvent::Lap(count) = lap {
                log::info!("{} completed lap {}/{}", racer.name, count, self.total_laps);
            }
            if self.phase == RacePhase::Running && racer.laps.has_finished(self.total_laps) {
                log::info!("{} wins after {:.2}s", racer.name, self.elapsed);
                self.phase = RacePhase::Finished { winner: index };
            }
            results.push(RacerTick { movement, lap });
        }

        if let Some(leader) = self.racers.first() {
            self.camera.follow(leader.vehicle.center());
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::checkpoint::Checkpoint;
    use crate::sim::mask::CollisionMask;
    use crate::sim::policy::{KeyboardPolicy, RandomPolicy};
    use crate::sim::track::{SpawnPose, Track};
    use crate::sim::vehicle::DriveInput;
    use crate::input::Key;
    use crate::tuning::TrackTuning;
    use glam::UVec2;

    const DT: f32 = 1.0 / 60.0;

    /// Policy that replays a fixed control
    struct Constant(DriveInput);

    impl InputPolicy for Constant {
        fn drive(&mut self, _vehicle: &Vehicle, _input: &InputSnapshot) -> DriveInput {
            self.0
        }
    }

    /// Open field with gates stacked along the x axis, car heading right
    fn straight_track(gates: &[f32]) -> FinalizedTrack {
        let mut track = FinalizedTrack::from_raster(
            CollisionMask::new(UVec2::new(4000, 400)),
            SpawnPose {
                position: Vec2::new(100.0, 200.0),
                heading: 90.0,
            },
        );
        track.checkpoints = gates
            .iter()
            .map(|&x| Checkpoint {
                a: Vec2::new(x, 0.0),
                b: Vec2::new(x, 400.0),
            })
            .collect();
        track
    }

    #[test]
    fn test_race_ends_when_lap_target_reached() {
        let track = straight_track(&[400.0, 800.0]);
        let mut race = Race::new(track, 1, 5.0, Vec2::new(800.0, 600.0));
        let car = race.spawn_vehicle(CarTuning::default());
        race.add_racer("player", car, Box::new(KeyboardPolicy::default()));

        let input = InputSnapshot::with_keys(&[Key::W]);
        for _ in 0..600 {
            race.tick(&input, DT);
            if race.phase() != RacePhase::Running {
                break;
            }
        }
        assert_eq!(race.phase(), RacePhase::Finished { winner: 0 });
        assert_eq!(race.racers()[0].laps.laps_completed, 1);

        // Finished races no longer tick
        let ticks = race.ticks;
        assert!(race.tick(&input, DT).is_empty());
        assert_eq!(race.ticks, ticks);
    }

    #[test]
    fn test_idle_racer_makes_no_progress() {
        let track = straight_track(&[400.0, 800.0]);
        let mut race = Race::new(track, 1, 5.0, Vec2::new(800.0, 600.0));
        let car = race.spawn_vehicle(CarTuning::default());
        race.add_racer("parked", car, Box::new(Constant(DriveInput::default())));

        for _ in 0..120 {
            let results = race.tick(&InputSnapshot::default(), DT);
            assert_eq!(results[0].lap, LapEvent::None);
        }
        assert_eq!(race.phase(), RacePhase::Running);
        assert_eq!(race.racers()[0].vehicle.speed, 0.0);
    }

    #[test]
    fn test_following_the_centreline_counts_laps() {
        let mut track = Track::new();
        for p in [(400.0, 400.0), (1400.0, 400.0), (1400.0, 1400.0), (400.0, 1400.0)] {
            track.add_point(Vec2::new(p.0, p.1));
        }
        let tuning = TrackTuning::default();
        let finalized = track.finalize(&tuning, UVec2::new(1900, 1900));
        assert!(finalized.has_checkpoints());

        let path: Vec<Vec2> = finalized
            .curves
            .iter()
            .flat_map(|curve| curve.points.iter().copied())
            .collect();
        let mut laps = LapState::new();
        let mut gates_passed = 0;
        for _ in 0..2 {
            for pair in path.windows(2) {
                let event =
                    laps.advance(pair[0], pair[1], &finalized.checkpoints, tuning.gate_reach);
                if event != LapEvent::None {
                    gates_passed += 1;
                }
            }
        }

        assert_eq!(laps.laps_completed, 2);
        assert_eq!(laps.next_checkpoint, 0);
        assert_eq!(gates_passed, 2 * finalized.checkpoints.len());
    }

    #[test]
    fn test_random_agents_stay_on_square_track() {
        let mut track = Track::new();
        // Road stays clear of the mask border on every side
        for p in [(400.0, 400.0), (1400.0, 400.0), (1400.0, 1400.0), (400.0, 1400.0)] {
            track.add_point(Vec2::new(p.0, p.1));
        }
        let finalized = track.finalize(&TrackTuning::default(), UVec2::new(1900, 1900));
        assert!(finalized.is_raceable());

        let mut race = Race::new(finalized, 3, 20.0, Vec2::new(800.0, 600.0));
        for seed in 0..3 {
            let car = race.spawn_vehicle(CarTuning::default());
            race.add_racer(format!("agent-{seed}"), car, Box::new(RandomPolicy::new(seed)));
        }

        for _ in 0..300 {
            race.tick(&InputSnapshot::default(), DT);
        }
        for racer in race.racers() {
            let center = racer.vehicle.center();
            assert!(race.track().mask.is_drivable(center), "{} left the road", racer.name);
            assert!(racer.vehicle.wheel_angle.abs() <= 45.0);
        }
    }
}
