//! Simulation module
//!
//! Track geometry, collision and vehicle physics. No rendering or platform
//! dependencies; everything here runs from plain data and a `dt`.
//! - Track finalization happens once, before a race
//! - `dt` is the measured frame interval, so runs are not bit-reproducible

pub mod camera;
pub mod checkpoint;
pub mod laps;
pub mod mask;
pub mod policy;
pub mod race;
pub mod spline;
pub mod track;
pub mod vehicle;

pub use camera::Camera;
pub use checkpoint::{Checkpoint, CheckpointParams};
pub use laps::{LapEvent, LapState};
pub use mask::{CollisionMask, SurfacePolarity};
pub use policy::{InputPolicy, KeyBindings, KeyboardPolicy, RandomPolicy};
pub use race::{Race, RacePhase, Racer, RacerTick};
pub use spline::{
    CurveSampler, CurveSegment, SampleDensity, build_curves, catmull_rom, sample_count,
};
pub use track::{Colour, FinalizedTrack, SpawnPose, Track};
pub use vehicle::{DriveInput, MoveOutcome, Steer, Throttle, Vehicle};
