//! Particle swarm reflow engine.
//!
//! A [`Swarm`] of [`Particle`]s continuously reshapes itself into new
//! formations produced by the [`PointCloud`] source from text or images.
//! Reconciliation reuses existing particles where it can, births new ones
//! where the formation needs more, and retires the surplus by sending it off
//! screen with a countdown to death.
//!
//! The [`Stage`] owns the swarm together with its point-cloud source, pending
//! timers and image loads, and is what a front end or a [`ScriptRunner`]
//! talks to. Drawing goes through the narrow [`Display`] contract.

mod cloud;
mod completion;
mod display;
mod error;
mod loader;
mod particle;
mod script;
mod stage;
mod swarm;
mod timer;

pub use cloud::{PointCloud, REFERENCE_FONT_SIZE, SampleGrid, sample_size};
pub use completion::Completion;
pub use display::{Display, Painted, ShapeList, Surface, hexagon};
pub use error::CloudError;
pub use loader::{PendingImage, load_image};
pub use particle::{
    MoveRequest, Particle, ParticleSnapshot, TICKS_PER_SECOND, TRANSITION, Talomere,
    transition_frames,
};
pub use script::{ScriptEvent, ScriptRunner};
pub use stage::{PULSE_DURATION, Stage, StageSettings};
pub use swarm::{PULSE_FACTOR, Reflow, Swarm, SwarmSettings};
pub use timer::{TimerId, Timers};
