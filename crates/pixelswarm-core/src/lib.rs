//! Core types shared by the pixelswarm crates.
//!
//! Everything here is a plain value: points produced by the point-cloud
//! source, particle colors and shapes, viewport dimensions and the script
//! vocabulary understood by the script runner.

mod color;
mod geometry;
mod script;
mod shape;

pub use color::Rgba;
pub use geometry::{Dimensions, MAX_RADIUS, Point, checked_radius};
pub use script::{Command, DEFAULT_STEP_TIMEOUT_MS, Step};
pub use shape::ShapeKind;
