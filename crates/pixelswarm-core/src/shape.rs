//! Particle shapes.

use serde::{Deserialize, Serialize};

/// How a particle is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// A filled circle.
    Dot,
    /// A filled regular hexagon.
    #[default]
    Hexagon,
}

impl ShapeKind {
    /// Toggle between dots and hexagons.
    pub fn toggle(&self) -> Self {
        match self {
            ShapeKind::Dot => ShapeKind::Hexagon,
            ShapeKind::Hexagon => ShapeKind::Dot,
        }
    }
}
