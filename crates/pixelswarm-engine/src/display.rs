//! The drawing contract between the swarm and whatever shows it.

use std::f64::consts::PI;

use pixelswarm_core::{Dimensions, Rgba};

/// Drawing context handed to a particle's draw closure.
pub trait Surface {
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Rgba);
    fn fill_polygon(&mut self, vertices: &[(f64, f64)], color: Rgba);
}

/// A drawing surface that owns its context and lends it out per shape.
pub trait Display {
    /// Current viewport size in canvas dots.
    fn dimensions(&self) -> Dimensions;

    /// Run `draw` against the surface's drawing context.
    fn draw_shape(&mut self, draw: &mut dyn FnMut(&mut dyn Surface));
}

/// A shape recorded by [`ShapeList`].
#[derive(Debug, Clone, PartialEq)]
pub enum Painted {
    Circle {
        center: (f64, f64),
        radius: f64,
        color: Rgba,
    },
    Polygon {
        vertices: Vec<(f64, f64)>,
        color: Rgba,
    },
}

impl Painted {
    /// Approximate center of the shape.
    pub fn center(&self) -> (f64, f64) {
        match self {
            Painted::Circle { center, .. } => *center,
            Painted::Polygon { vertices, .. } => {
                // Closed polygons repeat their first vertex.
                let open = match vertices.split_last() {
                    Some((last, rest)) if Some(last) == rest.first() => rest,
                    _ => vertices.as_slice(),
                };
                let n = open.len().max(1) as f64;
                let (sx, sy) = open
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
                (sx / n, sy / n)
            }
        }
    }
}

/// A display that records every shape drawn during a frame.
///
/// The terminal front end paints the recorded shapes onto its canvas once the
/// frame is complete.
#[derive(Debug, Default)]
pub struct ShapeList {
    dimensions: Dimensions,
    shapes: Vec<Painted>,
}

impl ShapeList {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[Painted] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Forget the previous frame's shapes, keeping the allocation.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn resize(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }
}

impl Surface for ShapeList {
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Rgba) {
        self.shapes.push(Painted::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, vertices: &[(f64, f64)], color: Rgba) {
        self.shapes.push(Painted::Polygon {
            vertices: vertices.to_vec(),
            color,
        });
    }
}

impl Display for ShapeList {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn draw_shape(&mut self, draw: &mut dyn FnMut(&mut dyn Surface)) {
        draw(self);
    }
}

/// Vertices of a regular hexagon, closed back onto the first vertex.
pub fn hexagon(center: (f64, f64), radius: f64) -> [(f64, f64); 7] {
    std::array::from_fn(|k| {
        let angle = k as f64 * PI / 3.0;
        (
            center.0 + radius * angle.cos(),
            center.1 + radius * angle.sin(),
        )
    })
}
