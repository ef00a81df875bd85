//! Braille canvas rendering of the shapes recorded during a frame.

use pixelswarm_core::{Dimensions, Rgba};
use pixelswarm_engine::Painted;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Painter, Shape},
    },
};

/// The swarm as a ratatui widget.
#[derive(Debug)]
pub struct SwarmCanvas<'a> {
    shapes: &'a [Painted],
    dimensions: Dimensions,
}

impl<'a> SwarmCanvas<'a> {
    pub fn new(shapes: &'a [Painted], dimensions: Dimensions) -> Self {
        Self { shapes, dimensions }
    }
}

impl Widget for SwarmCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = f64::from(self.dimensions.width);
        let height = f64::from(self.dimensions.height);
        let layer = Layer {
            shapes: self.shapes,
            height,
        };
        Canvas::default()
            .marker(Marker::Braille)
            .background_color(Color::Black)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| ctx.draw(&layer))
            .render(area, buf);
    }
}

/// Fills every recorded shape dot by dot.
///
/// Swarm space has y growing downward while the canvas grows upward, so every
/// dot is flipped on the way in.
struct Layer<'a> {
    shapes: &'a [Painted],
    height: f64,
}

impl Layer<'_> {
    fn dot(&self, painter: &mut Painter, x: f64, y: f64, color: Color) {
        if let Some((col, row)) = painter.get_point(x, self.height - y) {
            painter.paint(col, row, color);
        }
    }

    fn fill<F>(
        &self,
        painter: &mut Painter,
        bounds: Bounds,
        center: (f64, f64),
        color: Rgba,
        inside: F,
    ) where
        F: Fn(f64, f64) -> bool,
    {
        if !color.is_visible() {
            return;
        }
        let color = color.color();
        for y in bounds.y0..=bounds.y1 {
            for x in bounds.x0..=bounds.x1 {
                let (x, y) = (f64::from(x), f64::from(y));
                if inside(x, y) {
                    self.dot(painter, x, y, color);
                }
            }
        }
        // Small shapes may fall between dots.
        self.dot(painter, center.0, center.1, color);
    }
}

impl Shape for Layer<'_> {
    fn draw(&self, painter: &mut Painter) {
        for shape in self.shapes {
            match shape {
                Painted::Circle {
                    center,
                    radius,
                    color,
                } => {
                    let (cx, cy) = *center;
                    let corners = [(cx - radius, cy - radius), (cx + radius, cy + radius)];
                    let bounds = Bounds::around(&corners);
                    let r2 = radius * radius;
                    self.fill(painter, bounds, *center, *color, |x, y| {
                        (x - cx).powi(2) + (y - cy).powi(2) <= r2
                    });
                }
                Painted::Polygon { vertices, color } => {
                    let bounds = Bounds::around(vertices);
                    self.fill(painter, bounds, shape.center(), *color, |x, y| {
                        contains(vertices, x, y)
                    });
                }
            }
        }
    }
}

/// Integer dot range covering a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl Bounds {
    fn around(points: &[(f64, f64)]) -> Self {
        let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
        let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        if x0 > x1 || y0 > y1 {
            return Self {
                x0: 0,
                y0: 0,
                x1: -1,
                y1: -1,
            };
        }
        Self {
            x0: x0.ceil() as i32,
            y0: y0.ceil() as i32,
            x1: x1.floor() as i32,
            y1: y1.floor() as i32,
        }
    }
}

/// Even-odd point-in-polygon test.
fn contains(vertices: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    for edge in vertices.windows(2) {
        let ((xa, ya), (xb, yb)) = (edge[0], edge[1]);
        if (ya > y) != (yb > y) && x < xa + (y - ya) * (xb - xa) / (yb - ya) {
            inside = !inside;
        }
    }
    inside
}
