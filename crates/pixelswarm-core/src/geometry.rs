//! Points and viewport dimensions.

use crate::Rgba;

/// A target coordinate produced by the point-cloud source.
///
/// Text clouds carry no color; image clouds carry the sampled pixel color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color: Option<Rgba>,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, color: None }
    }

    pub const fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Size of the drawing surface, in canvas dots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dot resolution of a Braille canvas covering `cols` x `rows` cells.
    pub const fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as u32 * 2,
            height: rows as u32 * 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.width as f64
            && point.y < self.height as f64
    }
}

/// Largest particle radius accepted, in canvas dots.
pub const MAX_RADIUS: f64 = 32.0;

/// `radius` capped at [`MAX_RADIUS`], or `None` if it is not a usable size.
pub fn checked_radius(radius: f64) -> Option<f64> {
    (radius.is_finite() && radius > 0.0).then(|| radius.min(MAX_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braille_cells_are_two_by_four_dots() {
        assert_eq!(Dimensions::from_cells(80, 24), Dimensions::new(160, 96));
    }

    #[test]
    fn contains_is_half_open() {
        let dims = Dimensions::new(10, 10);
        assert!(dims.contains(&Point::new(0.0, 9.9)));
        assert!(!dims.contains(&Point::new(10.0, 5.0)));
        assert!(!dims.contains(&Point::new(-0.1, 5.0)));
    }

    #[test]
    fn radius_checks() {
        assert_eq!(checked_radius(1.5), Some(1.5));
        assert_eq!(checked_radius(1e6), Some(MAX_RADIUS));
        assert_eq!(checked_radius(0.0), None);
        assert_eq!(checked_radius(-2.0), None);
        assert_eq!(checked_radius(f64::NAN), None);
    }
}
