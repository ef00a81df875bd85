//! Particle colors.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// An sRGB color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Default particle color: translucent white.
    pub const PARTICLE: Rgba = Rgba::new(255, 255, 255, 0.8);

    /// Muted green used by retiring particles (alpha is rolled per particle).
    pub const RETIRED: Rgba = Rgba::new(78, 108, 68, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Whether any of this color would show up at all.
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    /// Convert to a ratatui color.
    ///
    /// Terminals have no alpha channel, so the color is blended over the
    /// black canvas background.
    pub fn color(self) -> Color {
        let a = self.a.clamp(0.0, 1.0);
        let blend = |c: u8| (c as f32 * a).round() as u8;
        Color::Rgb(blend(self.r), blend(self.g), blend(self.b))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::PARTICLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_color_is_unchanged() {
        assert_eq!(Rgba::new(10, 20, 30, 1.0).color(), Color::Rgb(10, 20, 30));
    }

    #[test]
    fn alpha_blends_over_black() {
        assert_eq!(Rgba::new(200, 100, 50, 0.5).color(), Color::Rgb(100, 50, 25));
        assert_eq!(Rgba::RETIRED.color(), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Rgba::PARTICLE.with_alpha(3.0).a, 1.0);
        assert!(!Rgba::PARTICLE.with_alpha(-1.0).is_visible());
    }
}
