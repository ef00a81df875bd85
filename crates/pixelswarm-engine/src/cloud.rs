//! Point-cloud source: turns text and images into swarm formations.
//!
//! Content is resampled onto a coarse grid whose cell size follows the
//! particle radius, so one particle covers one grid cell.

use image::RgbaImage;
use pixelswarm_core::{Dimensions, Point, Rgba};
use pixelswarm_fonts::{GLYPH_HEIGHT, TextBitmap};

/// Font size text is measured at before being shrunk to fit.
pub const REFERENCE_FONT_SIZE: f64 = 800.0;

/// Share of the grid width text may occupy.
const TEXT_WIDTH_FILL: f64 = 0.7;

/// Share of the grid's shorter side an image may occupy.
const IMAGE_FILL: f64 = 0.75;

/// Grid cell size for a particle radius.
pub fn sample_size(radius: f64) -> u32 {
    (2.0 * radius + 2.0).round().max(1.0) as u32
}

/// The low-resolution grid content is sampled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGrid {
    /// Cell edge length in canvas dots.
    pub cell: u32,
    /// Grid width in canvas dots, a multiple of `cell`.
    pub width: u32,
    /// Grid height in canvas dots, a multiple of `cell`.
    pub height: u32,
}

impl SampleGrid {
    /// Largest grid of `cell`-sized cells that fits in `viewport`.
    pub fn fit(viewport: Dimensions, cell: u32) -> Self {
        let cell = cell.max(1);
        Self {
            cell,
            width: viewport.width / cell * cell,
            height: viewport.height / cell * cell,
        }
    }

    pub fn cols(&self) -> u32 {
        self.width / self.cell
    }

    pub fn rows(&self) -> u32 {
        self.height / self.cell
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cell centers, row-major.
    pub fn centers(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let half = f64::from(self.cell) / 2.0;
        (0..self.rows()).flat_map(move |row| {
            (0..self.cols()).map(move |col| {
                (
                    f64::from(col * self.cell) + half,
                    f64::from(row * self.cell) + half,
                )
            })
        })
    }
}

/// Converts text and images into target formations.
#[derive(Debug, Clone)]
pub struct PointCloud {
    radius: f64,
    grid: SampleGrid,
}

impl PointCloud {
    pub fn new(radius: f64, viewport: Dimensions) -> Self {
        Self {
            radius,
            grid: SampleGrid::fit(viewport, sample_size(radius)),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn grid(&self) -> SampleGrid {
        self.grid
    }

    /// Change the sampling resolution and re-fit the grid.
    pub fn set_radius(&mut self, radius: f64, viewport: Dimensions) {
        self.radius = radius;
        self.fit(viewport);
    }

    /// Re-fit the grid to a new viewport.
    pub fn fit(&mut self, viewport: Dimensions) {
        self.grid = SampleGrid::fit(viewport, sample_size(self.radius));
    }

    /// Largest font size at which `text` fits the grid.
    pub fn font_size(&self, text: &TextBitmap) -> f64 {
        let measured = text.measure(REFERENCE_FONT_SIZE);
        if measured <= 0.0 {
            return 0.0;
        }
        let width = f64::from(self.grid.width);
        let height = f64::from(self.grid.height);
        REFERENCE_FONT_SIZE
            .min(width / measured * TEXT_WIDTH_FILL * REFERENCE_FONT_SIZE)
            .min(height)
    }

    /// Points covering `text`, centered on the grid. Empty text gives nothing.
    pub fn sample_text(&self, text: &str) -> Vec<Point> {
        if text.is_empty() || self.grid.is_empty() {
            return Vec::new();
        }
        let bitmap = TextBitmap::new(text);
        let size = self.font_size(&bitmap);
        if size <= 0.0 {
            return Vec::new();
        }

        let scale = size / GLYPH_HEIGHT as f64;
        let left = (f64::from(self.grid.width) - bitmap.measure(size)) / 2.0;
        let top = (f64::from(self.grid.height) - size) / 2.0;

        self.grid
            .centers()
            .filter(|&(x, y)| bitmap.covers((x - left) / scale, (y - top) / scale))
            .map(Point::from)
            .collect()
    }

    /// Colored points for every opaque pixel of `image`, scaled and centered.
    pub fn sample_image(&self, image: &RgbaImage) -> Vec<Point> {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || self.grid.is_empty() {
            return Vec::new();
        }

        let fit = IMAGE_FILL * f64::from(self.grid.width.min(self.grid.height));
        let scale = (fit / f64::from(iw)).min(fit / f64::from(ih));
        let left = (f64::from(self.grid.width) - f64::from(iw) * scale) / 2.0;
        let top = (f64::from(self.grid.height) - f64::from(ih) * scale) / 2.0;

        self.grid
            .centers()
            .filter_map(|(x, y)| {
                let u = (x - left) / scale;
                let v = (y - top) / scale;
                if u < 0.0 || v < 0.0 || u >= f64::from(iw) || v >= f64::from(ih) {
                    return None;
                }
                let [r, g, b, a] = image.get_pixel(u as u32, v as u32).0;
                let color = Rgba::new(r, g, b, f32::from(a) / 255.0);
                (a > 0).then(|| Point::new(x, y).with_color(color))
            })
            .collect()
    }
}
