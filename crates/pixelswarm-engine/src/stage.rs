//! The stage: one swarm, its point-cloud source and the pending effects
//! around them.
//!
//! All mutation happens on the caller's thread, either inside [`Stage::tick`]
//! or inside one of the content operations. Operations that finish later hand
//! back a [`Completion`].

use std::path::Path;
use std::time::{Duration, Instant};

use image::RgbaImage;
use pixelswarm_core::{Dimensions, Point, ShapeKind, checked_radius};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::cloud::PointCloud;
use crate::completion::Completion;
use crate::display::Display;
use crate::loader::PendingImage;
use crate::swarm::{PULSE_FACTOR, Reflow, Swarm, SwarmSettings};
use crate::timer::{TimerId, Timers};

/// How long a pulse keeps particles inflated.
pub const PULSE_DURATION: Duration = Duration::from_millis(300);

/// Everything needed to set up a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSettings {
    pub swarm: SwarmSettings,
    /// Shown instead of an image that fails to load.
    pub fallback_text: String,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            swarm: SwarmSettings::default(),
            fallback_text: "wtf?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    RevertPulse,
}

#[derive(Debug)]
pub struct Stage<R = StdRng> {
    swarm: Swarm<R>,
    cloud: PointCloud,
    viewport: Dimensions,
    timers: Timers<Deferred>,
    pulse: Option<(TimerId, Completion)>,
    image: Option<(PendingImage, Completion)>,
    fallback_text: String,
}

impl Stage<StdRng> {
    /// A stage seeded with `seed`, or from OS entropy when `None`.
    pub fn seeded(settings: StageSettings, viewport: Dimensions, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(settings, viewport, rng)
    }
}

impl<R: Rng> Stage<R> {
    pub fn new(settings: StageSettings, viewport: Dimensions, rng: R) -> Self {
        Self {
            cloud: PointCloud::new(settings.swarm.radius, viewport),
            swarm: Swarm::new(settings.swarm, rng),
            viewport,
            timers: Timers::new(),
            pulse: None,
            image: None,
            fallback_text: settings.fallback_text,
        }
    }

    /// Follow a viewport resize, re-fitting the sampling grid.
    pub fn resize(&mut self, viewport: Dimensions) {
        if viewport == self.viewport {
            return;
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.cloud.fit(viewport);
    }

    /// Reshape the swarm into an explicit formation.
    pub fn configure_swarm(&mut self, formation: &[Point]) -> Reflow {
        self.swarm.reconfigure(formation, self.viewport)
    }

    /// Change the particle radius and the sampling resolution with it.
    ///
    /// Sizes that are not positive and finite are ignored; oversized ones are
    /// capped at [`pixelswarm_core::MAX_RADIUS`].
    pub fn set_particle_radius(&mut self, radius: f64) {
        let Some(checked) = checked_radius(radius) else {
            warn!(radius, "ignoring unusable particle radius");
            return;
        };
        self.swarm.set_radius(checked);
        self.cloud.set_radius(checked, self.viewport);
    }

    /// Shape used for particles born from now on.
    pub fn set_shape(&mut self, shape: ShapeKind) {
        self.swarm.set_shape(shape);
    }

    /// Briefly inflate every particle.
    ///
    /// A pulse issued while another is still inflated replaces it: the old
    /// revert is cancelled and its completion fires immediately.
    pub fn pulse(&mut self, now: Instant) -> Completion {
        if let Some((timer, superseded)) = self.pulse.take() {
            self.timers.cancel(timer);
            self.swarm.restore_radius();
            superseded.complete();
        }
        self.swarm.inflate(PULSE_FACTOR);

        let done = Completion::pending();
        let timer = self
            .timers
            .schedule(now, PULSE_DURATION, Deferred::RevertPulse);
        self.pulse = Some((timer, done.clone()));
        done
    }

    /// Reflow into `text`. Empty text leaves the current formation alone.
    pub fn show_text(&mut self, text: &str) -> Option<Reflow> {
        if text.is_empty() {
            return None;
        }
        let formation = self.cloud.sample_text(text);
        Some(self.configure_swarm(&formation))
    }

    /// Start loading an image and reflow into it once decoded.
    ///
    /// Failures fall back to the fallback text. A newer call supersedes a load
    /// still in flight.
    pub fn show_image(&mut self, path: &Path) -> Completion {
        if let Some((stale, superseded)) = self.image.take() {
            debug!(path = %stale.path().display(), "image load superseded");
            superseded.complete();
        }
        let done = Completion::pending();
        self.image = Some((PendingImage::spawn(path), done.clone()));
        done
    }

    /// Reflow into already decoded pixels.
    pub fn show_image_data(&mut self, image: &RgbaImage) -> Reflow {
        let formation = self.cloud.sample_image(image);
        self.configure_swarm(&formation)
    }

    /// Drop every particle without animation.
    pub fn clear(&mut self) {
        self.swarm.clear();
    }

    /// One repaint: follow the display's size, fire due timers, collect a
    /// finished image, render.
    pub fn tick(&mut self, now: Instant, display: &mut dyn Display) {
        self.resize(display.dimensions());
        for deferred in self.timers.drain_due(now) {
            match deferred {
                Deferred::RevertPulse => {
                    self.swarm.restore_radius();
                    if let Some((_, done)) = self.pulse.take() {
                        done.complete();
                    }
                }
            }
        }
        self.collect_image();
        self.swarm.render(display);
    }

    fn collect_image(&mut self) {
        let Some(result) = self.image.as_ref().and_then(|(pending, _)| pending.poll()) else {
            return;
        };
        let Some((pending, done)) = self.image.take() else {
            return;
        };

        match result {
            Ok(image) => {
                let reflow = self.show_image_data(&image);
                debug!(
                    path = %pending.path().display(),
                    points = reflow.reused + reflow.created,
                    "image shown"
                );
            }
            Err(e) => {
                warn!(error = %e, "image unavailable, showing fallback text");
                let fallback = self.fallback_text.clone();
                self.show_text(&fallback);
            }
        }
        done.complete();
    }

    pub fn swarm(&self) -> &Swarm<R> {
        &self.swarm
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn viewport(&self) -> Dimensions {
        self.viewport
    }

    /// Whether an image load is still in flight.
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.image.is_some()
    }
}
