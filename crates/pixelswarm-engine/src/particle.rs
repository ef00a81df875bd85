//! A single animated shape in the swarm.
//!
//! Each particle owns a FIFO of move requests. On every tick it either steps
//! along the eased path towards its current target, starts on the next queued
//! target, or (with nothing left to do) wobbles in place.

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::time::Duration;

use pixelswarm_core::{Point, Rgba, ShapeKind};
use rand::Rng;

use crate::display::{Display, hexagon};

/// Nominal repaint rate used to turn durations into frame budgets.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// How long any transition should take, regardless of distance.
pub const TRANSITION: Duration = Duration::from_millis(1500);

/// Maximum frames added to or removed from a budget to desynchronize particles.
const FRAME_JITTER: i64 = 15;

/// First step of the ease curve; the early steps are skipped for a snappier start.
const EASE_START: u32 = 5;

/// Largest idle offset along each axis, in canvas dots.
const WOBBLE: f64 = 0.5;

/// Frame budget for one transition.
pub fn transition_frames() -> u32 {
    (TRANSITION.as_secs_f64() * TICKS_PER_SECOND).round() as u32
}

/// Remaining render-tick lifespan of a particle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Talomere {
    /// Never removed by aging.
    #[default]
    Immortal,
    /// Dies once this reaches zero.
    Remaining(u32),
}

impl Talomere {
    pub fn is_dead(&self) -> bool {
        matches!(self, Talomere::Remaining(0))
    }

    pub fn is_mortal(&self) -> bool {
        matches!(self, Talomere::Remaining(_))
    }

    /// Count down one tick.
    fn tick(&mut self) {
        if let Talomere::Remaining(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// The full state of a particle a recycled particle should take on.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Point,
    pub shape: ShapeKind,
    pub radius: f64,
    pub color: Option<Rgba>,
    pub talomere: Talomere,
    pub frames: u32,
}

/// What a particle should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveRequest {
    /// Move to a point, picking up its color if it has one.
    Reposition(Point),
    /// Move to another particle's position and take on its appearance and lifespan.
    Recycle(ParticleSnapshot),
}

#[derive(Debug, Clone, Copy)]
struct Leg {
    x: f64,
    y: f64,
    frames: u32,
}

#[derive(Debug, Clone)]
pub struct Particle {
    x: f64,
    y: f64,
    shape: ShapeKind,
    radius: f64,
    color: Rgba,
    default_color: Rgba,
    wobble: (f64, f64),
    talomere: Talomere,
    queue: VecDeque<Leg>,
    target: Option<Point>,
    path: VecDeque<(f64, f64)>,
}

impl Particle {
    /// A new, immortal particle resting at (`x`, `y`).
    pub fn new(shape: ShapeKind, x: f64, y: f64, radius: f64, color: Rgba) -> Self {
        Self {
            x,
            y,
            shape,
            radius,
            color,
            default_color: color,
            wobble: (0.0, 0.0),
            talomere: Talomere::Immortal,
            queue: VecDeque::new(),
            target: None,
            path: VecDeque::new(),
        }
    }

    /// Queue a move. An in-flight transition is never interrupted.
    pub fn move_to(&mut self, request: MoveRequest) {
        let (target, frames) = match request {
            MoveRequest::Reposition(point) => (point, transition_frames()),
            MoveRequest::Recycle(snapshot) => {
                self.shape = snapshot.shape;
                self.radius = snapshot.radius;
                self.talomere = snapshot.talomere;
                let target = Point {
                    color: snapshot.color,
                    ..snapshot.position
                };
                (target, snapshot.frames)
            }
        };
        // A move without a color restores the default rather than keeping the old one.
        self.color = target.color.unwrap_or(self.default_color);
        self.queue.push_back(Leg {
            x: target.x,
            y: target.y,
            frames,
        });
    }

    /// One render tick: advance, draw, then age.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, display: &mut dyn Display) {
        if self.talomere.is_dead() {
            return;
        }
        self.advance(rng);
        self.draw(display);
        self.talomere.tick();
    }

    /// Step the motion state machine once.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        if self.step_path() {
            return;
        }

        if let Some(leg) = self.queue.pop_front() {
            let frames = jitter(leg.frames, rng);
            self.wobble = (0.0, 0.0);
            self.target = Some(Point::new(leg.x, leg.y));
            self.path = ease_path((self.x, self.y), (leg.x, leg.y), frames);
            self.step_path();
            return;
        }

        self.target = None;
        self.wobble = (
            rng.random_range(-WOBBLE..=WOBBLE),
            rng.random_range(-WOBBLE..=WOBBLE),
        );
    }

    fn step_path(&mut self) -> bool {
        match self.path.pop_front() {
            Some((x, y)) => {
                self.x = x;
                self.y = y;
                true
            }
            None => false,
        }
    }

    pub fn draw(&self, display: &mut dyn Display) {
        let center = (self.x + self.wobble.0, self.y + self.wobble.1);
        let (shape, radius, color) = (self.shape, self.radius, self.color);
        display.draw_shape(&mut |surface| match shape {
            ShapeKind::Dot => surface.fill_circle(center, radius, color),
            ShapeKind::Hexagon => surface.fill_polygon(&hexagon(center, radius), color),
        });
    }

    /// Resting position, without wobble.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Target of the transition in progress, if any.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// No transition in progress and nothing queued.
    pub fn is_idle(&self) -> bool {
        self.path.is_empty() && self.queue.is_empty()
    }

    /// Number of moves waiting behind the current transition.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn wobble(&self) -> (f64, f64) {
        self.wobble
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn talomere(&self) -> Talomere {
        self.talomere
    }

    /// Cancel any pending death.
    pub fn revive(&mut self) {
        self.talomere = Talomere::Immortal;
    }

    pub fn is_dead(&self) -> bool {
        self.talomere.is_dead()
    }
}

fn jitter<R: Rng>(frames: u32, rng: &mut R) -> u32 {
    let offset = rng.random_range(-FRAME_JITTER..=FRAME_JITTER);
    (i64::from(frames) + offset).max(1) as u32
}

/// Positions easing from `from` to `to` over `frames` ticks.
///
/// Offset at step `n` is `sin(n * PI / (2 * frames))` of the full distance,
/// which decelerates into the target. The last entry is exactly `to`.
fn ease_path(from: (f64, f64), to: (f64, f64), frames: u32) -> VecDeque<(f64, f64)> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let span = 2.0 * f64::from(frames);
    let mut path: VecDeque<_> = (EASE_START..frames)
        .map(|n| {
            let f = (f64::from(n) * PI / span).sin();
            (from.0 + f * dx, from.1 + f * dy)
        })
        .collect();
    path.push_back(to);
    path
}
