//! The live particle collection and its reconciliation against new formations.

use pixelswarm_core::{Dimensions, Point, Rgba, ShapeKind};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::display::Display;
use crate::particle::{MoveRequest, Particle, ParticleSnapshot, Talomere, transition_frames};

/// Radius multiplier applied by a pulse.
pub const PULSE_FACTOR: f64 = 1.7;

/// Retiring more than this many particles at once shortens their lifespans.
const RETIRE_RUSH_THRESHOLD: usize = 50;

/// Appearance of newly born particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmSettings {
    pub radius: f64,
    pub shape: ShapeKind,
    pub color: Rgba,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            radius: 1.0,
            shape: ShapeKind::default(),
            color: Rgba::PARTICLE,
        }
    }
}

/// How a reconciliation mapped the old particles onto the new formation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflow {
    /// Existing particles sent to a formation point.
    pub reused: usize,
    /// Particles born for formation points nobody else could take.
    pub created: usize,
    /// Surplus particles sent off to die.
    pub retired: usize,
}

/// The swarm: every live particle plus the randomness that drives them.
#[derive(Debug)]
pub struct Swarm<R> {
    particles: Vec<Particle>,
    settings: SwarmSettings,
    rng: R,
}

impl<R: Rng> Swarm<R> {
    pub fn new(settings: SwarmSettings, rng: R) -> Self {
        Self {
            particles: Vec::new(),
            settings,
            rng,
        }
    }

    /// Drop dead particles, then tick every survivor.
    pub fn render(&mut self, display: &mut dyn Display) {
        self.purge();
        for particle in &mut self.particles {
            particle.tick(&mut self.rng, display);
        }
        self.purge();
    }

    /// Reshape the swarm into `formation`, reusing, creating and retiring
    /// particles as needed.
    pub fn reconfigure(&mut self, formation: &[Point], viewport: Dimensions) -> Reflow {
        self.purge();

        // Twice, so the reuse mapping looks random rather than orderly.
        self.particles.shuffle(&mut self.rng);
        self.particles.shuffle(&mut self.rng);

        let need = formation.len();
        let have = self.particles.len();
        let reused = need.min(have);

        let radius = self.settings.radius;
        for (particle, point) in self.particles.iter_mut().zip(formation) {
            // A reused retiree drops its retirement lifespan and size.
            particle.revive();
            particle.set_radius(radius);
            particle.move_to(MoveRequest::Reposition(*point));
        }

        let reflow = if need < have {
            let surplus = have - need;
            for i in need..have {
                let snapshot = self.retirement(viewport, surplus);
                self.particles[i].move_to(MoveRequest::Recycle(snapshot));
            }
            Reflow {
                reused,
                created: 0,
                retired: surplus,
            }
        } else {
            for point in &formation[have..] {
                let mut particle = self.birth(viewport);
                particle.move_to(MoveRequest::Reposition(*point));
                self.particles.push(particle);
            }
            Reflow {
                reused,
                created: need - have,
                retired: 0,
            }
        };

        debug!(
            reused = reflow.reused,
            created = reflow.created,
            retired = reflow.retired,
            live = self.particles.len(),
            "swarm reconfigured"
        );
        reflow
    }

    /// Change the radius for future births and every live particle.
    pub fn set_radius(&mut self, radius: f64) {
        self.settings.radius = radius;
        self.restore_radius();
    }

    /// Inflate every live particle by `factor`.
    pub fn inflate(&mut self, factor: f64) {
        for particle in &mut self.particles {
            particle.set_radius(particle.radius() * factor);
        }
    }

    /// Put every live particle back at the configured radius.
    pub fn restore_radius(&mut self) {
        let radius = self.settings.radius;
        for particle in &mut self.particles {
            particle.set_radius(radius);
        }
    }

    /// Shape used for future births.
    pub fn set_shape(&mut self, shape: ShapeKind) {
        self.settings.shape = shape;
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn settings(&self) -> SwarmSettings {
        self.settings
    }

    fn purge(&mut self) {
        self.particles.retain(|p| !p.is_dead());
    }

    fn random_position(&mut self, viewport: Dimensions) -> (f64, f64) {
        (
            self.rng.random::<f64>() * f64::from(viewport.width),
            self.rng.random::<f64>() * f64::from(viewport.height),
        )
    }

    fn birth(&mut self, viewport: Dimensions) -> Particle {
        let (x, y) = self.random_position(viewport);
        let SwarmSettings {
            radius,
            shape,
            color,
        } = self.settings;
        Particle::new(shape, x, y, radius, color)
    }

    /// Somewhere to drift off to and die.
    fn retirement(&mut self, viewport: Dimensions, surplus: usize) -> ParticleSnapshot {
        // Spread over one and a half viewports so many retirees leave the screen.
        let x = self.rng.random_range(-0.25..1.25) * f64::from(viewport.width);
        let y = self.rng.random_range(-0.25..1.25) * f64::from(viewport.height);
        let base = self.settings.radius;
        let radius = base / 2.0 + self.rng.random::<f64>() * base * 4.0;
        let lifespan = if surplus > RETIRE_RUSH_THRESHOLD {
            self.rng.random_range(50..150)
        } else {
            self.rng.random_range(100..300)
        };
        let alpha = self.rng.random_range(0.0..0.2);

        ParticleSnapshot {
            position: Point::new(x, y),
            shape: self.settings.shape,
            radius,
            color: Some(Rgba::RETIRED.with_alpha(alpha)),
            talomere: Talomere::Remaining(lifespan),
            frames: transition_frames(),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::display::ShapeList;

    const VIEWPORT: Dimensions = Dimensions::new(160, 96);

    fn swarm(seed: u64) -> Swarm<StdRng> {
        Swarm::new(SwarmSettings::default(), StdRng::seed_from_u64(seed))
    }

    fn formation(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, (i * 2) as f64)).collect()
    }

    fn retiring(swarm: &Swarm<StdRng>) -> usize {
        swarm
            .particles()
            .iter()
            .filter(|p| p.talomere().is_mortal())
            .count()
    }

    #[test]
    fn births_fill_an_empty_swarm() {
        let mut swarm = swarm(1);
        let reflow = swarm.reconfigure(&formation(5), VIEWPORT);
        assert_eq!(reflow, Reflow {
            reused: 0,
            created: 5,
            retired: 0
        });
        assert_eq!(swarm.len(), 5);
        for p in swarm.particles() {
            assert!(VIEWPORT.contains(&p.position()));
            assert_eq!(p.talomere(), Talomere::Immortal);
            assert_eq!(p.queued(), 1);
        }
    }

    #[test]
    fn surplus_particles_retire() {
        let mut swarm = swarm(2);
        swarm.reconfigure(&formation(10), VIEWPORT);
        let reflow = swarm.reconfigure(&formation(4), VIEWPORT);

        assert_eq!(reflow, Reflow {
            reused: 4,
            created: 0,
            retired: 6
        });
        assert_eq!(swarm.len(), 10);
        assert_eq!(retiring(&swarm), 6);
        for p in swarm.particles().iter().filter(|p| p.talomere().is_mortal()) {
            match p.talomere() {
                Talomere::Remaining(n) => assert!((100..300).contains(&n)),
                Talomere::Immortal => unreachable!(),
            }
            assert_eq!((p.color().r, p.color().g, p.color().b), (78, 108, 68));
            assert!(p.color().a < 0.2);
        }
    }

    #[test]
    fn mass_retirement_dies_sooner() {
        let mut swarm = swarm(3);
        swarm.reconfigure(&formation(200), VIEWPORT);
        swarm.reconfigure(&formation(10), VIEWPORT);

        for p in swarm.particles() {
            if let Talomere::Remaining(n) = p.talomere() {
                assert!((50..150).contains(&n));
            }
        }
    }

    #[test]
    fn reused_retirees_are_revived() {
        let mut swarm = swarm(4);
        swarm.reconfigure(&formation(10), VIEWPORT);
        swarm.reconfigure(&formation(2), VIEWPORT);
        swarm.reconfigure(&formation(10), VIEWPORT);

        assert_eq!(swarm.len(), 10);
        assert_eq!(retiring(&swarm), 0);
        let radius = swarm.settings().radius;
        assert!(swarm.particles().iter().all(|p| p.radius() == radius));
    }

    #[test]
    fn dead_particles_are_purged_before_reuse() {
        let mut swarm = swarm(5);
        let mut display = ShapeList::new(VIEWPORT);
        swarm.reconfigure(&formation(3), VIEWPORT);
        swarm.reconfigure(&formation(1), VIEWPORT);
        for _ in 0..300 {
            swarm.render(&mut display);
        }
        assert_eq!(swarm.len(), 1);

        let reflow = swarm.reconfigure(&formation(3), VIEWPORT);
        assert_eq!(reflow.reused, 1);
        assert_eq!(reflow.created, 2);
    }

    #[test]
    fn render_draws_every_live_particle() {
        let mut swarm = swarm(6);
        let mut display = ShapeList::new(VIEWPORT);
        swarm.reconfigure(&formation(7), VIEWPORT);
        swarm.render(&mut display);
        assert_eq!(display.len(), 7);
    }

    #[test]
    fn set_radius_is_retroactive() {
        let mut swarm = swarm(7);
        swarm.reconfigure(&formation(4), VIEWPORT);
        swarm.set_radius(3.0);
        assert!(swarm.particles().iter().all(|p| p.radius() == 3.0));

        swarm.reconfigure(&formation(6), VIEWPORT);
        assert!(swarm.particles().iter().all(|p| p.radius() == 3.0));
    }

    #[test]
    fn inflate_and_restore() {
        let mut swarm = swarm(8);
        swarm.reconfigure(&formation(4), VIEWPORT);
        swarm.inflate(PULSE_FACTOR);
        assert!(swarm.particles().iter().all(|p| p.radius() == PULSE_FACTOR));
        swarm.restore_radius();
        assert!(swarm.particles().iter().all(|p| p.radius() == 1.0));
    }

    #[test]
    fn new_shape_applies_to_births() {
        let mut swarm = swarm(9);
        swarm.set_shape(ShapeKind::Dot);
        swarm.reconfigure(&formation(2), VIEWPORT);
        assert!(swarm.particles().iter().all(|p| p.shape() == ShapeKind::Dot));
    }

    #[test]
    fn clear_drops_everything() {
        let mut swarm = swarm(10);
        swarm.reconfigure(&formation(4), VIEWPORT);
        swarm.clear();
        assert!(swarm.is_empty());
    }

    #[test]
    fn same_seed_same_mapping() {
        let mut a = swarm(11);
        let mut b = swarm(11);
        a.reconfigure(&formation(20), VIEWPORT);
        b.reconfigure(&formation(20), VIEWPORT);
        a.reconfigure(&formation(5), VIEWPORT);
        b.reconfigure(&formation(5), VIEWPORT);

        let positions = |s: &Swarm<StdRng>| -> Vec<Point> {
            s.particles().iter().map(|p| p.position()).collect()
        };
        assert_eq!(positions(&a), positions(&b));
    }

    proptest! {
        #[test]
        fn reconciliation_counts(have in 0usize..120, need in 0usize..120, seed in any::<u64>()) {
            let mut swarm = swarm(seed);
            swarm.reconfigure(&formation(have), VIEWPORT);
            let reflow = swarm.reconfigure(&formation(need), VIEWPORT);

            prop_assert_eq!(reflow.reused, have.min(need));
            prop_assert_eq!(reflow.created, need.saturating_sub(have));
            prop_assert_eq!(reflow.retired, have.saturating_sub(need));
            prop_assert_eq!(swarm.len(), have.max(need));
            prop_assert_eq!(retiring(&swarm), have.saturating_sub(need));
        }
    }
}
