//! End-to-end reflow through the public API.

use pixelswarm_core::{Dimensions, Point, Rgba};
use pixelswarm_engine::{ShapeList, Stage, StageSettings, Talomere, transition_frames};

const VIEWPORT: Dimensions = Dimensions::new(160, 92);

fn stage() -> Stage {
    Stage::seeded(StageSettings::default(), VIEWPORT, Some(2024))
}

fn run(stage: &mut Stage, display: &mut ShapeList, ticks: u32) {
    let now = std::time::Instant::now();
    for _ in 0..ticks {
        display.clear();
        stage.tick(now, display);
    }
}

/// Enough ticks for any jittered transition to finish.
fn settle_ticks() -> u32 {
    transition_frames() + 20
}

#[test]
fn two_points_then_one() {
    let mut stage = stage();
    let mut display = ShapeList::new(VIEWPORT);

    let first = [Point::new(10.0, 10.0), Point::new(20.0, 20.0)];
    stage.configure_swarm(&first);
    assert_eq!(stage.swarm().len(), 2);

    run(&mut stage, &mut display, settle_ticks());
    let mut positions: Vec<_> = stage
        .swarm()
        .particles()
        .iter()
        .map(|p| (p.position().x, p.position().y))
        .collect();
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(positions, vec![(10.0, 10.0), (20.0, 20.0)]);
    assert!(stage.swarm().particles().iter().all(|p| p.is_idle()));

    stage.configure_swarm(&[Point::new(30.0, 30.0)]);
    let particles = stage.swarm().particles();
    assert_eq!(particles.len(), 2);

    let active: Vec<_> = particles
        .iter()
        .filter(|p| p.talomere() == Talomere::Immortal)
        .collect();
    let retiring: Vec<_> = particles
        .iter()
        .filter_map(|p| match p.talomere() {
            Talomere::Remaining(n) => Some(n),
            Talomere::Immortal => None,
        })
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(retiring.len(), 1);
    assert!(retiring[0] > 0);

    run(&mut stage, &mut display, retiring[0]);
    assert_eq!(stage.swarm().len(), 1);

    run(&mut stage, &mut display, settle_ticks());
    assert_eq!(stage.swarm().particles()[0].position(), Point::new(30.0, 30.0));
}

#[test]
fn retiree_is_drawn_exactly_its_lifespan() {
    let mut stage = stage();
    let mut display = ShapeList::new(VIEWPORT);
    stage.configure_swarm(&[Point::new(5.0, 5.0), Point::new(6.0, 6.0)]);
    stage.configure_swarm(&[Point::new(7.0, 7.0)]);

    let lifespan = stage
        .swarm()
        .particles()
        .iter()
        .find_map(|p| match p.talomere() {
            Talomere::Remaining(n) => Some(n),
            Talomere::Immortal => None,
        })
        .unwrap();

    let now = std::time::Instant::now();
    let mut drawn_with_retiree = 0;
    for _ in 0..lifespan + 50 {
        display.clear();
        stage.tick(now, &mut display);
        if display.len() == 2 {
            drawn_with_retiree += 1;
        }
    }
    assert_eq!(drawn_with_retiree, lifespan);
}

#[test]
fn text_then_colored_points_keep_continuity() {
    let mut stage = stage();
    let mut display = ShapeList::new(VIEWPORT);

    let reflow = stage.show_text("Hi").unwrap();
    let text_particles = reflow.created;
    run(&mut stage, &mut display, 5);

    let red = Rgba::new(255, 0, 0, 1.0);
    let formation: Vec<_> = (0..text_particles / 2)
        .map(|i| Point::new(i as f64, 0.0).with_color(red))
        .collect();
    let reflow = stage.configure_swarm(&formation);

    assert_eq!(reflow.reused, formation.len());
    assert_eq!(reflow.created, 0);
    assert_eq!(reflow.retired, text_particles - formation.len());
    let reds = stage
        .swarm()
        .particles()
        .iter()
        .filter(|p| p.color() == red)
        .count();
    assert_eq!(reds, formation.len());
}
