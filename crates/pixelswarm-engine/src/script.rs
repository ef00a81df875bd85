//! Sequential script playback.
//!
//! The runner issues one command at a time. Each command yields a
//! [`Completion`]; once it fires, the runner sleeps for the step's timeout and
//! then moves on. Polling from the frame loop drives everything, so no
//! callbacks are left dangling when the runner is cancelled.

use std::time::{Duration, Instant};

use pixelswarm_core::{Command, Step};
use rand::Rng;
use tracing::info;

use crate::completion::Completion;
use crate::stage::Stage;

/// Something the frame loop should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptEvent {
    /// The script handed control to keyboard input.
    InputEnabled,
    /// The last step has been played.
    Finished,
}

#[derive(Debug)]
enum RunState {
    /// About to issue the step under the cursor.
    Ready,
    /// Waiting for the issued step to finish.
    Awaiting { done: Completion, pause: Duration },
    /// Pausing between steps.
    Sleeping { until: Instant },
    Finished,
    Cancelled,
}

#[derive(Debug)]
pub struct ScriptRunner {
    steps: Vec<Step>,
    cursor: usize,
    state: RunState,
}

impl ScriptRunner {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            cursor: 0,
            state: RunState::Ready,
        }
    }

    /// Advance as far as possible at `now`.
    pub fn poll<R: Rng>(&mut self, now: Instant, stage: &mut Stage<R>) -> Option<ScriptEvent> {
        loop {
            match &self.state {
                RunState::Finished | RunState::Cancelled => return None,
                RunState::Sleeping { until } => {
                    if now < *until {
                        return None;
                    }
                    self.state = RunState::Ready;
                }
                RunState::Awaiting { done, pause } => {
                    if !done.is_complete() {
                        return None;
                    }
                    self.state = RunState::Sleeping { until: now + *pause };
                }
                RunState::Ready => {
                    let Some(step) = self.steps.get(self.cursor).cloned() else {
                        info!("script finished");
                        self.state = RunState::Finished;
                        return Some(ScriptEvent::Finished);
                    };
                    self.cursor += 1;
                    info!(step = self.cursor, command = step.command.name(), "script step");

                    let pause = step.timeout();
                    let done = match step.command {
                        Command::Text { value } => {
                            stage.show_text(&value);
                            Completion::done()
                        }
                        Command::Image { value } => stage.show_image(&value),
                        Command::Radius { value } => {
                            stage.set_particle_radius(value);
                            Completion::done()
                        }
                        Command::Pulse => stage.pulse(now),
                        Command::Clear => {
                            stage.clear();
                            Completion::done()
                        }
                        Command::Enable => {
                            self.state = RunState::Finished;
                            return Some(ScriptEvent::InputEnabled);
                        }
                    };
                    self.state = RunState::Awaiting { done, pause };
                }
            }
        }
    }

    /// Stop issuing commands. Effects already started run to completion.
    pub fn cancel(&mut self) {
        if !self.is_done() {
            info!(step = self.cursor, "script cancelled");
            self.state = RunState::Cancelled;
        }
    }

    /// Finished or cancelled.
    pub fn is_done(&self) -> bool {
        matches!(self.state, RunState::Finished | RunState::Cancelled)
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, RunState::Cancelled)
    }

    /// Number of steps issued so far.
    pub fn issued(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pixelswarm_core::Dimensions;

    use super::*;
    use crate::display::ShapeList;
    use crate::stage::{PULSE_DURATION, StageSettings};

    const VIEWPORT: Dimensions = Dimensions::new(160, 92);

    fn stage() -> Stage {
        Stage::seeded(StageSettings::default(), VIEWPORT, Some(9))
    }

    fn text(value: &str) -> Step {
        Step::new(Command::Text {
            value: value.into(),
        })
    }

    #[test]
    fn waits_for_timeout_between_steps() {
        let start = Instant::now();
        let mut stage = stage();
        let mut runner = ScriptRunner::new(vec![
            text("A").with_timeout_ms(1000),
            text("B").with_timeout_ms(1000),
        ]);

        assert_eq!(runner.poll(start, &mut stage), None);
        assert_eq!(runner.issued(), 1);

        assert_eq!(runner.poll(start + Duration::from_millis(999), &mut stage), None);
        assert_eq!(runner.issued(), 1);

        assert_eq!(runner.poll(start + Duration::from_millis(1000), &mut stage), None);
        assert_eq!(runner.issued(), 2);

        assert_eq!(
            runner.poll(start + Duration::from_millis(2000), &mut stage),
            Some(ScriptEvent::Finished)
        );
        assert!(runner.is_done());
        assert_eq!(runner.poll(start + Duration::from_secs(60), &mut stage), None);
    }

    #[test]
    fn pulse_delay_starts_after_completion() {
        let start = Instant::now();
        let mut stage = stage();
        let mut display = ShapeList::new(VIEWPORT);
        let mut runner = ScriptRunner::new(vec![
            text("Hi").with_timeout_ms(0),
            Step::new(Command::Pulse).with_timeout_ms(100),
            text("Yo"),
        ]);

        runner.poll(start, &mut stage);
        assert_eq!(runner.issued(), 2);

        // The pulse is still inflated: nothing else may be issued.
        let before_revert = start + Duration::from_millis(200);
        stage.tick(before_revert, &mut display);
        runner.poll(before_revert, &mut stage);
        assert_eq!(runner.issued(), 2);

        let reverted = start + PULSE_DURATION;
        stage.tick(reverted, &mut display);
        runner.poll(reverted, &mut stage);
        assert_eq!(runner.issued(), 2);

        runner.poll(reverted + Duration::from_millis(100), &mut stage);
        assert_eq!(runner.issued(), 3);
    }

    #[test]
    fn radius_and_clear_steps() {
        let start = Instant::now();
        let mut stage = stage();
        let mut runner = ScriptRunner::new(vec![
            text("Hi").with_timeout_ms(0),
            Step::new(Command::Radius { value: 2.0 }).with_timeout_ms(0),
            Step::new(Command::Clear).with_timeout_ms(0),
        ]);

        assert_eq!(runner.poll(start, &mut stage), Some(ScriptEvent::Finished));
        assert_eq!(stage.swarm().settings().radius, 2.0);
        assert!(stage.swarm().is_empty());
    }

    #[test]
    fn enable_stops_the_script() {
        let start = Instant::now();
        let mut stage = stage();
        let mut runner = ScriptRunner::new(vec![
            Step::new(Command::Enable),
            text("never shown").with_timeout_ms(0),
        ]);

        assert_eq!(runner.poll(start, &mut stage), Some(ScriptEvent::InputEnabled));
        assert!(runner.is_done());
        assert_eq!(runner.poll(start + Duration::from_secs(10), &mut stage), None);
        assert!(stage.swarm().is_empty());
    }

    #[test]
    fn cancel_prevents_further_steps() {
        let start = Instant::now();
        let mut stage = stage();
        let mut runner = ScriptRunner::new(vec![text("A"), text("B")]);

        runner.poll(start, &mut stage);
        runner.cancel();
        assert!(runner.is_cancelled());
        assert_eq!(runner.poll(start + Duration::from_secs(60), &mut stage), None);
        assert_eq!(runner.issued(), 1);
    }

    #[test]
    fn image_step_waits_for_load() {
        let mut stage = stage();
        let mut display = ShapeList::new(VIEWPORT);
        let mut runner = ScriptRunner::new(vec![
            Step::new(Command::Image {
                value: PathBuf::from("/no/such/image.png"),
            })
            .with_timeout_ms(0),
            text("after").with_timeout_ms(0),
        ]);

        runner.poll(Instant::now(), &mut stage);
        assert_eq!(runner.issued(), 1);

        let deadline = Instant::now() + Duration::from_secs(10);
        while runner.issued() < 2 {
            assert!(Instant::now() < deadline, "image step never completed");
            stage.tick(Instant::now(), &mut display);
            runner.poll(Instant::now(), &mut stage);
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
