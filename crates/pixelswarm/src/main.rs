mod canvas;

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use color_eyre::eyre::eyre;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pixelswarm_config::Config;
use pixelswarm_core::{Dimensions, ShapeKind};
use pixelswarm_engine::{
    ScriptEvent, ScriptRunner, ShapeList, Stage, StageSettings, SwarmSettings,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::canvas::SwarmCanvas;

/// Rows reserved below the canvas for the status line.
const STATUS_ROWS: u16 = 1;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    init_logging(&config)?;
    let steps = config.steps()?;

    let terminal = ratatui::init();
    let size = terminal.size()?;
    let app = App::new(&config, viewport(size.width, size.height));
    let result = app.run(terminal, ScriptRunner::new(steps));
    ratatui::restore();
    result
}

/// Send `tracing` output to the log file; the terminal belongs to the canvas.
fn init_logging(config: &Config) -> color_eyre::Result<()> {
    let Some(path) = config.log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))?;
    Ok(())
}

/// Canvas size in dots for a terminal of `cols` x `rows` cells.
fn viewport(cols: u16, rows: u16) -> Dimensions {
    Dimensions::from_cells(cols, rows.saturating_sub(STATUS_ROWS))
}

/// Who the keyboard is talking to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum InputMode {
    /// The script is playing; only a few control keys are live.
    #[default]
    Watching,
    /// The script handed over; keys are typed into the swarm.
    Typing,
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// The swarm and everything driving it.
    stage: Stage,
    /// Shapes recorded during the current frame.
    display: ShapeList,
    /// Current keyboard mode.
    mode: InputMode,
    /// Text typed since the last Enter.
    input: String,
    /// Shape used for newly born particles.
    shape: ShapeKind,
    /// Time between repaints.
    frame_interval: Duration,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config, viewport: Dimensions) -> Self {
        let settings = StageSettings {
            swarm: SwarmSettings {
                radius: config.radius,
                shape: config.shape,
                color: config.color,
            },
            fallback_text: config.fallback_text.clone(),
        };
        Self {
            running: false,
            stage: Stage::seeded(settings, viewport, config.seed),
            display: ShapeList::new(viewport),
            mode: InputMode::default(),
            input: String::new(),
            shape: config.shape,
            frame_interval: config.frame_interval(),
        }
    }

    /// Run the application's main loop.
    pub fn run(
        mut self,
        mut terminal: DefaultTerminal,
        mut script: ScriptRunner,
    ) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let frame_start = Instant::now();
            if let Some(event) = script.poll(frame_start, &mut self.stage) {
                self.on_script_event(event);
            }
            self.display.clear();
            self.stage.tick(frame_start, &mut self.display);
            terminal.draw(|frame| self.render(frame))?;

            let timeout = self.frame_interval.saturating_sub(frame_start.elapsed());
            self.handle_crossterm_events(timeout)?;
        }
        script.cancel();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let [canvas_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_ROWS)])
                .areas(frame.area());

        let canvas = SwarmCanvas::new(self.display.shapes(), self.stage.viewport());
        frame.render_widget(canvas, canvas_area);
        frame.render_widget(self.status_line(), status_area);
    }

    fn status_line(&self) -> Line<'static> {
        let accent = Color::Rgb(78, 108, 68);
        match self.mode {
            InputMode::Watching => Line::from(vec![
                "q".bold().fg(accent),
                " quit  ".dark_gray(),
                "p".bold().fg(accent),
                " pulse  ".dark_gray(),
                "c".bold().fg(accent),
                " clear  ".dark_gray(),
                "s".bold().fg(accent),
                " shape  ".dark_gray(),
                format!("{} particles", self.stage.swarm().len()).dark_gray(),
            ])
            .centered(),
            InputMode::Typing => Line::from(vec![
                "> ".bold().fg(accent),
                format!("{}_", self.input).white(),
                "  enter".bold().fg(accent),
                " show  ".dark_gray(),
                "esc".bold().fg(accent),
                " quit".dark_gray(),
            ]),
        }
    }

    fn on_script_event(&mut self, event: ScriptEvent) {
        match event {
            ScriptEvent::InputEnabled => {
                info!("keyboard input enabled");
                self.mode = InputMode::Typing;
            }
            ScriptEvent::Finished => info!("script finished without enabling input"),
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(cols, rows) => self.resize(viewport(cols, rows)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (self.mode, key.modifiers, key.code) {
            (_, _, KeyCode::Esc)
            | (_, KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (InputMode::Watching, _, KeyCode::Char('q')) => self.quit(),
            (InputMode::Watching, _, KeyCode::Char('p')) => {
                self.stage.pulse(Instant::now());
            }
            (InputMode::Watching, _, KeyCode::Char('c')) => self.stage.clear(),
            (InputMode::Watching, _, KeyCode::Char('s')) => self.toggle_shape(),
            (InputMode::Typing, _, KeyCode::Enter) => self.submit(),
            (InputMode::Typing, _, KeyCode::Backspace) => {
                self.input.pop();
            }
            (InputMode::Typing, _, KeyCode::Char(ch)) => self.input.push(ch),
            _ => {}
        }
    }

    /// Show the typed text and start over with an empty buffer.
    fn submit(&mut self) {
        let text = std::mem::take(&mut self.input);
        self.stage.show_text(&text);
    }

    /// Toggle between dots and hexagons for future births.
    fn toggle_shape(&mut self) {
        self.shape = self.shape.toggle();
        self.stage.set_shape(self.shape);
    }

    /// The stage picks the new size up from the display on its next tick.
    fn resize(&mut self, viewport: Dimensions) {
        self.display.resize(viewport);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
