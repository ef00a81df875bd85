//! Script vocabulary for the script runner.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay after a step when the script does not give one.
pub const DEFAULT_STEP_TIMEOUT_MS: u64 = 4000;

/// One command issued to the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum Command {
    /// Reflow the swarm into rendered text.
    Text { value: String },
    /// Reflow the swarm into an image loaded from disk.
    #[serde(alias = "img")]
    Image { value: PathBuf },
    /// Change the particle radius (and sampling resolution).
    #[serde(alias = "size")]
    Radius { value: f64 },
    /// Briefly pop every particle.
    Pulse,
    /// Drop every particle.
    Clear,
    /// Hand control over to keyboard input and stop the script.
    Enable,
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Text { .. } => "text",
            Command::Image { .. } => "image",
            Command::Radius { .. } => "radius",
            Command::Pulse => "pulse",
            Command::Clear => "clear",
            Command::Enable => "enable",
        }
    }
}

/// A command plus the pause that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub command: Command,
    #[serde(default, alias = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Step {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            timeout_ms: None,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Pause after this step completes.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_STEP_TIMEOUT_MS))
    }

    /// The greeting played when no script is configured.
    pub fn greeting() -> Vec<Step> {
        let text = |value: &str| Step::new(Command::Text {
            value: value.to_string(),
        });
        let radius = |value: f64| Step::new(Command::Radius { value }).with_timeout_ms(300);
        vec![
            text("Hello"),
            text("It's me"),
            radius(0.5),
            text("So..."),
            radius(1.0),
            text("Here's wishing you"),
            Step::new(Command::Pulse),
            text("Happy Birthday!").with_timeout_ms(5000),
            radius(0.5),
            text("<(oo)>"),
            radius(1.0).with_timeout_ms(5000),
            text("Type..."),
            Step::new(Command::Enable),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_steps() {
        #[derive(Deserialize)]
        struct Script {
            step: Vec<Step>,
        }

        let script: Script = toml::from_str(
            r#"
            [[step]]
            cmd = "text"
            value = "Hello"

            [[step]]
            cmd = "size"
            value = 4
            timeout = 300

            [[step]]
            cmd = "pulse"
            "#,
        )
        .unwrap();

        assert_eq!(
            script.step,
            vec![
                Step::new(Command::Text {
                    value: "Hello".into()
                }),
                Step::new(Command::Radius { value: 4.0 }).with_timeout_ms(300),
                Step::new(Command::Pulse),
            ]
        );
    }

    #[test]
    fn parses_json_steps_with_aliases() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[{"cmd": "img", "value": "./sps.png", "timeout": 10000}, {"cmd": "enable"}]"#,
        )
        .unwrap();

        assert_eq!(steps[0].command, Command::Image {
            value: PathBuf::from("./sps.png")
        });
        assert_eq!(steps[0].timeout(), Duration::from_secs(10));
        assert_eq!(steps[1].timeout(), Duration::from_millis(DEFAULT_STEP_TIMEOUT_MS));
    }

    #[test]
    fn greeting_ends_with_enable() {
        let steps = Step::greeting();
        assert_eq!(steps.last().map(|s| &s.command), Some(&Command::Enable));
    }
}
