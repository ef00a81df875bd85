//! Script file loading.

use std::fs;
use std::path::Path;

use pixelswarm_core::Step;
use serde::Deserialize;

use crate::ConfigError;

/// TOML scripts are a list of `[[step]]` tables.
#[derive(Debug, Deserialize)]
struct TomlScript {
    #[serde(default)]
    step: Vec<Step>,
}

/// Load a script, picking the format from the file extension.
pub fn load_script(path: &Path) -> Result<Vec<Step>, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&Path, &str) -> Result<Vec<Step>, ConfigError> = match extension.as_deref() {
        Some("toml") => parse_toml,
        Some("json") => parse_json,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &contents)
}

fn parse_toml(path: &Path, contents: &str) -> Result<Vec<Step>, ConfigError> {
    toml::from_str::<TomlScript>(contents)
        .map(|script| script.step)
        .map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_json(path: &Path, contents: &str) -> Result<Vec<Step>, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pixelswarm_core::Command;

    use super::*;

    #[test]
    fn loads_toml_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.toml");
        fs::write(
            &path,
            "[[step]]\ncmd = \"text\"\nvalue = \"Hi\"\n\n[[step]]\ncmd = \"enable\"\n",
        )
        .unwrap();

        let steps = load_script(&path).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].command, Command::Enable);
    }

    #[test]
    fn loads_json_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.JSON");
        fs::write(&path, r#"[{"cmd": "pulse", "timeout": 100}]"#).unwrap();

        let steps = load_script(&path).unwrap();
        assert_eq!(steps, vec![Step::new(Command::Pulse).with_timeout_ms(100)]);
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(matches!(
            load_script(Path::new("show.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn reports_missing_file() {
        assert!(matches!(
            load_script(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn bundled_demos_parse() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        for name in ["tour.toml", "tour.json"] {
            let steps = load_script(&demos.join(name)).unwrap();
            assert_eq!(steps.last().map(|s| &s.command), Some(&Command::Enable));
        }
    }

    #[test]
    fn reports_bad_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.json");
        fs::write(&path, r#"[{"cmd": "dance"}]"#).unwrap();

        assert!(matches!(load_script(&path), Err(ConfigError::Json { .. })));
    }
}
