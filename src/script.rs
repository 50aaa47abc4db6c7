//! Scene scripts
//!
//! A [`SceneScript`] is a named, ordered list of commands stored as RON.
//! Loading a script and queueing its commands is equivalent to issuing the
//! same calls through [`SceneInterface`](crate::SceneInterface).

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::Command;

/// A serializable sequence of scene commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneScript {
    /// Script name (for display/debugging)
    pub name: String,
    /// Commands in submission order
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl SceneScript {
    /// Create a new empty script
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Parse a script from RON text
    pub fn from_ron(text: &str) -> Result<Self, ScriptError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a script from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ScriptError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save the script to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScriptError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Append a command
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// The script as call lines, one per command
    pub fn to_text(&self) -> String {
        self.commands.iter().map(|c| format!("{}\n", c)).collect()
    }
}

/// Error loading or saving a script
#[derive(Debug, Error)]
pub enum ScriptError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Parse error (invalid RON syntax or unknown command)
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Serialization error
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> SceneScript {
        let mut script = SceneScript::new("sample");
        script.push(Command::NewCamera {
            id: "cam1".to_string(),
            type_name: "PerspectiveCamera".to_string(),
        });
        script.push(Command::SetProperty {
            id: "cam1".to_string(),
            key: "fov".to_string(),
            values: vec![45.0],
        });
        script.push(Command::SaveFrameBuffer {
            framebuffer: "fb1".to_string(),
            path: PathBuf::from("out.fb"),
        });
        script
    }

    #[test]
    fn test_parse_script() {
        let text = r#"
            SceneScript(
                name: "tiny",
                commands: [
                    LoadPlugin(name: "PlasticShader"),
                    NewCamera(id: "cam1", type_name: "PerspectiveCamera"),
                    SetProperty(id: "cam1", key: "translate", values: [0.0, 1.0, 3.0]),
                    RenderScene(renderer: "ren1"),
                ],
            )
        "#;
        let script = SceneScript::from_ron(text).unwrap();
        assert_eq!(script.name, "tiny");
        assert_eq!(script.commands.len(), 4);
        assert_eq!(script.commands[0].name(), "LoadPlugin");
    }

    #[test]
    fn test_missing_commands_defaults_to_empty() {
        let script = SceneScript::from_ron(r#"(name: "empty")"#).unwrap();
        assert!(script.commands.is_empty());
    }

    #[test]
    fn test_unknown_command_is_parse_error() {
        let result = SceneScript::from_ron(r#"(name: "bad", commands: [Explode(id: "x")])"#);
        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("scenic_script_test.ron");
        let script = sample();
        script.save(&path).unwrap();
        assert_eq!(SceneScript::load(&path).unwrap(), script);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SceneScript::load("/nonexistent/scenic/script.ron");
        assert!(matches!(result, Err(ScriptError::Io(_))));
    }

    #[test]
    fn test_to_text() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], r#"SetProperty("cam1", "fov", 45)"#);
    }
}
