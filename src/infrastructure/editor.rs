//! Launching an external editor for opened entries

use crate::error::{ChainError, Result};
use std::path::Path;
use std::process::Command;

/// Editor command from the environment (EDITOR, then VISUAL)
pub fn editor_from_env() -> Option<String> {
    ["EDITOR", "VISUAL"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Session for opening files in an external editor
pub struct EditorSession {
    command: String,
}

impl EditorSession {
    pub fn new(editor_command: String) -> Self {
        EditorSession {
            command: editor_command,
        }
    }

    /// Launch the editor on a file and return without waiting for it
    pub fn open(&self, file_path: &Path) -> Result<()> {
        let (program, mut args) = self
            .parse_command()
            .ok_or_else(|| ChainError::Editor("Editor command is empty".to_string()))?;
        args.push(file_path.to_string_lossy().to_string());

        // cmd /C lets Windows resolve .bat and .cmd editors
        #[cfg(windows)]
        let mut command = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&program);
            cmd
        };

        #[cfg(not(windows))]
        let mut command = Command::new(&program);

        command.args(&args).spawn().map_err(|e| {
            ChainError::Editor(format!("Failed to launch editor '{}': {}", program, e))
        })?;

        Ok(())
    }

    /// Split the command into program and arguments
    fn parse_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}
