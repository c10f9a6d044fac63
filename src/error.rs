//! Error types for chain-journal

use crate::domain::EntryKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for chain-journal
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Not a chain journal: {0}")]
    NotJournalDirectory(PathBuf),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Failed to create folder '{path}': {source}")]
    FolderCreationFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create file '{path}': {source}")]
    FileCreationFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Expected a {expected} at '{path}' but found a {found}")]
    UnexpectedEntryType {
        path: String,
        expected: EntryKind,
        found: EntryKind,
    },

    #[error("Failed to open '{path}': {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Storage error at '{path}': {source}")]
    Storage {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save settings: {0}")]
    Persistence(#[source] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ChainError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ChainError::NotJournalDirectory(_) => 2,
            ChainError::InvalidDate(_) => 3,
            ChainError::FolderCreationFailed { .. }
            | ChainError::FileCreationFailed { .. }
            | ChainError::UnexpectedEntryType { .. } => 4,
            _ => 1,
        }
    }

    /// Failures the journal service reports to the user through a host notice
    pub fn is_noticed(&self) -> bool {
        matches!(
            self,
            ChainError::FolderCreationFailed { .. }
                | ChainError::FileCreationFailed { .. }
                | ChainError::UnexpectedEntryType { .. }
                | ChainError::OpenFailed { .. }
                | ChainError::Storage { .. }
                | ChainError::Persistence(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            ChainError::NotJournalDirectory(path) => {
                format!(
                    "Not a chain journal: {}\n\n\
                    Suggestions:\n\
                    • Run 'chain init' in your vault to set it up\n\
                    • Navigate to an existing vault\n\
                    • Set CHAIN_ROOT environment variable to your vault path",
                    path.display()
                )
            }
            ChainError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Valid dates:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2023-05-15)\n\n\
                    Examples:\n\
                    chain today\n\
                    chain next monday\n\
                    chain 2023-05-15",
                    input
                )
            }
            ChainError::FolderCreationFailed { path, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that '{}' is not an existing file\n\
                    • Check write permissions in the vault\n\
                    • Review the location pattern: chain config newFileLocation",
                    self, path
                )
            }
            ChainError::UnexpectedEntryType { .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Rename or move the conflicting entry\n\
                    • Change the file name format: chain config dateFormat",
                    self
                )
            }
            ChainError::Editor(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that your editor is installed and in PATH\n\
                    • Set EDITOR environment variable (e.g., export EDITOR=nano)",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using ChainError
pub type Result<T> = std::result::Result<T, ChainError>;
