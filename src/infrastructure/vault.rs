//! Storage collaborator and its file system implementation

use crate::domain::{EntryKind, FileHandle};
use crate::error::{ChainError, Result};
use crate::infrastructure::editor::EditorSession;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Folder that marks the root of a chain journal vault
pub const MARKER_DIR: &str = ".chain";

/// Narrow storage interface used by the entry workflow.
///
/// Paths are vault paths: `/`-separated and relative to the vault root,
/// optionally with a leading `/`.
#[allow(async_fn_in_trait)]
pub trait Vault {
    async fn exists(&self, path: &str) -> io::Result<bool>;

    /// Kind of entry at `path`, `None` when nothing is there
    async fn stat(&self, path: &str) -> io::Result<Option<EntryKind>>;

    /// Create a single folder; its parent must already exist
    async fn create_folder(&self, path: &str) -> io::Result<()>;

    /// Create a new file, failing if anything already exists at `path`
    async fn create_file(&self, path: &str, content: &str) -> io::Result<FileHandle>;

    async fn read(&self, file: &FileHandle) -> io::Result<String>;

    /// Bring the file in front of the user
    async fn open(&self, file: &FileHandle) -> io::Result<()>;
}

/// Vault backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FileSystemVault {
    root: PathBuf,
    editor: Option<String>,
}

impl FileSystemVault {
    /// Create a vault rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemVault { root, editor: None }
    }

    /// Editor command used by `open`; without one opening is a no-op
    pub fn with_editor(mut self, editor: Option<String>) -> Self {
        self.editor = editor;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover the vault root.
    /// First checks CHAIN_ROOT environment variable, then walks up from the
    /// current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("CHAIN_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_marker(&path) {
                return Ok(FileSystemVault::new(path));
            } else {
                return Err(ChainError::Config(format!(
                    "CHAIN_ROOT is set to '{}' but no {} directory found. \
                    Run 'chain init' in that directory or unset CHAIN_ROOT.",
                    path.display(),
                    MARKER_DIR
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover the vault root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        start
            .ancestors()
            .find(|candidate| Self::has_marker(candidate))
            .map(|root| FileSystemVault::new(root.to_path_buf()))
            .ok_or_else(|| ChainError::NotJournalDirectory(start.to_path_buf()))
    }

    pub fn has_marker(path: &Path) -> bool {
        path.join(MARKER_DIR).is_dir()
    }

    /// Map a vault path onto the file system, refusing to leave the root
    pub fn full_path(&self, path: &str) -> io::Result<PathBuf> {
        let mut full = self.root.clone();
        for segment in path.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path leaves the vault: {}", path),
                ));
            }
            full.push(segment);
        }
        Ok(full)
    }
}

impl Vault for FileSystemVault {
    async fn exists(&self, path: &str) -> io::Result<bool> {
        tokio::fs::try_exists(self.full_path(path)?).await
    }

    async fn stat(&self, path: &str) -> io::Result<Option<EntryKind>> {
        match tokio::fs::metadata(self.full_path(path)?).await {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Folder)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_folder(&self, path: &str) -> io::Result<()> {
        tokio::fs::create_dir(self.full_path(path)?).await
    }

    async fn create_file(&self, path: &str, content: &str) -> io::Result<FileHandle> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.full_path(path)?)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(FileHandle::new(path))
    }

    async fn read(&self, file: &FileHandle) -> io::Result<String> {
        tokio::fs::read_to_string(self.full_path(&file.path)?).await
    }

    async fn open(&self, file: &FileHandle) -> io::Result<()> {
        let full = self.full_path(&file.path)?;
        match &self.editor {
            Some(command) => EditorSession::new(command.clone())
                .open(&full)
                .map_err(|e| io::Error::other(e.to_string())),
            None => {
                debug!(path = %full.display(), "No editor configured, leaving file closed");
                Ok(())
            }
        }
    }
}
