//! Entry handles and storage entry kinds

use std::fmt;

/// Kind of object found at a vault path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Folder => write!(f, "folder"),
        }
    }
}

/// Handle to a note file inside the vault
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    pub path: String,
}

impl FileHandle {
    pub fn new(path: impl Into<String>) -> Self {
        FileHandle { path: path.into() }
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
