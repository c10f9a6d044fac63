//! In-memory collaborators for tests and embedding
//!
//! These are public rather than `#[cfg(test)]`: the integration tests under
//! `tests/` and embedders drive the full journal workflow through them
//! without a disk or a host application. Each one records the calls it sees
//! so callers can assert on them.

use crate::domain::{EntryKind, FileHandle};
use crate::infrastructure::config::SettingsPersistence;
use crate::infrastructure::host::{DailyNotesOptions, HostIntegration};
use crate::infrastructure::vault::Vault;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn key(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
enum Node {
    Folder,
    File(String),
}

#[derive(Debug, Default)]
struct VaultState {
    nodes: BTreeMap<String, Node>,
    folder_creations: Vec<String>,
    file_creations: Vec<String>,
    opened: Vec<String>,
    failing_folders: HashSet<String>,
    fail_file_creation: bool,
}

impl VaultState {
    fn parent_is_folder(&self, key: &str) -> bool {
        match key.rfind('/') {
            None => true,
            Some(index) => matches!(self.nodes.get(&key[..index]), Some(Node::Folder)),
        }
    }

    fn add_ancestors(&mut self, key: &str) {
        let mut end = 0;
        while let Some(offset) = key[end..].find('/') {
            end += offset;
            self.nodes
                .entry(key[..end].to_string())
                .or_insert(Node::Folder);
            end += 1;
        }
    }
}

/// Vault held entirely in memory.
///
/// Every call is recorded and yields to the scheduler first, so concurrent
/// workflows interleave the way they would against real storage.
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<VaultState>,
}

impl MemoryVault {
    pub fn new() -> Self {
        MemoryVault::default()
    }

    /// Seed a folder and its ancestors
    pub fn with_folder(self, path: &str) -> Self {
        {
            let mut state = lock(&self.state);
            let key = key(path);
            state.add_ancestors(&key);
            if !key.is_empty() {
                state.nodes.insert(key, Node::Folder);
            }
        }
        self
    }

    /// Seed a file and its ancestor folders
    pub fn with_file(self, path: &str, content: &str) -> Self {
        {
            let mut state = lock(&self.state);
            let key = key(path);
            state.add_ancestors(&key);
            state.nodes.insert(key, Node::File(content.to_string()));
        }
        self
    }

    /// Make every attempt to create `path` fail
    pub fn fail_folder_creation(self, path: &str) -> Self {
        lock(&self.state).failing_folders.insert(key(path));
        self
    }

    /// Make every file creation fail
    pub fn fail_file_creation(self) -> Self {
        lock(&self.state).fail_file_creation = true;
        self
    }

    /// Content of the file at `path`, if there is one
    pub fn content(&self, path: &str) -> Option<String> {
        match lock(&self.state).nodes.get(&key(path)) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn is_folder(&self, path: &str) -> bool {
        matches!(lock(&self.state).nodes.get(&key(path)), Some(Node::Folder))
    }

    /// Folder creations attempted, in order
    pub fn folder_creations(&self) -> Vec<String> {
        lock(&self.state).folder_creations.clone()
    }

    /// File creations attempted, in order
    pub fn file_creations(&self) -> Vec<String> {
        lock(&self.state).file_creations.clone()
    }

    /// Files opened, in order
    pub fn opened(&self) -> Vec<String> {
        lock(&self.state).opened.clone()
    }
}

impl Vault for MemoryVault {
    async fn exists(&self, path: &str) -> io::Result<bool> {
        tokio::task::yield_now().await;
        let key = key(path);
        Ok(key.is_empty() || lock(&self.state).nodes.contains_key(&key))
    }

    async fn stat(&self, path: &str) -> io::Result<Option<EntryKind>> {
        tokio::task::yield_now().await;
        let key = key(path);
        if key.is_empty() {
            return Ok(Some(EntryKind::Folder));
        }
        Ok(lock(&self.state).nodes.get(&key).map(|node| match node {
            Node::Folder => EntryKind::Folder,
            Node::File(_) => EntryKind::File,
        }))
    }

    async fn create_folder(&self, path: &str) -> io::Result<()> {
        tokio::task::yield_now().await;
        let key = key(path);
        let mut state = lock(&self.state);
        state.folder_creations.push(path.to_string());

        if state.failing_folders.contains(&key) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("folder creation refused: {}", path),
            ));
        }
        if state.nodes.contains_key(&key) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already exists: {}", path),
            ));
        }
        if !state.parent_is_folder(&key) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent folder missing: {}", path),
            ));
        }

        state.nodes.insert(key, Node::Folder);
        Ok(())
    }

    async fn create_file(&self, path: &str, content: &str) -> io::Result<FileHandle> {
        tokio::task::yield_now().await;
        let key = key(path);
        let mut state = lock(&self.state);
        state.file_creations.push(path.to_string());

        if state.fail_file_creation {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("file creation refused: {}", path),
            ));
        }
        if state.nodes.contains_key(&key) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already exists: {}", path),
            ));
        }
        if !state.parent_is_folder(&key) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent folder missing: {}", path),
            ));
        }

        state.nodes.insert(key, Node::File(content.to_string()));
        Ok(FileHandle::new(path))
    }

    async fn read(&self, file: &FileHandle) -> io::Result<String> {
        tokio::task::yield_now().await;
        self.content(&file.path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", file.path),
            )
        })
    }

    async fn open(&self, file: &FileHandle) -> io::Result<()> {
        tokio::task::yield_now().await;
        let mut state = lock(&self.state);
        if !matches!(state.nodes.get(&key(&file.path)), Some(Node::File(_))) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", file.path),
            ));
        }
        state.opened.push(file.path.clone());
        Ok(())
    }
}

/// Settings payload kept in memory
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    data: Mutex<Option<Value>>,
    saves: Mutex<usize>,
    fail_saves: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        MemoryPersistence::default()
    }

    /// Start with a previously stored payload
    pub fn with_data(data: Value) -> Self {
        MemoryPersistence {
            data: Mutex::new(Some(data)),
            ..MemoryPersistence::default()
        }
    }

    /// Make every save fail
    pub fn failing(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn data(&self) -> Option<Value> {
        lock(&self.data).clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

impl SettingsPersistence for MemoryPersistence {
    async fn load_data(&self) -> io::Result<Option<Value>> {
        Ok(self.data())
    }

    async fn save_data(&self, data: &Value) -> io::Result<()> {
        if self.fail_saves {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "settings storage is read-only",
            ));
        }
        *lock(&self.data) = Some(data.clone());
        *lock(&self.saves) += 1;
        Ok(())
    }
}

/// Host that records what the core asked of it
#[derive(Debug, Default)]
pub struct RecordingHost {
    syncs: Mutex<Vec<DailyNotesOptions>>,
    notices: Mutex<Vec<String>>,
    fail_syncs: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        RecordingHost::default()
    }

    /// Make every sync fail
    pub fn failing(mut self) -> Self {
        self.fail_syncs = true;
        self
    }

    pub fn syncs(&self) -> Vec<DailyNotesOptions> {
        lock(&self.syncs).clone()
    }

    pub fn notices(&self) -> Vec<String> {
        lock(&self.notices).clone()
    }
}

impl HostIntegration for RecordingHost {
    async fn sync_daily_notes(&self, options: &DailyNotesOptions) -> io::Result<()> {
        if self.fail_syncs {
            return Err(io::Error::other("host refused the daily notes options"));
        }
        lock(&self.syncs).push(options.clone());
        Ok(())
    }

    fn notice(&self, message: &str) {
        lock(&self.notices).push(message.to_string());
    }
}
