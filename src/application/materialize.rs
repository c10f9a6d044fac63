//! Create-or-open workflow for dated entries

use crate::domain::paths::folder_segments;
use crate::domain::{resolve, EntryKind, FileHandle, ResolvedPaths, Settings, Template};
use crate::error::{ChainError, Result};
use crate::infrastructure::Vault;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::{debug, info, warn};

fn storage_error(path: &str) -> impl FnOnce(io::Error) -> ChainError + '_ {
    move |source| ChainError::Storage {
        path: path.to_string(),
        source,
    }
}

/// Per-path gates so that materializations of one entry run one at a time
#[derive(Debug, Default)]
struct InFlight {
    gates: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InFlight {
    fn gate(&self, path: &str) -> Arc<AsyncMutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        gates.entry(path.to_string()).or_default().clone()
    }

    /// Take a share of the gate for `path`; it is handed back on drop
    fn ticket<'a>(&'a self, path: &'a str) -> GateTicket<'a> {
        GateTicket {
            in_flight: self,
            path,
            gate: Some(self.gate(path)),
        }
    }

    /// Hand back a gate, dropping it from the map once nobody else waits on it
    fn release(&self, path: &str, gate: Arc<AsyncMutex<()>>) {
        drop(gate);
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        if gates.get(path).is_some_and(|g| Arc::strong_count(g) == 1) {
            gates.remove(path);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Share of one path's gate, released even when the holder is cancelled
struct GateTicket<'a> {
    in_flight: &'a InFlight,
    path: &'a str,
    gate: Option<Arc<AsyncMutex<()>>>,
}

impl GateTicket<'_> {
    async fn lock(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        }
    }
}

impl Drop for GateTicket<'_> {
    fn drop(&mut self) {
        if let Some(gate) = self.gate.take() {
            self.in_flight.release(self.path, gate);
        }
    }
}

/// Ensures an entry's folder and file exist, then opens it
pub struct EntryMaterializer<V> {
    vault: V,
    in_flight: InFlight,
}

impl<V: Vault> EntryMaterializer<V> {
    pub fn new(vault: V) -> Self {
        EntryMaterializer {
            vault,
            in_flight: InFlight::default(),
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Create the entry for `date` if it is missing and open it.
    ///
    /// Existing entries are opened untouched. Concurrent calls for the same
    /// date are serialized, so only the first one creates the file.
    pub async fn create_or_update(
        &self,
        date: NaiveDate,
        settings: &Settings,
    ) -> Result<FileHandle> {
        let paths = resolve(date, settings);
        debug!(path = %paths.file_path, "Materializing entry");

        let ticket = self.in_flight.ticket(&paths.file_path);
        let _guard = ticket.lock().await;
        self.materialize(date, settings, &paths).await
    }

    async fn materialize(
        &self,
        date: NaiveDate,
        settings: &Settings,
        paths: &ResolvedPaths,
    ) -> Result<FileHandle> {
        ensure_folder_structure(&self.vault, &paths.folder_path).await?;

        let file = match self
            .vault
            .stat(&paths.file_path)
            .await
            .map_err(storage_error(&paths.file_path))?
        {
            Some(EntryKind::File) => {
                debug!(path = %paths.file_path, "Entry already exists");
                FileHandle::new(paths.file_path.as_str())
            }
            Some(EntryKind::Folder) => {
                return Err(ChainError::UnexpectedEntryType {
                    path: paths.file_path.clone(),
                    expected: EntryKind::File,
                    found: EntryKind::Folder,
                });
            }
            None => {
                let template = self.load_template(settings).await;
                let content = template.render(date, settings);
                let file = self
                    .vault
                    .create_file(&paths.file_path, &content)
                    .await
                    .map_err(|source| ChainError::FileCreationFailed {
                        path: paths.file_path.clone(),
                        source,
                    })?;
                info!(path = %file, "Created entry");
                file
            }
        };

        self.vault
            .open(&file)
            .await
            .map_err(|source| ChainError::OpenFailed {
                path: file.path.clone(),
                source,
            })?;

        Ok(file)
    }

    /// Template file when it resolves, otherwise the configured default
    async fn load_template(&self, settings: &Settings) -> Template {
        let location = settings.template_file_location.trim();
        if location.is_empty() {
            return Template::from_settings(settings);
        }

        match self.vault.stat(location).await {
            Ok(Some(EntryKind::File)) => {
                match self.vault.read(&FileHandle::new(location)).await {
                    Ok(content) => return Template::from_file(location, content),
                    Err(e) => {
                        warn!(path = %location, error = %e, "Template file unreadable, using default template")
                    }
                }
            }
            Ok(_) => {
                warn!(path = %location, "Template file not found, using default template")
            }
            Err(e) => {
                warn!(path = %location, error = %e, "Template file unreadable, using default template")
            }
        }

        Template::from_settings(settings)
    }
}

/// Make sure every segment of `folder_path` exists as a folder.
///
/// Segments are created one at a time from the top down. The first failure
/// aborts with the path of the segment that could not be created.
pub async fn ensure_folder_structure<V: Vault>(vault: &V, folder_path: &str) -> Result<()> {
    if folder_path.trim_matches('/').is_empty() {
        return Ok(());
    }

    // A file at the folder path falls through to the segment walk, which
    // reports it
    if let Some(EntryKind::Folder) = vault
        .stat(folder_path)
        .await
        .map_err(storage_error(folder_path))?
    {
        return Ok(());
    }

    for segment in folder_segments(folder_path) {
        match vault.stat(&segment).await.map_err(storage_error(&segment))? {
            Some(EntryKind::Folder) => continue,
            Some(EntryKind::File) => {
                return Err(ChainError::UnexpectedEntryType {
                    path: segment,
                    expected: EntryKind::Folder,
                    found: EntryKind::File,
                });
            }
            None => match vault.create_folder(&segment).await {
                Ok(()) => debug!(path = %segment, "Created folder"),
                Err(source) => {
                    // Someone else may have created it since the stat
                    let raced = source.kind() == io::ErrorKind::AlreadyExists
                        && matches!(vault.stat(&segment).await, Ok(Some(EntryKind::Folder)));
                    if !raced {
                        return Err(ChainError::FolderCreationFailed {
                            path: segment,
                            source,
                        });
                    }
                    debug!(path = %segment, "Folder appeared concurrently");
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryVault;

    fn may_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 15).unwrap()
    }

    #[tokio::test]
    async fn test_creates_missing_segments_in_order() {
        let vault = MemoryVault::new().with_folder("/Journal");

        ensure_folder_structure(&vault, "/Journal/2023/05-May/")
            .await
            .unwrap();

        assert_eq!(
            vault.folder_creations(),
            vec!["/Journal/2023", "/Journal/2023/05-May"]
        );
    }

    #[tokio::test]
    async fn test_existing_folder_needs_no_creation() {
        let vault = MemoryVault::new().with_folder("/Journal/2023/05-May");

        ensure_folder_structure(&vault, "/Journal/2023/05-May/")
            .await
            .unwrap();
        ensure_folder_structure(&vault, "/").await.unwrap();

        assert!(vault.folder_creations().is_empty());
    }

    #[tokio::test]
    async fn test_file_in_place_of_segment() {
        let vault = MemoryVault::new().with_file("/Journal", "not a folder");

        let err = ensure_folder_structure(&vault, "/Journal/2023/")
            .await
            .unwrap_err();

        match err {
            ChainError::UnexpectedEntryType {
                path,
                expected,
                found,
            } => {
                assert_eq!(path, "/Journal");
                assert_eq!(expected, EntryKind::Folder);
                assert_eq!(found, EntryKind::File);
            }
            other => panic!("Expected UnexpectedEntryType, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_file_in_place_of_entry_folder() {
        let vault = MemoryVault::new().with_file("/Journal/2023/05-May", "not a folder");
        let materializer = EntryMaterializer::new(vault);

        let err = materializer
            .create_or_update(may_15(), &Settings::default())
            .await
            .unwrap_err();

        match err {
            ChainError::UnexpectedEntryType {
                path,
                expected,
                found,
            } => {
                assert_eq!(path, "/Journal/2023/05-May");
                assert_eq!(expected, EntryKind::Folder);
                assert_eq!(found, EntryKind::File);
            }
            other => panic!("Expected UnexpectedEntryType, got {:?}", other),
        }
        assert!(materializer.vault().file_creations().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_template_location_falls_back() {
        let vault = MemoryVault::new().with_folder("/Templates/Daily Note Template.md");
        let materializer = EntryMaterializer::new(vault);
        let settings = Settings {
            default_template: "# {date}".to_string(),
            ..Settings::default()
        };

        let template = materializer.load_template(&settings).await;
        assert_eq!(template.render(may_15(), &settings), "# 2023-05-15 Monday");
    }

    #[tokio::test]
    async fn test_gates_are_released() {
        let materializer = EntryMaterializer::new(MemoryVault::new());

        materializer
            .create_or_update(may_15(), &Settings::default())
            .await
            .unwrap();

        assert_eq!(materializer.in_flight.len(), 0);
    }

    #[tokio::test]
    async fn test_gate_released_when_waiter_is_cancelled() {
        let materializer = EntryMaterializer::new(MemoryVault::new());
        let file_path = resolve(may_15(), &Settings::default()).file_path;

        let holder = materializer.in_flight.ticket(&file_path);
        let held = holder.lock().await;

        // The waiter is polled once, blocks on the gate and is then dropped
        let settings = Settings::default();
        tokio::select! {
            biased;
            _ = materializer.create_or_update(may_15(), &settings) => {
                panic!("entry materialized while the gate was held")
            }
            _ = std::future::ready(()) => {}
        }
        assert_eq!(materializer.in_flight.len(), 1);

        drop(held);
        drop(holder);
        assert_eq!(materializer.in_flight.len(), 0);
        assert!(materializer.vault().file_creations().is_empty());
    }

    #[tokio::test]
    async fn test_gates_are_released_after_failure() {
        let vault = MemoryVault::new().fail_file_creation();
        let materializer = EntryMaterializer::new(vault);

        let err = materializer
            .create_or_update(may_15(), &Settings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ChainError::FileCreationFailed { .. }));
        assert_eq!(materializer.in_flight.len(), 0);
    }
}
