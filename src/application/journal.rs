//! User-facing journal actions

use crate::application::materialize::{ensure_folder_structure, EntryMaterializer};
use crate::application::settings_store::SettingsStore;
use crate::domain::paths::parent_folder;
use crate::domain::settings::{DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_FILE_LOCATION};
use crate::domain::{resolve, EntryKind, FileHandle, ResolvedPaths, TimeReference};
use crate::error::{ChainError, Result};
use crate::infrastructure::{HostIntegration, SettingsPersistence, Vault};
use chrono::NaiveDate;
use tracing::{debug, error, info};

/// Entry points the host exposes to the user.
///
/// Built once at startup from its collaborators and passed to whatever
/// needs it.
pub struct JournalService<V, P, H> {
    store: SettingsStore<P, H>,
    materializer: EntryMaterializer<V>,
}

impl<V, P, H> JournalService<V, P, H>
where
    V: Vault,
    P: SettingsPersistence,
    H: HostIntegration,
{
    pub fn new(store: SettingsStore<P, H>, vault: V) -> Self {
        JournalService {
            store,
            materializer: EntryMaterializer::new(vault),
        }
    }

    pub fn store(&self) -> &SettingsStore<P, H> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SettingsStore<P, H> {
        &mut self.store
    }

    pub fn vault(&self) -> &V {
        self.materializer.vault()
    }

    /// Paths the entry for `date` would use, without touching storage
    pub fn preview(&self, date: NaiveDate) -> ResolvedPaths {
        resolve(date, self.store.settings())
    }

    /// Create or open the entry for a chosen date
    pub async fn open_entry(&self, date: NaiveDate) -> Result<FileHandle> {
        self.materializer
            .create_or_update(date, self.store.settings())
            .await
            .map_err(|e| self.report(e, "Failed to create or open daily note"))
    }

    /// Create or open today's entry
    pub async fn open_today(&self, today: NaiveDate) -> Result<FileHandle> {
        self.open_entry(today).await
    }

    /// Create or open the entry for a date typed by the user
    pub async fn open_reference(&self, input: &str, today: NaiveDate) -> Result<FileHandle> {
        let date = TimeReference::parse(input)?.resolve(today);
        debug!(%input, %date, "Resolved date input");
        self.open_entry(date).await
    }

    /// Sync host options, then open today's entry if the user asked for it
    pub async fn startup(&self, today: NaiveDate) -> Result<Option<FileHandle>> {
        self.store.sync_host().await;

        if !self.store.settings().open_daily_note_on_startup {
            debug!("Opening on startup is disabled");
            return Ok(None);
        }
        self.open_today(today).await.map(Some)
    }

    /// Create the configured template file with the default template.
    ///
    /// Returns `false` when a file is already there; it is never overwritten.
    pub async fn ensure_template_file(&self) -> Result<bool> {
        let configured = self.store.settings().template_file_location.trim();
        let location = if configured.is_empty() {
            DEFAULT_TEMPLATE_FILE_LOCATION
        } else {
            configured
        };

        self.create_template_file(location)
            .await
            .map_err(|e| self.report(e, "Failed to create template file"))
    }

    async fn create_template_file(&self, location: &str) -> Result<bool> {
        let vault = self.vault();
        let existing = vault
            .stat(location)
            .await
            .map_err(|source| ChainError::Storage {
                path: location.to_string(),
                source,
            })?;

        match existing {
            Some(EntryKind::File) => {
                debug!(path = %location, "Template file already exists");
                Ok(false)
            }
            Some(EntryKind::Folder) => Err(ChainError::UnexpectedEntryType {
                path: location.to_string(),
                expected: EntryKind::File,
                found: EntryKind::Folder,
            }),
            None => {
                if let Some(parent) = parent_folder(location) {
                    ensure_folder_structure(vault, parent).await?;
                }
                vault
                    .create_file(location, DEFAULT_TEMPLATE)
                    .await
                    .map_err(|source| ChainError::FileCreationFailed {
                        path: location.to_string(),
                        source,
                    })?;
                info!(path = %location, "Created template file");
                Ok(true)
            }
        }
    }

    /// Log a failure and tell the user about it
    fn report(&self, err: ChainError, action: &str) -> ChainError {
        error!(error = %err, "{}", action);
        self.store.host().notice(&format!("{}: {}", action, err));
        err
    }
}
