//! Initialize journal use case

use crate::application::journal::JournalService;
use crate::application::settings_store::SettingsStore;
use crate::domain::Settings;
use crate::error::{ChainError, Result};
use crate::infrastructure::{
    FileSystemVault, ObsidianDailyNotes, SettingsPersistence, TomlSettingsFile, MARKER_DIR,
};
use std::path::Path;
use tracing::info;

/// Initialize a new journal vault at the specified path.
///
/// Writes the default settings to `.chain/config.toml`. With
/// `with_template` the default template file is created too; the return
/// value tells whether that happened.
pub async fn init(path: &Path, with_template: bool) -> Result<bool> {
    if !tokio::fs::try_exists(path).await? {
        tokio::fs::create_dir_all(path).await?;
    }

    let marker = path.join(MARKER_DIR);
    if tokio::fs::try_exists(&marker).await? {
        return Err(ChainError::Config(format!(
            "Directory already initialized: {}",
            path.display()
        )));
    }
    tokio::fs::create_dir(&marker).await?;

    let settings_file = TomlSettingsFile::in_vault(path);
    settings_file
        .save_data(&Settings::default().to_persisted())
        .await?;
    info!(path = %path.display(), "Initialized journal");

    if !with_template {
        return Ok(false);
    }

    let store = SettingsStore::load(settings_file, ObsidianDailyNotes::new(path)).await;
    let service = JournalService::new(store, FileSystemVault::new(path.to_path_buf()));
    service.ensure_template_file().await
}
