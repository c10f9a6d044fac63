//! Settings persistence

use crate::infrastructure::vault::MARKER_DIR;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Host storage for the settings payload
#[allow(async_fn_in_trait)]
pub trait SettingsPersistence {
    /// Stored payload, `None` when nothing has been saved yet
    async fn load_data(&self) -> io::Result<Option<Value>>;

    async fn save_data(&self, data: &Value) -> io::Result<()>;
}

/// Settings stored as TOML at `.chain/config.toml` in the vault
#[derive(Debug, Clone)]
pub struct TomlSettingsFile {
    path: PathBuf,
}

impl TomlSettingsFile {
    pub fn new(path: PathBuf) -> Self {
        TomlSettingsFile { path }
    }

    pub fn in_vault(root: &Path) -> Self {
        TomlSettingsFile::new(root.join(MARKER_DIR).join("config.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsPersistence for TomlSettingsFile {
    async fn load_data(&self) -> io::Result<Option<Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let value = toml::from_str::<Value>(&contents).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to parse {}: {}", self.path.display(), e),
            )
        })?;
        Ok(Some(value))
    }

    async fn save_data(&self, data: &Value) -> io::Result<()> {
        let contents = toml::to_string_pretty(data).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to serialize settings: {}", e),
            )
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, contents).await?;
        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}
