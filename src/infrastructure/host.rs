//! Host application integration

use crate::domain::settings::{
    Settings, DEFAULT_NEW_FILE_LOCATION, DEFAULT_TEMPLATE_FILE_LOCATION,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options of the host's native daily-note feature kept in step with ours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyNotesOptions {
    pub format: String,
    pub folder: String,
    pub template: String,
}

impl DailyNotesOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let or_default = |value: &str, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        DailyNotesOptions {
            format: settings.date_format.clone(),
            folder: or_default(&settings.new_file_location, DEFAULT_NEW_FILE_LOCATION),
            template: or_default(
                &settings.template_file_location,
                DEFAULT_TEMPLATE_FILE_LOCATION,
            ),
        }
    }
}

/// Adapter the host implements for cross-system consistency and user notices
#[allow(async_fn_in_trait)]
pub trait HostIntegration {
    /// Mirror our options into the host's daily-note feature
    async fn sync_daily_notes(&self, options: &DailyNotesOptions) -> io::Result<()>;

    /// Show a short message to the user
    fn notice(&self, message: &str);
}

/// Keeps an Obsidian vault's core daily-notes options in sync
#[derive(Debug, Clone)]
pub struct ObsidianDailyNotes {
    root: PathBuf,
}

impl ObsidianDailyNotes {
    pub fn new(root: &Path) -> Self {
        ObsidianDailyNotes {
            root: root.to_path_buf(),
        }
    }

    fn options_path(&self) -> PathBuf {
        self.root.join(".obsidian").join("daily-notes.json")
    }
}

impl HostIntegration for ObsidianDailyNotes {
    async fn sync_daily_notes(&self, options: &DailyNotesOptions) -> io::Result<()> {
        let config_dir = self.root.join(".obsidian");
        if !tokio::fs::try_exists(&config_dir).await? {
            debug!(
                path = %config_dir.display(),
                "No Obsidian configuration found, skipping daily notes sync"
            );
            return Ok(());
        }

        let path = self.options_path();
        let mut current = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e),
        };

        let desired = [
            ("format", &options.format),
            ("folder", &options.folder),
            ("template", &options.template),
        ];
        let changed = desired
            .iter()
            .any(|(key, value)| current.get(*key).and_then(Value::as_str) != Some(value.as_str()));
        if !changed {
            debug!("Daily notes options already up to date");
            return Ok(());
        }

        // Other keys the host keeps in this file are preserved
        for (key, value) in desired {
            current.insert(key.to_string(), Value::String(value.clone()));
        }
        let text = serde_json::to_string_pretty(&Value::Object(current))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(&path, text).await?;
        info!(path = %path.display(), "Updated daily notes options");
        Ok(())
    }

    fn notice(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn options() -> DailyNotesOptions {
        DailyNotesOptions::from_settings(&Settings::default())
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            new_file_location: String::new(),
            template_file_location: " ".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
            ..Settings::default()
        };
        let options = DailyNotesOptions::from_settings(&settings);
        assert_eq!(options.format, "YYYY-MM-DD");
        assert_eq!(options.folder, DEFAULT_NEW_FILE_LOCATION);
        assert_eq!(options.template, DEFAULT_TEMPLATE_FILE_LOCATION);
    }

    #[tokio::test]
    async fn test_sync_skipped_without_obsidian_dir() {
        let temp = TempDir::new().unwrap();
        let host = ObsidianDailyNotes::new(temp.path());

        host.sync_daily_notes(&options()).await.unwrap();
        assert!(!temp.path().join(".obsidian").exists());
    }

    #[tokio::test]
    async fn test_sync_writes_and_preserves_other_keys() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".obsidian")).unwrap();
        let path = temp.path().join(".obsidian/daily-notes.json");
        fs::write(&path, r#"{"autorun": true, "format": "DD.MM.YYYY"}"#).unwrap();

        let host = ObsidianDailyNotes::new(temp.path());
        host.sync_daily_notes(&options()).await.unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "autorun": true,
                "format": "YYYY-MM-DD dddd",
                "folder": DEFAULT_NEW_FILE_LOCATION,
                "template": DEFAULT_TEMPLATE_FILE_LOCATION,
            })
        );
    }

    #[tokio::test]
    async fn test_sync_leaves_matching_file_untouched() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".obsidian")).unwrap();
        let path = temp.path().join(".obsidian/daily-notes.json");
        let original = serde_json::to_string(&options()).unwrap();
        fs::write(&path, &original).unwrap();

        let host = ObsidianDailyNotes::new(temp.path());
        host.sync_daily_notes(&options()).await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
