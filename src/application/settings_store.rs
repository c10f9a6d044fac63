//! Loading, reading and updating settings

use crate::domain::{SettingKey, SettingValue, Settings};
use crate::error::{ChainError, Result};
use crate::infrastructure::{DailyNotesOptions, HostIntegration, SettingsPersistence};
use std::str::FromStr;
use tracing::{debug, error, info, warn};

/// Owns the settings snapshot and keeps persistence and host in step with it
pub struct SettingsStore<P, H> {
    persistence: P,
    host: H,
    settings: Settings,
}

impl<P: SettingsPersistence, H: HostIntegration> SettingsStore<P, H> {
    /// Load settings, falling back to defaults for missing or corrupt data.
    ///
    /// Never fails. The normalized payload is written back when it differs
    /// from what was stored, so the stored data always carries every field.
    pub async fn load(persistence: P, host: H) -> Self {
        let data = match persistence.load_data().await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Failed to read settings, using defaults");
                None
            }
        };

        let settings = match Settings::from_persisted(data.clone()) {
            Ok(settings) => settings,
            Err(reason) => {
                warn!(%reason, "Settings defaulted");
                Settings::default()
            }
        };

        let normalized = settings.to_persisted();
        if data.as_ref() != Some(&normalized) {
            if let Err(e) = persistence.save_data(&normalized).await {
                warn!(error = %e, "Failed to store normalized settings");
            }
        }
        debug!("Settings loaded");

        SettingsStore {
            persistence,
            host,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.settings.get(key)
    }

    /// Change one setting and persist it immediately.
    ///
    /// Returns `false` without touching storage or the host when the value
    /// is unchanged. The in-memory snapshot only changes once the save
    /// succeeded.
    pub async fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<bool> {
        let mut updated = self.settings.clone();
        if !updated.set(key, value)? {
            debug!(%key, "Setting unchanged");
            return Ok(false);
        }

        if let Err(e) = self.persistence.save_data(&updated.to_persisted()).await {
            error!(%key, error = %e, "Failed to save settings");
            self.host
                .notice(&format!("Failed to save setting '{}': {}", key, e));
            return Err(ChainError::Persistence(e));
        }

        self.settings = updated;
        info!(%key, "Setting updated");

        if key.syncs_host() {
            self.sync_host().await;
        }

        Ok(true)
    }

    /// Parse a key and raw value as typed by the user, then `set` them
    pub async fn set_from_str(&mut self, key: &str, raw: &str) -> Result<bool> {
        let key = SettingKey::from_str(key)?;
        let value = key.parse_value(raw)?;
        self.set(key, value).await
    }

    /// Mirror the current options into the host's daily-note feature.
    ///
    /// A failed sync is reported but never undoes the setting change.
    pub async fn sync_host(&self) {
        let options = DailyNotesOptions::from_settings(&self.settings);
        match self.host.sync_daily_notes(&options).await {
            Ok(()) => debug!("Host daily note options synced"),
            Err(e) => {
                warn!(error = %e, "Failed to sync host daily note options");
                self.host
                    .notice(&format!("Could not update daily note options: {}", e));
            }
        }
    }
}
