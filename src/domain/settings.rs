//! User settings and their defaults

use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Canonical content template for new entries
pub const DEFAULT_TEMPLATE: &str = "# {date}

## Daily Log
-

## Tasks
- [ ]

## Notes
-

## Reflections
-

---
## Habit Tracker
- [ ] Exercise
- [ ] Meditation
- [ ] Reading

## Gratitude
1.
2.
3.

## Tomorrow's Plan
-
";

pub const DEFAULT_JOURNAL_FOLDER: &str = "Journal";
pub const DEFAULT_NEW_FILE_LOCATION: &str = "/{{journalFolder}}/{{date:YYYY}}/{{date:MM-MMMM}}/";
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD dddd";
pub const DEFAULT_TEMPLATE_FILE_LOCATION: &str = "/Templates/Daily Note Template.md";

/// User-configurable patterns and templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub journal_folder: String,
    pub new_file_location: String,
    pub date_format: String,
    pub default_template: String,
    pub template_file_location: String,
    pub daily_notes_folder_override: String,
    pub open_daily_note_on_startup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            journal_folder: DEFAULT_JOURNAL_FOLDER.to_string(),
            new_file_location: DEFAULT_NEW_FILE_LOCATION.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            template_file_location: DEFAULT_TEMPLATE_FILE_LOCATION.to_string(),
            daily_notes_folder_override: String::new(),
            open_daily_note_on_startup: true,
        }
    }
}

/// Why persisted data was discarded in favor of defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defaulted {
    Missing,
    NotAnObject,
    Invalid(String),
}

impl fmt::Display for Defaulted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defaulted::Missing => write!(f, "no persisted settings"),
            Defaulted::NotAnObject => write!(f, "persisted settings are not an object"),
            Defaulted::Invalid(reason) => write!(f, "persisted settings are invalid: {}", reason),
        }
    }
}

impl Settings {
    /// Merge a persisted payload over the defaults.
    ///
    /// Missing fields take their default and unknown fields are ignored.
    /// A payload that is absent, not an object, or holds a field of the
    /// wrong type is replaced by the defaults entirely.
    pub fn from_persisted(data: Option<Value>) -> std::result::Result<Settings, Defaulted> {
        match data {
            None | Some(Value::Null) => Err(Defaulted::Missing),
            Some(value @ Value::Object(_)) => serde_json::from_value(value)
                .map_err(|e| Defaulted::Invalid(e.to_string())),
            Some(_) => Err(Defaulted::NotAnObject),
        }
    }

    /// Payload handed to the persistence collaborator
    pub fn to_persisted(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::JournalFolder => SettingValue::Text(self.journal_folder.clone()),
            SettingKey::NewFileLocation => SettingValue::Text(self.new_file_location.clone()),
            SettingKey::DateFormat => SettingValue::Text(self.date_format.clone()),
            SettingKey::DefaultTemplate => SettingValue::Text(self.default_template.clone()),
            SettingKey::TemplateFileLocation => {
                SettingValue::Text(self.template_file_location.clone())
            }
            SettingKey::DailyNotesFolderOverride => {
                SettingValue::Text(self.daily_notes_folder_override.clone())
            }
            SettingKey::OpenDailyNoteOnStartup => {
                SettingValue::Flag(self.open_daily_note_on_startup)
            }
        }
    }

    /// Assign a value, returning whether anything changed
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<bool> {
        if self.get(key) == value {
            return Ok(false);
        }

        match (key, value) {
            (SettingKey::JournalFolder, SettingValue::Text(text)) => self.journal_folder = text,
            (SettingKey::NewFileLocation, SettingValue::Text(text)) => {
                self.new_file_location = text
            }
            (SettingKey::DateFormat, SettingValue::Text(text)) => self.date_format = text,
            (SettingKey::DefaultTemplate, SettingValue::Text(text)) => {
                self.default_template = text
            }
            (SettingKey::TemplateFileLocation, SettingValue::Text(text)) => {
                self.template_file_location = text
            }
            (SettingKey::DailyNotesFolderOverride, SettingValue::Text(text)) => {
                self.daily_notes_folder_override = text
            }
            (SettingKey::OpenDailyNoteOnStartup, SettingValue::Flag(flag)) => {
                self.open_daily_note_on_startup = flag
            }
            (key, value) => {
                let expected = match key {
                    SettingKey::OpenDailyNoteOnStartup => "true or false",
                    _ => "text",
                };
                return Err(ChainError::Config(format!(
                    "Setting '{}' expects {}, got '{}'",
                    key, expected, value
                )));
            }
        }

        Ok(true)
    }
}

/// Names of the individual settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    JournalFolder,
    NewFileLocation,
    DateFormat,
    DefaultTemplate,
    TemplateFileLocation,
    DailyNotesFolderOverride,
    OpenDailyNoteOnStartup,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::JournalFolder,
        SettingKey::NewFileLocation,
        SettingKey::DateFormat,
        SettingKey::DefaultTemplate,
        SettingKey::TemplateFileLocation,
        SettingKey::DailyNotesFolderOverride,
        SettingKey::OpenDailyNoteOnStartup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::JournalFolder => "journalFolder",
            SettingKey::NewFileLocation => "newFileLocation",
            SettingKey::DateFormat => "dateFormat",
            SettingKey::DefaultTemplate => "defaultTemplate",
            SettingKey::TemplateFileLocation => "templateFileLocation",
            SettingKey::DailyNotesFolderOverride => "dailyNotesFolderOverride",
            SettingKey::OpenDailyNoteOnStartup => "openDailyNoteOnStartup",
        }
    }

    /// Changes to these keys must be mirrored into the host's daily-note options
    pub fn syncs_host(&self) -> bool {
        matches!(
            self,
            SettingKey::DateFormat | SettingKey::NewFileLocation | SettingKey::TemplateFileLocation
        )
    }

    /// Parse raw user input into a value of the right type for this key
    pub fn parse_value(&self, raw: &str) -> Result<SettingValue> {
        match self {
            SettingKey::OpenDailyNoteOnStartup => match raw.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(SettingValue::Flag(true)),
                "false" | "no" | "off" | "0" => Ok(SettingValue::Flag(false)),
                _ => Err(ChainError::Config(format!(
                    "Setting '{}' expects true or false, got '{}'",
                    self, raw
                ))),
            },
            _ => Ok(SettingValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept camelCase, snake_case and kebab-case spellings
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str().to_lowercase() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = SettingKey::ALL.iter().map(|k| k.as_str()).collect();
                ChainError::Config(format!(
                    "Unknown setting: '{}'. Valid keys are: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// Value of a single setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(text) => f.write_str(text),
            SettingValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}
