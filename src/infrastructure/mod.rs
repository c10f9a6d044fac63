//! Infrastructure layer - Storage, persistence and host collaborators

pub mod config;
pub mod editor;
pub mod host;
pub mod memory;
pub mod vault;

pub use config::{SettingsPersistence, TomlSettingsFile};
pub use editor::{editor_from_env, EditorSession};
pub use host::{DailyNotesOptions, HostIntegration, ObsidianDailyNotes};
pub use memory::{MemoryPersistence, MemoryVault, RecordingHost};
pub use vault::{FileSystemVault, Vault, MARKER_DIR};
