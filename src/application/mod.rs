//! Application layer - Use cases and orchestration

pub mod init;
pub mod journal;
pub mod materialize;
pub mod settings_store;

pub use journal::JournalService;
pub use materialize::{ensure_folder_structure, EntryMaterializer};
pub use settings_store::SettingsStore;
