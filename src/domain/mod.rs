//! Domain layer - Pure models and algorithms

pub mod date_format;
pub mod entry;
pub mod paths;
pub mod placeholder;
pub mod settings;
pub mod template;
pub mod time_ref;

pub use entry::{EntryKind, FileHandle};
pub use paths::{resolve, ResolvedPaths};
pub use settings::{SettingKey, SettingValue, Settings};
pub use template::{Template, TemplateSource};
pub use time_ref::TimeReference;
