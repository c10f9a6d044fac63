//! Output formatting utilities

use crate::domain::{ResolvedPaths, SettingKey, Settings};

/// Format resolved entry paths for display
pub fn format_resolved_paths(paths: &ResolvedPaths) -> String {
    format!("folder = {}\nfile = {}\n", paths.folder_path, paths.file_path)
}

/// Format every setting as `key = value`, one per line.
///
/// Multi-line values are shown with escaped newlines so each setting stays
/// on one line.
pub fn format_settings(settings: &Settings) -> String {
    let mut output = String::new();
    for key in SettingKey::ALL {
        let value = settings.get(key).to_string().replace('\n', "\\n");
        output.push_str(&format!("{} = {}\n", key, value));
    }
    output
}
