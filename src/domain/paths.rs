//! Folder and file path resolution for dated entries

use crate::domain::date_format::format_date;
use crate::domain::placeholder::{render, RenderContext};
use crate::domain::settings::{
    Settings, DEFAULT_DATE_FORMAT, DEFAULT_JOURNAL_FOLDER, DEFAULT_NEW_FILE_LOCATION,
};
use chrono::NaiveDate;

/// Extension given to every entry file
pub const NOTE_EXTENSION: &str = ".md";

/// Folder and file path computed for one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Always ends with a single `/`
    pub folder_path: String,
    /// `folder_path` followed by the entry file name
    pub file_path: String,
}

/// Placeholder context shared by location patterns and templates
pub fn settings_context(date: NaiveDate, settings: &Settings) -> RenderContext {
    RenderContext::new(date)
        .with_value("journalFolder", journal_folder(settings))
        .with_legacy_date_format(date_format(settings))
}

/// Resolve the folder and file path of the entry for `date`.
///
/// Pure function of its inputs: the same date and settings always yield
/// byte-identical paths.
pub fn resolve(date: NaiveDate, settings: &Settings) -> ResolvedPaths {
    let context = settings_context(date, settings);
    let folder_path = normalize_folder(&render(folder_pattern(settings), &context));
    let file_path = format!("{}{}", folder_path, file_name(date, settings));

    ResolvedPaths {
        folder_path,
        file_path,
    }
}

/// Entry file name for `date`, e.g. "2023-05-15 Monday.md"
pub fn file_name(date: NaiveDate, settings: &Settings) -> String {
    let mut stem = file_stem(date, date_format(settings));
    if stem.is_empty() {
        stem = file_stem(date, DEFAULT_DATE_FORMAT);
    }
    format!("{}{}", stem, NOTE_EXTENSION)
}

fn file_stem(date: NaiveDate, format: &str) -> String {
    let stem: String = format_date(date, format)
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    stem.trim().to_string()
}

/// Location pattern in effect: the override, then the configured
/// location, then the built-in default
pub fn folder_pattern(settings: &Settings) -> &str {
    [
        settings.daily_notes_folder_override.as_str(),
        settings.new_file_location.as_str(),
    ]
    .into_iter()
    .find(|pattern| !pattern.trim().is_empty())
    .unwrap_or(DEFAULT_NEW_FILE_LOCATION)
}

fn journal_folder(settings: &Settings) -> &str {
    let folder = settings.journal_folder.trim();
    if folder.is_empty() {
        DEFAULT_JOURNAL_FOLDER
    } else {
        folder
    }
}

fn date_format(settings: &Settings) -> &str {
    if settings.date_format.trim().is_empty() {
        DEFAULT_DATE_FORMAT
    } else {
        settings.date_format.as_str()
    }
}

/// Use `/` separators, collapse repeated separators and end with exactly one
fn normalize_folder(raw: &str) -> String {
    let unified = raw.trim().replace('\\', "/");
    let leading = unified.starts_with('/');
    let segments: Vec<&str> = unified
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    let joined = segments.join("/");
    if leading {
        format!("/{}/", joined)
    } else {
        format!("{}/", joined)
    }
}

/// Successive prefixes of a folder path, one per segment.
///
/// `"/Journal/2023/"` yields `["/Journal", "/Journal/2023"]`.
pub fn folder_segments(folder_path: &str) -> Vec<String> {
    let prefix = if folder_path.starts_with('/') { "/" } else { "" };
    let mut current = String::new();
    let mut segments = Vec::new();

    for segment in folder_path.split('/').filter(|s| !s.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        segments.push(format!("{}{}", prefix, current));
    }

    segments
}

/// Parent folder of a vault path, if it has one
pub fn parent_folder(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => None,
        Some(index) => Some(&trimmed[..index]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            journal_folder: "Journal".to_string(),
            new_file_location: "/{{journalFolder}}/{{date:YYYY}}/{{date:MM-MMMM}}/".to_string(),
            date_format: "YYYY-MM-DD dddd".to_string(),
            ..Settings::default()
        }
    }

    fn may_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 15).unwrap()
    }

    #[test]
    fn test_resolve_example_paths() {
        let paths = resolve(may_15(), &settings());
        assert_eq!(paths.folder_path, "/Journal/2023/05-May/");
        assert_eq!(paths.file_path, "/Journal/2023/05-May/2023-05-15 Monday.md");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let settings = settings();
        assert_eq!(resolve(may_15(), &settings), resolve(may_15(), &settings));
    }

    #[test]
    fn test_empty_location_uses_default_pattern() {
        let settings = Settings {
            new_file_location: "   ".to_string(),
            ..settings()
        };
        assert_eq!(resolve(may_15(), &settings).folder_path, "/Journal/2023/05-May/");
    }

    #[test]
    fn test_override_takes_precedence() {
        let settings = Settings {
            daily_notes_folder_override: "Daily/{{date:YYYY}}".to_string(),
            ..settings()
        };
        let paths = resolve(may_15(), &settings);
        assert_eq!(paths.folder_path, "Daily/2023/");
        assert_eq!(paths.file_path, "Daily/2023/2023-05-15 Monday.md");
    }

    #[test]
    fn test_empty_journal_folder_falls_back() {
        let settings = Settings {
            journal_folder: String::new(),
            ..settings()
        };
        assert_eq!(resolve(may_15(), &settings).folder_path, "/Journal/2023/05-May/");
    }

    #[test]
    fn test_folder_is_normalized() {
        assert_eq!(normalize_folder("/Journal//2023"), "/Journal/2023/");
        assert_eq!(normalize_folder("Journal\\2023\\"), "Journal/2023/");
        assert_eq!(normalize_folder("Journal/2023///"), "Journal/2023/");
        assert_eq!(normalize_folder(""), "/");
        assert_eq!(normalize_folder("///"), "/");
    }

    #[test]
    fn test_file_name_never_adds_folders() {
        let settings = Settings {
            date_format: "YYYY/MM/DD".to_string(),
            ..settings()
        };
        assert_eq!(file_name(may_15(), &settings), "2023-05-15.md");
    }

    #[test]
    fn test_empty_date_format_uses_default() {
        let settings = Settings {
            date_format: String::new(),
            ..settings()
        };
        assert_eq!(file_name(may_15(), &settings), "2023-05-15 Monday.md");
    }

    #[test]
    fn test_blank_rendered_stem_uses_default() {
        for format in ["[]", "[  ]"] {
            let settings = Settings {
                date_format: format.to_string(),
                ..settings()
            };
            assert_eq!(file_name(may_15(), &settings), "2023-05-15 Monday.md");
        }
    }

    #[test]
    fn test_folder_segments() {
        assert_eq!(
            folder_segments("/Journal/2023/05-May/"),
            vec!["/Journal", "/Journal/2023", "/Journal/2023/05-May"]
        );
        assert_eq!(folder_segments("Daily/2023/"), vec!["Daily", "Daily/2023"]);
        assert!(folder_segments("/").is_empty());
    }

    #[test]
    fn test_parent_folder() {
        assert_eq!(
            parent_folder("/Templates/Daily Note Template.md"),
            Some("/Templates")
        );
        assert_eq!(parent_folder("a/b/c.md"), Some("a/b"));
        assert_eq!(parent_folder("/root.md"), None);
        assert_eq!(parent_folder("root.md"), None);
    }
}
