//! Placeholder substitution for location patterns and templates
//!
//! Supported syntax:
//! - `{{date:FORMAT}}` formats the context date with [`format_date`]
//! - `{{date}}` renders the ISO date (`YYYY-MM-DD`)
//! - `{{name}}` substitutes a named context value (e.g., `journalFolder`)
//! - `{date}` and `{month}` are legacy tokens kept for older templates
//!
//! Unknown placeholders are left untouched.

use crate::domain::date_format::{format_date, month_name};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Format used by `{date}` when no other format is configured
pub const LEGACY_DATE_FORMAT: &str = "YYYY-MM-DD";

const ISO_DATE_FORMAT: &str = "YYYY-MM-DD";

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?::([^{}]*))?\}\}|\{(date|month)\}").unwrap()
    })
}

/// Values available to placeholders during one render
#[derive(Debug, Clone)]
pub struct RenderContext {
    date: NaiveDate,
    legacy_date_format: String,
    values: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new(date: NaiveDate) -> Self {
        RenderContext {
            date,
            legacy_date_format: LEGACY_DATE_FORMAT.to_string(),
            values: BTreeMap::new(),
        }
    }

    /// Format applied to the legacy `{date}` token
    pub fn with_legacy_date_format(mut self, format: impl Into<String>) -> Self {
        self.legacy_date_format = format.into();
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

/// Replace every recognized placeholder in `pattern`.
///
/// Substitution happens in a single pass, so values inserted into the
/// output are never scanned for placeholders again.
pub fn render(pattern: &str, context: &RenderContext) -> String {
    placeholder_regex()
        .replace_all(pattern, |caps: &Captures| {
            if let Some(legacy) = caps.get(3) {
                return match legacy.as_str() {
                    "date" => format_date(context.date, &context.legacy_date_format),
                    _ => month_name(context.date).to_string(),
                };
            }

            let name = &caps[1];
            match (name, caps.get(2)) {
                ("date", Some(format)) => format_date(context.date, format.as_str().trim()),
                ("date", None) => format_date(context.date, ISO_DATE_FORMAT),
                (_, None) => match context.values.get(name) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                },
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RenderContext {
        RenderContext::new(NaiveDate::from_ymd_opt(2023, 5, 15).unwrap())
            .with_value("journalFolder", "Journal")
            .with_legacy_date_format("YYYY-MM-DD dddd")
    }

    #[test]
    fn test_render_location_pattern() {
        let rendered = render(
            "/{{journalFolder}}/{{date:YYYY}}/{{date:MM-MMMM}}/",
            &context(),
        );
        assert_eq!(rendered, "/Journal/2023/05-May/");
    }

    #[test]
    fn test_render_replaces_all_occurrences() {
        let rendered = render("{{date:YYYY}} {{date:YYYY}} {date} {date}", &context());
        assert_eq!(rendered, "2023 2023 2023-05-15 Monday 2023-05-15 Monday");
    }

    #[test]
    fn test_render_legacy_tokens() {
        let rendered = render("# {date}\n{month} List", &context());
        assert_eq!(rendered, "# 2023-05-15 Monday\nMay List");
    }

    #[test]
    fn test_legacy_date_defaults_to_iso() {
        let ctx = RenderContext::new(NaiveDate::from_ymd_opt(2023, 5, 15).unwrap());
        assert_eq!(render("{date}", &ctx), "2023-05-15");
    }

    #[test]
    fn test_plain_date_placeholder_is_iso() {
        assert_eq!(render("{{date}}", &context()), "2023-05-15");
        assert_eq!(render("{{ date }}", &context()), "2023-05-15");
    }

    #[test]
    fn test_spaces_around_format_are_ignored() {
        assert_eq!(render("{{ date : YYYY }}", &context()), "2023");
        assert_eq!(render("[{{date: MM-MMMM}}]", &context()), "[05-May]");
    }

    #[test]
    fn test_render_preserves_unknown_placeholders() {
        let rendered = render(
            "{{title}} {{date:YYYY}} {{journalFolder:upper}} {unknown} {{month}}",
            &context(),
        );
        assert_eq!(
            rendered,
            "{{title}} 2023 {{journalFolder:upper}} {unknown} {{month}}"
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let ctx = RenderContext::new(NaiveDate::from_ymd_opt(2023, 5, 15).unwrap())
            .with_value("journalFolder", "{date}");
        assert_eq!(render("{{journalFolder}}", &ctx), "{date}");
    }

    #[test]
    fn test_no_recognized_tokens_remain() {
        let rendered = render(
            "{{journalFolder}} {{date}} {{date:dddd}} {date} {month} {{other}}",
            &context(),
        );
        assert!(!rendered.contains("{{journalFolder}}"));
        assert!(!rendered.contains("{{date"));
        assert!(!rendered.contains("{date}"));
        assert!(!rendered.contains("{month}"));
        assert!(rendered.contains("{{other}}"));
    }
}
