//! Template system for entry content

use crate::domain::paths::settings_context;
use crate::domain::placeholder::render;
use crate::domain::settings::{Settings, DEFAULT_TEMPLATE};
use chrono::NaiveDate;

/// Where the content of a template came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Read from a template file in the vault
    File(String),
    /// The `defaultTemplate` setting
    Settings,
    /// The built-in template constant
    Builtin,
}

/// Template for entry generation
#[derive(Debug, Clone)]
pub struct Template {
    content: String,
    source: TemplateSource,
}

impl Template {
    /// Template read from a vault file
    pub fn from_file(path: impl Into<String>, content: String) -> Self {
        Template {
            content,
            source: TemplateSource::File(path.into()),
        }
    }

    /// Template from the `defaultTemplate` setting, or the built-in one when
    /// that setting is blank
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.default_template.trim().is_empty() {
            Template::builtin()
        } else {
            Template {
                content: settings.default_template.clone(),
                source: TemplateSource::Settings,
            }
        }
    }

    pub fn builtin() -> Self {
        Template {
            content: DEFAULT_TEMPLATE.to_string(),
            source: TemplateSource::Builtin,
        }
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render template with placeholder substitution for `date`
    pub fn render(&self, date: NaiveDate, settings: &Settings) -> String {
        render(&self.content, &settings_context(date, settings))
    }
}
