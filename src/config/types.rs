use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::catalog::{
    DuplicatePolicy,
    LoadOptions,
};
use crate::input::is_valid_locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "languages.zh_HK")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Directory holding the `.ts` files, relative to the workspace root.
    pub translations_dir: String,
    /// Glob for resource files, relative to `translations_dir`.
    pub file_pattern: String,

    /// Locale the source strings are written in.
    pub base_locale: String,
    /// Locale activated at startup. The base locale when set to `null`.
    pub default_locale: Option<String>,

    /// Locale code to display name, as shown in a language picker.
    pub languages: BTreeMap<String, String>,

    pub duplicate_policy: DuplicatePolicy,
    pub include_unfinished: bool,
}

impl CatalogSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid locale code
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translations_dir.trim().is_empty() {
            errors.push(ValidationError::new(
                "translationsDir",
                "The directory cannot be empty. Example: \"i18n\"",
            ));
        }

        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "filePattern",
                "The pattern cannot be empty. Example: \"*.ts\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.file_pattern) {
            errors.push(ValidationError::new(
                "filePattern",
                format!("Invalid glob pattern '{}': {e}", self.file_pattern),
            ));
        }

        if !is_valid_locale(&self.base_locale) {
            errors.push(invalid_locale("baseLocale", &self.base_locale));
        }

        if let Some(locale) = &self.default_locale
            && !is_valid_locale(locale)
        {
            errors.push(invalid_locale("defaultLocale", locale));
        }

        for (locale, display_name) in &self.languages {
            let path = format!("languages.{locale}");
            if !is_valid_locale(locale) {
                errors.push(invalid_locale(&path, locale));
            }
            if display_name.trim().is_empty() {
                errors.push(ValidationError::new(
                    path,
                    "The display name cannot be empty. Example: \"繁體中文\"",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Options passed to every catalog load.
    #[must_use]
    pub const fn load_options(&self) -> LoadOptions {
        LoadOptions {
            duplicate_policy: self.duplicate_policy,
            include_unfinished: self.include_unfinished,
        }
    }
}

/// Validation error for a malformed locale code.
fn invalid_locale(field_path: &str, value: &str) -> ValidationError {
    ValidationError::new(
        field_path,
        format!("Invalid locale code '{value}'. Example: \"zh_HK\" or \"en\""),
    )
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            translations_dir: "i18n".to_string(),
            file_pattern: "*.ts".to_string(),
            base_locale: "en".to_string(),
            default_locale: Some("zh_HK".to_string()),
            languages: BTreeMap::from([
                ("en".to_string(), "English".to_string()),
                ("zh_HK".to_string(), "繁體中文".to_string()),
            ]),
            duplicate_policy: DuplicatePolicy::default(),
            include_unfinished: false,
        }
    }
}
