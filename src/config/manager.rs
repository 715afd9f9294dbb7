//! Settings management

use std::path::{
    Path,
    PathBuf,
};

use super::{
    CatalogSettings,
    ConfigError,
    loader,
};
use crate::error::LoadError;
use crate::registry::LocaleRegistry;

/// Holds the validated settings of one workspace.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    current_settings: CatalogSettings,

    /// Workspace root the settings were loaded from
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: CatalogSettings::default(), workspace_root: None }
    }

    /// Load and validate the settings of `workspace_root`.
    ///
    /// A missing settings file (or no workspace) means defaults. On error the
    /// previous settings and workspace root are kept.
    ///
    /// # Errors
    /// - The settings file cannot be read or parsed
    /// - Validation fails (every invalid field is reported)
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?.unwrap_or_else(|| {
                tracing::debug!(root = %root.display(), "No settings file, using defaults");
                CatalogSettings::default()
            }),
            None => CatalogSettings::default(),
        };

        self.update_settings(settings)?;
        self.workspace_root = workspace_root;
        Ok(())
    }

    /// Replace the settings after validating them.
    ///
    /// # Errors
    /// Returns [`ConfigError::ValidationErrors`] listing every invalid field;
    /// the current settings are kept.
    pub fn update_settings(&mut self, new_settings: CatalogSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(
            translations_dir = %new_settings.translations_dir,
            base_locale = %new_settings.base_locale,
            startup_locale = ?new_settings.default_locale,
            "Settings applied"
        );
        self.current_settings = new_settings;
        Ok(())
    }

    #[must_use]
    pub const fn get_settings(&self) -> &CatalogSettings {
        &self.current_settings
    }

    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// Absolute or workspace-relative translations directory.
    #[must_use]
    pub fn translations_dir(&self) -> PathBuf {
        let dir = Path::new(&self.current_settings.translations_dir);
        match &self.workspace_root {
            Some(root) if dir.is_relative() => root.join(dir),
            _ => dir.to_path_buf(),
        }
    }

    /// Locale to activate at startup: `defaultLocale`, or the base locale
    /// when it is unset.
    #[must_use]
    pub fn startup_locale(&self) -> &str {
        self.current_settings
            .default_locale
            .as_deref()
            .unwrap_or(&self.current_settings.base_locale)
    }

    /// Discover the translation files of the configured directory.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidPattern`] if the file pattern does not
    /// compile.
    pub fn discover_locales(&self) -> Result<LocaleRegistry, LoadError> {
        LocaleRegistry::discover(&self.translations_dir(), &self.current_settings.file_pattern)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::DuplicatePolicy;

    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().base_locale, "en");
        assert!(manager.workspace_root().is_none());
        assert_eq!(manager.translations_dir(), PathBuf::from("i18n"));
    }

    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings(), &CatalogSettings::default());
    }

    #[allow(clippy::unwrap_used)]
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(loader::SETTINGS_FILE_NAME),
            r#"{"translationsDir": "locale", "duplicatePolicy": "firstWins"}"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().duplicate_policy, DuplicatePolicy::FirstWins);
        assert_eq!(manager.translations_dir(), temp_dir.path().join("locale"));
    }

    #[allow(clippy::unwrap_used)]
    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.translations_dir(), temp_dir.path().join("i18n"));
    }

    #[allow(clippy::unwrap_used)]
    #[rstest]
    fn test_load_settings_invalid_keeps_previous() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(loader::SETTINGS_FILE_NAME), r#"{"baseLocale": ""}"#)
            .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(ref errors)) if errors.len() == 1));
        assert!(manager.workspace_root().is_none());
    }

    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let new_settings =
            CatalogSettings { default_locale: Some("zh_HK".to_string()), ..CatalogSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale.as_deref(), Some("zh_HK"));
    }

    #[allow(clippy::unwrap_used)]
    #[rstest]
    #[case::configured(Some("ja"), "ja")]
    #[case::unset(None, "en")]
    fn test_startup_locale(#[case] default_locale: Option<&str>, #[case] expected: &str) {
        let mut manager = ConfigManager::new();
        manager
            .update_settings(CatalogSettings {
                default_locale: default_locale.map(str::to_string),
                ..CatalogSettings::default()
            })
            .unwrap();

        assert_eq!(manager.startup_locale(), expected);
    }

    #[rstest]
    fn test_startup_locale_defaults_to_traditional_chinese() {
        assert_eq!(ConfigManager::new().startup_locale(), "zh_HK");
    }

    #[allow(clippy::unwrap_used)]
    #[rstest]
    fn test_discover_locales_in_workspace() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("locale")).unwrap();
        fs::write(temp_dir.path().join("locale").join("zh_HK.ts"), "<TS></TS>").unwrap();
        fs::write(
            temp_dir.path().join(loader::SETTINGS_FILE_NAME),
            r#"{"translationsDir": "locale"}"#,
        )
        .unwrap();
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        let registry = manager.discover_locales().unwrap();

        assert_eq!(registry.locales(), vec!["zh_HK"]);
    }

    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let new_settings =
            CatalogSettings { file_pattern: String::new(), ..CatalogSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }
}
