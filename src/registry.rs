//! Locale registry
//!
//! Maps locale codes to the translation files found in a translations
//! directory, so a locale can be loaded by name.

use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use crate::catalog::{
    Catalog,
    LoadOptions,
};
use crate::error::LoadError;
use crate::input::{
    detect_locale_from_path,
    normalize_locale,
};

/// A translation file and the locale detected from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleResource {
    /// Locale as written in the file name (e.g. `zh_HK`)
    pub locale: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    /// Directory the resources were discovered in
    dir: PathBuf,
    /// Normalized locale → resource
    resources: BTreeMap<String, LocaleResource>,
}

impl LocaleRegistry {
    /// Discover translation files directly inside `dir`.
    ///
    /// `file_pattern` is matched against each file's path relative to
    /// `dir`. Files whose locale cannot be detected are ignored. A missing
    /// directory yields an empty registry.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidPattern`] if `file_pattern` is not a
    /// valid glob.
    pub fn discover(dir: &Path, file_pattern: &str) -> Result<Self, LoadError> {
        tracing::debug!(dir = %dir.display(), file_pattern, "Discovering translation files");

        let matcher = build_matcher(file_pattern)?;
        let mut paths = find_translation_files(dir, &matcher);
        paths.sort();

        let mut registry = Self { dir: dir.to_path_buf(), resources: BTreeMap::new() };
        for path in paths {
            let Some(locale) = detect_locale_from_path(&path) else {
                tracing::debug!("Cannot detect locale of {:?}, ignoring", path);
                continue;
            };
            registry.insert(LocaleResource { locale, path });
        }

        tracing::debug!(locales = ?registry.locales(), "Translation files discovered");
        Ok(registry)
    }

    /// Register a resource. A later resource for the same locale replaces
    /// the earlier one.
    pub fn insert(&mut self, resource: LocaleResource) {
        let key = normalize_locale(&resource.locale);
        if let Some(previous) = self.resources.get(&key) {
            tracing::warn!(
                locale = %resource.locale,
                "Multiple translation files for one locale: {:?} replaces {:?}",
                resource.path,
                previous.path
            );
        }
        self.resources.insert(key, resource);
    }

    /// Registered locale codes, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.resources.values().map(|r| r.locale.as_str()).collect()
    }

    /// Registered resources, sorted by locale.
    pub fn resources(&self) -> impl Iterator<Item = &LocaleResource> {
        self.resources.values()
    }

    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.resources.contains_key(&normalize_locale(locale))
    }

    #[must_use]
    pub fn path_for(&self, locale: &str) -> Option<&Path> {
        self.resources.get(&normalize_locale(locale)).map(|r| r.path.as_path())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Load the catalog registered for `locale`.
    ///
    /// # Errors
    /// - [`LoadError::NotFound`] if no file is registered for `locale`
    /// - any error from [`Catalog::load_file`]
    pub fn load(&self, locale: &str, options: LoadOptions) -> Result<Catalog, LoadError> {
        let resource = self
            .resources
            .get(&normalize_locale(locale))
            .ok_or_else(|| LoadError::NotFound { locale: locale.to_string() })?;
        Catalog::load_file(&resource.path, options)
    }
}

/// Compile the file pattern.
fn build_matcher(file_pattern: &str) -> Result<GlobSet, LoadError> {
    let invalid = |message: String| LoadError::InvalidPattern {
        pattern: file_pattern.to_string(),
        message,
    };

    let glob = Glob::new(file_pattern).map_err(|e| invalid(e.to_string()))?;
    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    builder.build().map_err(|e| invalid(e.to_string()))
}

/// Files directly inside `dir` whose relative path matches `matcher`.
fn find_translation_files(dir: &Path, matcher: &GlobSet) -> Vec<PathBuf> {
    let mut found_files = Vec::new();

    for result in WalkBuilder::new(dir)
        .max_depth(Some(1))
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(dir) else {
            continue;
        };
        if matcher.is_match(relative_path) {
            found_files.push(path.to_path_buf());
        }
    }

    found_files
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    const ZH_HK_TS: &str = r#"<TS version="2.1" language="zh_HK">
<context><name>SettingsTab</name>
<message><source>Apply</source><translation>套用</translation></message>
</context></TS>"#;

    #[fixture]
    fn translations_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("zh_HK.ts"), ZH_HK_TS).unwrap();
        fs::write(temp_dir.path().join("app_ja.ts"), "<TS language=\"ja\"></TS>").unwrap();
        fs::write(temp_dir.path().join("zh_HK.qm"), b"\x3c\xb8\x64\x18").unwrap();
        fs::write(temp_dir.path().join("strings.ts"), "<TS></TS>").unwrap();
        fs::create_dir(temp_dir.path().join("old")).unwrap();
        fs::write(temp_dir.path().join("old").join("fr.ts"), "<TS></TS>").unwrap();
        temp_dir
    }

    #[rstest]
    fn test_discover(translations_dir: TempDir) {
        let registry = LocaleRegistry::discover(translations_dir.path(), "*.ts").unwrap();

        assert_that!(registry.locales(), elements_are![eq(&"ja"), eq(&"zh_HK")]);
        assert_that!(registry.len(), eq(2));
        assert_that!(
            registry.path_for("zh_HK"),
            some(eq(translations_dir.path().join("zh_HK.ts").as_path()))
        );
    }

    #[rstest]
    #[case("zh_HK", true)]
    #[case("zh-hk", true)]
    #[case("ZH_HK", true)]
    #[case("fr", false)]
    #[case("en", false)]
    fn test_contains_normalizes(translations_dir: TempDir, #[case] locale: &str, #[case] expected: bool) {
        let registry = LocaleRegistry::discover(translations_dir.path(), "*.ts").unwrap();

        assert_that!(registry.contains(locale), eq(expected));
    }

    #[rstest]
    fn test_load(translations_dir: TempDir) {
        let registry = LocaleRegistry::discover(translations_dir.path(), "*.ts").unwrap();

        let catalog = registry.load("zh-HK", LoadOptions::default()).unwrap();

        assert_that!(catalog.lookup("SettingsTab", "Apply"), eq("套用"));
    }

    #[rstest]
    fn test_load_unknown_locale(translations_dir: TempDir) {
        let registry = LocaleRegistry::discover(translations_dir.path(), "*.ts").unwrap();

        let result = registry.load("de", LoadOptions::default());

        assert!(matches!(result, Err(LoadError::NotFound { ref locale }) if locale == "de"));
    }

    #[rstest]
    fn test_later_file_wins_for_same_locale() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("app_zh_HK.ts"), "<TS></TS>").unwrap();
        fs::write(temp_dir.path().join("zh_HK.ts"), "<TS></TS>").unwrap();

        let registry = LocaleRegistry::discover(temp_dir.path(), "*.ts").unwrap();

        assert_that!(registry.len(), eq(1));
        assert_that!(
            registry.path_for("zh_HK"),
            some(eq(temp_dir.path().join("zh_HK.ts").as_path()))
        );
    }

    #[rstest]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let registry = LocaleRegistry::discover(&temp_dir.path().join("i18n"), "*.ts").unwrap();

        assert_that!(registry.is_empty(), eq(true));
    }

    #[rstest]
    fn test_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();

        let result = LocaleRegistry::discover(temp_dir.path(), "*.{ts");

        assert!(matches!(result, Err(LoadError::InvalidPattern { .. })));
    }
}
