//! Active-locale handle
//!
//! [`Translator`] owns the catalog the UI currently reads from. Switching
//! locale loads a complete new catalog first and then swaps it in with a
//! single pointer write, so readers see either the old table or the new
//! one and never a mix.
//!
//! Callers keep a `Translator` (or an `Arc<Translator>`) instead of relying
//! on a process-wide installed translator.

use std::collections::BTreeMap;
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use crate::catalog::{
    Catalog,
    LoadOptions,
};
use crate::config::ConfigManager;
use crate::error::LoadError;
use crate::format::FormatArgs;
use crate::input::normalize_locale;
use crate::registry::LocaleRegistry;

#[derive(Debug)]
pub struct Translator {
    /// Where locale resources are looked up
    registry: LocaleRegistry,
    /// Locale of the source strings; served by an identity catalog
    base_locale: String,
    /// Options for every catalog load
    options: LoadOptions,
    /// Locale code → display name
    languages: BTreeMap<String, String>,
    /// Active catalog. The lock is held only to clone or replace the `Arc`.
    current: RwLock<Arc<Catalog>>,
}

impl Translator {
    /// A translator serving the base locale.
    #[must_use]
    pub fn new(registry: LocaleRegistry, base_locale: impl Into<String>, options: LoadOptions) -> Self {
        let base_locale = base_locale.into();
        let current = RwLock::new(Arc::new(Catalog::empty(base_locale.clone())));
        Self { registry, base_locale, options, languages: BTreeMap::new(), current }
    }

    /// Set the locale → display name table used by [`Translator::switch_language`].
    #[must_use]
    pub fn with_languages(mut self, languages: BTreeMap<String, String>) -> Self {
        self.languages = languages;
        self
    }

    /// Build a translator from loaded settings and activate the default
    /// locale, falling back to the base locale if it cannot be loaded.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidPattern`] if the configured file pattern
    /// is not a valid glob.
    pub fn from_config(config: &ConfigManager) -> Result<Self, LoadError> {
        let settings = config.get_settings();
        let registry = config.discover_locales()?;
        let translator = Self::new(registry, settings.base_locale.clone(), settings.load_options())
            .with_languages(settings.languages.clone());

        translator.switch_locale_or_base(config.startup_locale());
        Ok(translator)
    }

    /// Snapshot of the active catalog.
    ///
    /// The snapshot stays valid and unchanged after later switches.
    #[must_use]
    pub fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Locale of the active catalog.
    #[must_use]
    pub fn current_locale(&self) -> String {
        self.current().locale().unwrap_or(&self.base_locale).to_string()
    }

    #[must_use]
    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    #[must_use]
    pub const fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Display names, sorted by locale code.
    #[must_use]
    pub const fn languages(&self) -> &BTreeMap<String, String> {
        &self.languages
    }

    /// Load `locale` and make it active.
    ///
    /// Switching to the base locale installs an identity catalog.
    ///
    /// # Errors
    /// Returns the [`LoadError`] of the failed load; the previous catalog
    /// stays active.
    pub fn switch_locale(&self, locale: &str) -> Result<(), LoadError> {
        let catalog = if self.is_base_locale(locale) {
            Catalog::empty(self.base_locale.clone())
        } else {
            match self.registry.load(locale, self.options) {
                Ok(catalog) => catalog,
                Err(e) => {
                    tracing::warn!(locale, "Failed to switch locale: {e}");
                    return Err(e);
                }
            }
        };

        self.install(catalog);
        tracing::info!(locale, "Switched locale");
        Ok(())
    }

    /// Like [`Translator::switch_locale`], but activates the base locale when
    /// `locale` cannot be loaded.
    ///
    /// Returns true if `locale` itself was activated.
    pub fn switch_locale_or_base(&self, locale: &str) -> bool {
        if self.switch_locale(locale).is_ok() {
            return true;
        }
        tracing::warn!(locale, base = %self.base_locale, "Falling back to base locale");
        self.install(Catalog::empty(self.base_locale.clone()));
        false
    }

    /// Switch by display name (e.g. `繁體中文`).
    ///
    /// Unknown names select the base locale. Returns false if the named
    /// locale failed to load, in which case the previous catalog stays
    /// active.
    pub fn switch_language(&self, display_name: &str) -> bool {
        let locale = self
            .languages
            .iter()
            .find(|(_, name)| name.as_str() == display_name)
            .map_or_else(|| self.base_locale.clone(), |(locale, _)| locale.clone());

        self.switch_locale(&locale).is_ok()
    }

    /// Translate through the active catalog.
    #[must_use]
    pub fn tr(&self, context: &str, source_text: &str) -> String {
        self.current().lookup(context, source_text).to_string()
    }

    /// Translate and substitute placeholders. A missing argument yields the
    /// unsubstituted translation.
    #[must_use]
    pub fn tr_format(&self, context: &str, source_text: &str, args: &FormatArgs) -> String {
        self.current().format_lossy(context, source_text, args)
    }

    /// Translate a numerus message for `count`.
    #[must_use]
    pub fn tr_plural(&self, context: &str, source_text: &str, count: i64) -> String {
        self.current().lookup_plural(context, source_text, count)
    }

    /// Whether `locale` names the base locale.
    fn is_base_locale(&self, locale: &str) -> bool {
        normalize_locale(locale) == normalize_locale(&self.base_locale)
    }

    /// Swap in a new active catalog.
    fn install(&self, catalog: Catalog) {
        let catalog = Arc::new(catalog);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = catalog;
    }
}
