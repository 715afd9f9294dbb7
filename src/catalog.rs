//! Translation catalog
//!
//! A [`Catalog`] holds every active translation of one locale, keyed by
//! `(context, source text)`. It is built once and never mutated afterwards,
//! so it can be shared between threads behind an `Arc`.
//!
//! Lookups never fail: a missing translation resolves to the source text.

mod entry;
mod report;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

pub use entry::TranslationEntry;
pub use report::{
    LoadReport,
    LoadWarning,
    SkipReason,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    FormatError,
    LoadError,
};
use crate::format::{
    FormatArgs,
    render,
};
use crate::input::{
    TranslationKind,
    TsDocument,
    TsMessage,
    detect_locale_from_path,
    parse_ts_document,
};
use crate::plural::{
    PluralRule,
    select_form,
    substitute_count,
};
use crate::types::Locus;

/// Which entry survives when a `(context, source)` pair appears twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePolicy {
    /// The entry that appears later in the document replaces the earlier one.
    #[default]
    LastWins,
    /// The first entry is kept; later ones are counted and dropped.
    FirstWins,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub duplicate_policy: DuplicatePolicy,
    /// Load `type="unfinished"` translations instead of dropping them.
    pub include_unfinished: bool,
}

/// Read-only translation table for a single locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Target locale
    locale: Option<String>,
    /// Locale the source strings are written in, if declared
    source_locale: Option<String>,
    /// context → source text → entry
    contexts: HashMap<String, HashMap<String, TranslationEntry>>,
    /// What happened while loading
    report: LoadReport,
}

impl Catalog {
    /// An empty catalog: every lookup returns the source text.
    ///
    /// Used for the locale the source strings are written in.
    #[must_use]
    pub fn empty(locale: impl Into<String>) -> Self {
        Self { locale: Some(locale.into()), ..Self::default() }
    }

    /// Parse TS document text into a catalog.
    ///
    /// # Errors
    /// Returns [`LoadError::Malformed`] if the document structure cannot be
    /// parsed. Malformed individual messages are skipped and recorded in
    /// [`Catalog::report`].
    pub fn parse(text: &str, options: LoadOptions) -> Result<Self, LoadError> {
        let document = parse_ts_document(text)?;
        Ok(Self::from_document(document, options))
    }

    /// Read and parse a TS file.
    ///
    /// If the document does not declare a language, it is guessed from the
    /// file name.
    ///
    /// # Errors
    /// - [`LoadError::Io`] if the file cannot be read
    /// - [`LoadError::Malformed`] if the document structure cannot be parsed
    pub fn load_file(path: &Path, options: LoadOptions) -> Result<Self, LoadError> {
        tracing::debug!("Loading translation file: {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let mut catalog = Self::parse(&content, options)?;

        if catalog.locale.is_none() {
            catalog.locale = detect_locale_from_path(path);
        }

        tracing::debug!(
            locale = ?catalog.locale,
            loaded = catalog.report.loaded,
            skipped = catalog.report.skipped.len(),
            "Translation file loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from a parsed document.
    ///
    /// Repeated context blocks accumulate. Duplicate `(context, source)`
    /// pairs are resolved with `options.duplicate_policy`.
    #[must_use]
    pub fn from_document(document: TsDocument, options: LoadOptions) -> Self {
        let mut catalog = Self {
            locale: document.language.filter(|l| !l.is_empty()),
            source_locale: document.source_language.filter(|l| !l.is_empty()),
            ..Self::default()
        };

        for message in document.orphan_messages {
            catalog.skip(None, &message, SkipReason::OutsideContext);
        }

        for context in document.contexts {
            let Some(name) = context.name else {
                for message in &context.messages {
                    catalog.skip(None, message, SkipReason::MissingContextName);
                }
                continue;
            };
            for message in &context.messages {
                catalog.ingest(&name, message, options);
            }
        }

        catalog.report.loaded = catalog.len();
        catalog
    }

    /// Build a catalog directly from entries, in load order.
    #[must_use]
    pub fn from_entries(
        locale: Option<String>,
        entries: impl IntoIterator<Item = TranslationEntry>,
        policy: DuplicatePolicy,
    ) -> Self {
        let mut catalog = Self { locale, ..Self::default() };
        for entry in entries {
            if entry.source_text.is_empty() || entry.translated_text.is_empty() {
                continue;
            }
            catalog.insert(entry, policy);
        }
        catalog.report.loaded = catalog.len();
        catalog
    }

    /// Convert one message into an entry, or record why it was dropped.
    fn ingest(&mut self, context: &str, message: &TsMessage, options: LoadOptions) {
        let Some(source) = message.source.as_deref() else {
            self.skip(Some(context), message, SkipReason::MissingSource);
            return;
        };
        if source.is_empty() {
            self.skip(Some(context), message, SkipReason::EmptySource);
            return;
        }
        let Some(translation) = message.translation.as_ref() else {
            self.skip(Some(context), message, SkipReason::MissingTranslation);
            return;
        };

        if translation.kind.is_retired() {
            self.report.retired += 1;
            return;
        }
        if translation.kind == TranslationKind::Unfinished && !options.include_unfinished {
            self.report.unfinished += 1;
            return;
        }

        let mut entry = TranslationEntry::new(context, source, translation.text.as_str());
        if message.numerus {
            if translation.numerus_forms.is_empty() {
                self.skip(Some(context), message, SkipReason::NoNumerusForms);
                return;
            }
            if translation.numerus_forms.iter().all(String::is_empty) {
                self.report.untranslated += 1;
                return;
            }
            entry = entry.with_plural_forms(translation.numerus_forms.clone());
        } else if translation.text.is_empty() {
            self.report.untranslated += 1;
            return;
        }

        entry.comment = message.comment.clone().filter(|c| !c.is_empty());
        entry.locus_hint = first_locus(message);
        self.insert(entry, options.duplicate_policy);
    }

    /// Insert an entry, resolving a duplicate key with `policy`.
    fn insert(&mut self, entry: TranslationEntry, policy: DuplicatePolicy) {
        let sources = self.contexts.entry(entry.context.clone()).or_default();
        match sources.entry(entry.source_text.clone()) {
            Entry::Occupied(mut occupied) => {
                self.report.duplicates += 1;
                tracing::debug!(
                    context = %entry.context,
                    source = %entry.source_text,
                    ?policy,
                    "Duplicate translation entry"
                );
                if policy == DuplicatePolicy::LastWins {
                    occupied.insert(entry);
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }
    }

    /// Record a skipped message.
    fn skip(&mut self, context: Option<&str>, message: &TsMessage, reason: SkipReason) {
        let warning = LoadWarning {
            context: context.map(str::to_string),
            source_text: message.source.clone(),
            reason,
            locus: first_locus(message),
        };
        tracing::warn!("Skipping translation entry: {warning}");
        self.report.skipped.push(warning);
    }

    /// The entry for `(context, source_text)`, if one was loaded.
    #[must_use]
    pub fn get(&self, context: &str, source_text: &str) -> Option<&TranslationEntry> {
        self.contexts.get(context).and_then(|sources| sources.get(source_text))
    }

    #[must_use]
    pub fn contains(&self, context: &str, source_text: &str) -> bool {
        self.get(context, source_text).is_some()
    }

    /// Translate `source_text`, falling back to it unchanged when no
    /// translation is loaded.
    #[must_use]
    pub fn lookup<'a>(&'a self, context: &str, source_text: &'a str) -> &'a str {
        self.get(context, source_text).map_or(source_text, |entry| entry.translated_text.as_str())
    }

    /// Translate a numerus message for `count` and replace `%n` with it.
    #[must_use]
    pub fn lookup_plural(&self, context: &str, source_text: &str, count: i64) -> String {
        let text: &str = match self.get(context, source_text) {
            Some(entry) if entry.is_numerus() => {
                select_form(&entry.plural_forms, self.plural_rule(), count).unwrap_or(source_text)
            }
            Some(entry) => entry.translated_text.as_str(),
            None => source_text,
        };
        substitute_count(text, count)
    }

    /// Translate `source_text` and substitute placeholders.
    ///
    /// # Errors
    /// Returns [`FormatError`] when the translated template references an
    /// argument that `args` does not provide.
    pub fn format(
        &self,
        context: &str,
        source_text: &str,
        args: &FormatArgs,
    ) -> Result<String, FormatError> {
        render(self.lookup(context, source_text), args)
    }

    /// Like [`Catalog::format`], but returns the unsubstituted template
    /// when an argument is missing.
    #[must_use]
    pub fn format_lossy(&self, context: &str, source_text: &str, args: &FormatArgs) -> String {
        let template = self.lookup(context, source_text);
        render(template, args).unwrap_or_else(|e| {
            tracing::warn!(context, "Failed to format translation: {e}");
            template.to_string()
        })
    }

    /// Target locale, from the document or its file name.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    #[must_use]
    pub fn source_locale(&self) -> Option<&str> {
        self.source_locale.as_deref()
    }

    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        self.locale.as_deref().map_or_else(PluralRule::default, PluralRule::for_locale)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.values().all(HashMap::is_empty)
    }

    /// Context names, sorted.
    #[must_use]
    pub fn contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All entries, sorted by context and then source text.
    #[must_use]
    pub fn entries(&self) -> Vec<&TranslationEntry> {
        let mut entries: Vec<&TranslationEntry> =
            self.contexts.values().flat_map(HashMap::values).collect();
        entries.sort_unstable_by(|a, b| {
            (a.context.as_str(), a.source_text.as_str())
                .cmp(&(b.context.as_str(), b.source_text.as_str()))
        });
        entries
    }

    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// First `<location>` of a message that names a file or a line.
fn first_locus(message: &TsMessage) -> Option<Locus> {
    message.locations.iter().find(|locus| !locus.is_empty()).cloned()
}
