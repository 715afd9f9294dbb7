//! A single loaded translation.

use crate::types::Locus;

/// One active translation, keyed by `(context, source_text)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// UI grouping the string belongs to (usually a widget class name).
    pub context: String,
    pub source_text: String,
    /// Never empty; for numerus entries this is the first non-empty form.
    pub translated_text: String,
    /// Numerus forms in Qt order; empty for ordinary messages.
    pub plural_forms: Vec<String>,
    /// Disambiguation comment. Not part of the lookup key.
    pub comment: Option<String>,
    pub locus_hint: Option<Locus>,
}

impl TranslationEntry {
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        source_text: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            source_text: source_text.into(),
            translated_text: translated_text.into(),
            plural_forms: Vec::new(),
            comment: None,
            locus_hint: None,
        }
    }

    /// Attach numerus forms. The singular text becomes the first form that
    /// is actually translated.
    #[must_use]
    pub fn with_plural_forms(mut self, forms: Vec<String>) -> Self {
        if let Some(first) = forms.iter().find(|form| !form.is_empty()) {
            self.translated_text.clone_from(first);
        }
        self.plural_forms = forms;
        self
    }

    #[must_use]
    pub fn is_numerus(&self) -> bool {
        !self.plural_forms.is_empty()
    }
}
