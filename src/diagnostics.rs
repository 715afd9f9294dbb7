//! Catalog checks
//!
//! Finds translations whose placeholders do not match their source text,
//! which would make `format` fail or drop a value at render time, and
//! surfaces what the loader skipped.

use std::fmt;

use crate::catalog::{
    Catalog,
    TranslationEntry,
};
use crate::format::PlaceholderSignature;
use crate::plural::PluralRule;
use crate::types::Locus;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A finding about one catalog entry, or about the catalog as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub context: Option<String>,
    pub source_text: Option<String>,
    pub message: String,
    pub locus: Option<Locus>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        if let Some(context) = &self.context {
            write!(f, "[{context}] ")?;
        }
        if let Some(source) = &self.source_text {
            write!(f, "{source:?}: ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(locus) = &self.locus {
            write!(f, " ({locus})")?;
        }
        Ok(())
    }
}

/// Check a loaded catalog.
///
/// Entry diagnostics come first, sorted by context and source text; the
/// catalog-wide summary lines follow.
#[must_use]
pub fn check_catalog(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    tracing::debug!(locale = ?catalog.locale(), entries = catalog.len(), "Checking catalog");

    let rule = catalog.plural_rule();
    for entry in catalog.entries() {
        check_placeholders(entry, &mut diagnostics);
        if entry.is_numerus() {
            check_form_count(entry, rule, &mut diagnostics);
        }
    }

    let report = catalog.report();
    for warning in &report.skipped {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            context: warning.context.clone(),
            source_text: warning.source_text.clone(),
            message: format!("entry skipped: {}", warning.reason),
            locus: warning.locus.clone(),
        });
    }

    sort_diagnostics(&mut diagnostics);

    if report.untranslated > 0 {
        diagnostics.push(summary(format!(
            "{} untranslated entries fall back to source text",
            report.untranslated
        )));
    }
    if report.unfinished > 0 {
        diagnostics.push(summary(format!(
            "{} unfinished translations were not loaded",
            report.unfinished
        )));
    }

    diagnostics
}

/// Compare each translated form's placeholders with the source's.
fn check_placeholders(entry: &TranslationEntry, diagnostics: &mut Vec<Diagnostic>) {
    let expected = PlaceholderSignature::of(&entry.source_text);

    let forms: Vec<&str> = if entry.is_numerus() {
        entry.plural_forms.iter().map(String::as_str).collect()
    } else {
        vec![entry.translated_text.as_str()]
    };

    for (index, form) in forms.into_iter().enumerate() {
        // Empty numerus forms fall back at lookup time.
        if form.is_empty() {
            continue;
        }
        let actual = PlaceholderSignature::of(form);
        if actual == expected {
            continue;
        }

        let subject =
            if entry.is_numerus() { format!("numerus form {index}") } else { "translation".to_string() };
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            context: Some(entry.context.clone()),
            source_text: Some(entry.source_text.clone()),
            message: format!(
                "{subject} placeholders {} do not match source placeholders {}",
                describe(&actual),
                describe(&expected)
            ),
            locus: entry.locus_hint.clone(),
        });
    }
}

/// Numerus entries should provide every form the locale's rule selects.
/// Missing forms clamp to the last one at lookup time.
fn check_form_count(
    entry: &TranslationEntry,
    rule: PluralRule,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let expected = rule.form_count();
    let provided = entry.plural_forms.len();
    if provided >= expected {
        return;
    }
    diagnostics.push(Diagnostic {
        severity: Severity::Warning,
        context: Some(entry.context.clone()),
        source_text: Some(entry.source_text.clone()),
        message: format!("{provided} of {expected} numerus forms provided"),
        locus: entry.locus_hint.clone(),
    });
}

/// Human-readable placeholder set, e.g. `2 positional + {page, total}`.
fn describe(signature: &PlaceholderSignature) -> String {
    if signature.is_empty() {
        return "(none)".to_string();
    }
    let mut parts = Vec::new();
    if signature.positional > 0 {
        parts.push(format!("{} positional", signature.positional));
    }
    if !signature.named.is_empty() {
        let names: Vec<&str> = signature.named.iter().map(String::as_str).collect();
        parts.push(format!("{{{}}}", names.join(", ")));
    }
    parts.join(" + ")
}

/// Catalog-wide informational line.
const fn summary(message: String) -> Diagnostic {
    Diagnostic { severity: Severity::Info, context: None, source_text: None, message, locus: None }
}

/// Order by context, then source text.
fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (a.context.as_deref(), a.source_text.as_deref())
            .cmp(&(b.context.as_deref(), b.source_text.as_deref()))
    });
}
