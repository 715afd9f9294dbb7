//! What a load kept, dropped and skipped.

use std::fmt;

use crate::types::Locus;

/// Why a message was left out of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `<message>` directly under `<TS>`.
    OutsideContext,
    /// `<context>` without a `<name>`.
    MissingContextName,
    /// `<message>` without a `<source>`.
    MissingSource,
    /// `<source></source>`.
    EmptySource,
    /// `<message>` without a `<translation>`.
    MissingTranslation,
    /// `numerus="yes"` but no `<numerusform>` children.
    NoNumerusForms,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OutsideContext => "message is not inside a <context>",
            Self::MissingContextName => "context has no <name>",
            Self::MissingSource => "message has no <source>",
            Self::EmptySource => "source text is empty",
            Self::MissingTranslation => "message has no <translation>",
            Self::NoNumerusForms => "numerus message has no <numerusform>",
        };
        f.write_str(text)
    }
}

/// A malformed message that was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub context: Option<String>,
    pub source_text: Option<String>,
    pub reason: SkipReason,
    pub locus: Option<Locus>,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if let Some(context) = &self.context {
            write!(f, " (context '{context}'")?;
            if let Some(source) = &self.source_text {
                write!(f, ", source '{source}'")?;
            }
            write!(f, ")")?;
        }
        if let Some(locus) = &self.locus {
            write!(f, " at {locus}")?;
        }
        Ok(())
    }
}

/// Summary of a catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Distinct `(context, source)` entries in the catalog.
    pub loaded: usize,
    /// Entries that collided with an earlier `(context, source)` pair.
    pub duplicates: usize,
    /// Messages with an empty translation.
    pub untranslated: usize,
    /// `type="unfinished"` messages left out.
    pub unfinished: usize,
    /// `type="obsolete"` and `type="vanished"` messages left out.
    pub retired: usize,
    pub skipped: Vec<LoadWarning>,
}

impl LoadReport {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }
}
