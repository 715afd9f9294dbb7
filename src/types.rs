//! Core types used throughout the project.

use std::fmt;

/// A source-location annotation attached to a translation entry.
///
/// Only translator tooling reads this; lookups never depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locus {
    pub filename: Option<String>,
    pub line: Option<u32>,
}

impl Locus {
    #[must_use]
    pub fn new(filename: Option<String>, line: Option<u32>) -> Self {
        Self { filename, line }
    }

    /// Builds a locus from the raw `filename`/`line` attributes of a
    /// `<location>` element.
    ///
    /// Relative lines written as `+N` keep `N`; negative relative lines and
    /// non-numeric values are dropped.
    #[must_use]
    pub fn from_attributes(filename: Option<String>, line: Option<&str>) -> Self {
        let line = line.and_then(|raw| raw.trim().trim_start_matches('+').parse::<u32>().ok());
        Self { filename: filename.filter(|f| !f.is_empty()), line }
    }

    /// Returns true if neither a file nor a line is known.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.filename.is_none() && self.line.is_none()
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => write!(f, "{file}"),
            (None, Some(line)) => write!(f, "line {line}"),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}
