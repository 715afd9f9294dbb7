use std::path::PathBuf;

use thiserror::Error;

/// Errors that prevent a catalog from being loaded at all.
///
/// Problems with individual entries never surface here; those entries are
/// skipped and recorded in the catalog's load report.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No resource is registered for the requested locale
    #[error("No translation resource found for locale '{locale}'")]
    NotFound { locale: String },

    /// The resource exists but could not be read
    #[error("Failed to read translation file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document's top-level structure could not be parsed
    #[error("Malformed translation document: {0}")]
    Malformed(String),

    /// A resource discovery pattern could not be compiled
    #[error("Invalid translation file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors raised while substituting placeholder arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A positional placeholder had no matching argument
    #[error("Missing positional argument {index} for template '{template}'")]
    MissingPositional { index: usize, template: String },

    /// A named placeholder had no matching argument
    #[error("Missing named argument '{name}' for template '{template}'")]
    MissingNamed { name: String, template: String },
}
