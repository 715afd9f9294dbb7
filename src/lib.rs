//! qt-ts-catalog
//!
//! Loads Qt Linguist `.ts` translation files into read-only catalogs keyed by
//! `(context, source text)`, formats `{}`/`{name}` placeholders in the
//! translated strings, and switches the active locale at runtime.
//!
//! ```
//! use qt_ts_catalog::{Catalog, LoadOptions, format::FormatArgs};
//!
//! let xml = r#"<TS version="2.1" language="zh_HK">
//! <context><name>RacePredictionModal</name>
//! <message><source>POS {}</source><translation>第{}</translation></message>
//! </context></TS>"#;
//!
//! let catalog = Catalog::parse(xml, LoadOptions::default())?;
//! assert_eq!(catalog.format("RacePredictionModal", "POS {}", &FormatArgs::new().arg(3))?, "第3");
//! assert_eq!(catalog.lookup("SettingsTab", "Unknown String"), "Unknown String");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod input;
pub mod plural;
pub mod registry;
pub mod translator;
pub mod types;

pub use catalog::{
    Catalog,
    DuplicatePolicy,
    LoadOptions,
    TranslationEntry,
};
pub use error::{
    FormatError,
    LoadError,
};
pub use registry::LocaleRegistry;
pub use translator::Translator;
