//! Translation resource input
pub mod locale;
pub mod ts_document;

pub use locale::{
    detect_locale_from_path,
    is_valid_locale,
    normalize_locale,
};
pub use ts_document::{
    TranslationKind,
    TsContext,
    TsDocument,
    TsMessage,
    TsTranslation,
    parse_ts_document,
};
