//! Locale code handling

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Language subtags recognized in translation file names.
///
/// Matching file names against known languages keeps words such as `app`
/// or `ui` from being read as locale codes.
static KNOWN_LANGUAGES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "af", "am", "ar", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "dv", "el",
        "en", "eo", "es", "et", "eu", "fa", "fi", "fil", "fo", "fr", "ga", "gl", "gu", "he", "hi",
        "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "kk", "km", "kn", "ko", "kok", "ky", "lo",
        "lt", "lv", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my", "nb", "ne", "nl", "nn", "no",
        "ns", "pa", "pl", "ps", "pt", "qu", "ro", "ru", "sa", "se", "si", "sk", "sl", "sq", "sr",
        "sv", "sw", "syr", "ta", "te", "th", "tl", "tn", "tr", "ts", "tt", "uk", "ur", "uz", "vi",
        "xh", "yue", "zh", "zu",
    ]
    .into_iter()
    .collect()
});

/// Normalize a locale code for comparison (lowercase, `-` replaced with `_`).
///
/// `zh-HK`, `zh_hk` and `zh_HK` all normalize to `zh_hk`.
#[must_use]
pub fn normalize_locale(code: &str) -> String {
    code.trim().to_lowercase().replace('-', "_")
}

/// Returns true if `code` looks like a locale identifier.
///
/// Accepts a 2-3 letter language subtag, optionally followed by a 4-letter
/// script and/or a region (2 letters or 3 digits), separated by `_` or `-`.
#[must_use]
pub fn is_valid_locale(code: &str) -> bool {
    let mut parts = code.split(['_', '-']);
    let Some(language) = parts.next() else {
        return false;
    };
    if !is_language_subtag(language) {
        return false;
    }

    let rest: Vec<&str> = parts.collect();
    match rest.as_slice() {
        [] => true,
        [single] => is_script_subtag(single) || is_region_subtag(single),
        [script, region] => is_script_subtag(script) && is_region_subtag(region),
        _ => false,
    }
}

/// 2-3 letters.
fn is_language_subtag(part: &str) -> bool {
    (2..=3).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphabetic())
}

/// 4 letters, e.g. `Hant`.
fn is_script_subtag(part: &str) -> bool {
    part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic())
}

/// 2 letters or 3 digits.
fn is_region_subtag(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// Strict form used when guessing from file names: a known lowercase
/// language, so that words like `README` or `app` are not taken for locales.
fn is_strict_language(part: &str) -> bool {
    KNOWN_LANGUAGES.contains(part)
}

/// Uppercase region or UN M.49 digits.
fn is_strict_region(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// Detect the locale of a translation file from its file stem.
///
/// The stem is split on `_`, `-` and `.` and searched from the end for a
/// `language[_REGION]` pair whose language is a known language subtag.
///
/// # Examples
/// - `i18n/zh_HK.ts` → `zh_HK`
/// - `i18n/app_zh_HK.ts` → `zh_HK`
/// - `i18n/racing-ja.ts` → `ja`
/// - `i18n/strings.ts` → `None`
/// - `i18n/app_HK.ts` → `None`
#[must_use]
pub fn detect_locale_from_path(file_path: &Path) -> Option<String> {
    let stem = file_path.file_stem()?.to_string_lossy();
    let parts: Vec<&str> = stem.split(['_', '-', '.']).collect();

    for end in (1..=parts.len()).rev() {
        let Some(last) = parts.get(end - 1) else {
            continue;
        };

        if is_strict_region(last)
            && let Some(language) = end.checked_sub(2).and_then(|i| parts.get(i))
            && is_strict_language(language)
        {
            return Some(format!("{language}_{last}"));
        }

        if is_strict_language(last) {
            return Some((*last).to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("zh_HK", "zh_hk")]
    #[case("zh-HK", "zh_hk")]
    #[case(" EN ", "en")]
    fn test_normalize_locale(#[case] input: &str, #[case] expected: &str) {
        assert_that!(normalize_locale(input), eq(expected));
    }

    #[rstest]
    #[case("en", true)]
    #[case("zh_HK", true)]
    #[case("zh-Hant-HK", true)]
    #[case("es_419", true)]
    #[case("zh_Hant", true)]
    #[case("", false)]
    #[case("e", false)]
    #[case("english", false)]
    #[case("zh_HKG1", false)]
    #[case("zh__HK", false)]
    fn test_is_valid_locale(#[case] code: &str, #[case] expected: bool) {
        assert_that!(is_valid_locale(code), eq(expected));
    }

    #[rstest]
    #[case("/app/i18n/zh_HK.ts", Some("zh_HK"))]
    #[case("/app/i18n/app_zh_HK.ts", Some("zh_HK"))]
    #[case("/app/i18n/racing-ja.ts", Some("ja"))]
    #[case("/app/i18n/en.ts", Some("en"))]
    #[case("/app/i18n/app_HK.ts", None)]
    #[case("/app/i18n/app.ts", None)]
    #[case("/app/i18n/ui_yue_HK.ts", Some("yue_HK"))]
    #[case("/app/i18n/strings.ts", None)]
    #[case("/app/i18n/README", None)]
    fn test_detect_locale_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_locale_from_path(Path::new(path));
        assert_eq!(result.as_deref(), expected);
    }
}
