//! Qt numerus form selection.
//!
//! A numerus message (`<message numerus="yes">`) carries one
//! `<numerusform>` per plural form of the target language, in the order Qt
//! Linguist uses for that language.

use crate::input::normalize_locale;

/// Plural rule families, named after their Qt Linguist form layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluralRule {
    /// One form for every count (Chinese, Japanese, Korean, ...).
    Single,
    /// `n == 1` / everything else.
    #[default]
    OneOther,
    /// `n <= 1` / everything else.
    French,
    /// Russian-style one / few / many.
    EastSlavic,
    /// `n == 1` / few / many.
    Polish,
    /// `n == 1` / 2-4 / everything else.
    Czech,
}

impl PluralRule {
    /// Choose the rule for a locale code such as `zh_HK` or `pt-BR`.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let normalized = normalize_locale(locale);
        if normalized == "pt_br" {
            return Self::French;
        }

        let language = normalized.split('_').next().unwrap_or_default();
        match language {
            "zh" | "ja" | "ko" | "vi" | "th" | "id" | "ms" | "tr" => Self::Single,
            "fr" => Self::French,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            _ => Self::OneOther,
        }
    }

    /// Number of numerus forms a complete translation provides.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::French => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// Index of the numerus form used for `count`.
    #[must_use]
    pub fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let last_digit = n % 10;
        let last_two = n % 100;
        let few = (2..=4).contains(&last_digit) && !(12..=14).contains(&last_two);

        match self {
            Self::Single => 0,
            Self::OneOther => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::EastSlavic => {
                if last_digit == 1 && last_two != 11 {
                    0
                } else if few {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if few {
                    1
                } else {
                    2
                }
            }
            Self::Czech => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n) {
                    1
                } else {
                    2
                }
            }
        }
    }
}

/// Pick the form for `count`, clamping to the last available form when the
/// translation provides fewer forms than the rule expects.
///
/// An empty (untranslated) form yields `None`.
#[must_use]
pub fn select_form(forms: &[String], rule: PluralRule, count: i64) -> Option<&str> {
    let index = rule.form_index(count);
    forms
        .get(index)
        .or_else(|| forms.last())
        .map(String::as_str)
        .filter(|form| !form.is_empty())
}

/// Replace every `%n` with `count`.
#[must_use]
pub fn substitute_count(text: &str, count: i64) -> String {
    text.replace("%n", &count.to_string())
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("zh_HK", PluralRule::Single)]
    #[case("ja", PluralRule::Single)]
    #[case("en", PluralRule::OneOther)]
    #[case("en_GB", PluralRule::OneOther)]
    #[case("fr_CA", PluralRule::French)]
    #[case("pt-BR", PluralRule::French)]
    #[case("pt_PT", PluralRule::OneOther)]
    #[case("ru", PluralRule::EastSlavic)]
    #[case("pl_PL", PluralRule::Polish)]
    #[case("cs", PluralRule::Czech)]
    #[case("", PluralRule::OneOther)]
    fn test_for_locale(#[case] locale: &str, #[case] expected: PluralRule) {
        assert_that!(PluralRule::for_locale(locale), eq(expected));
    }

    #[rstest]
    #[case(PluralRule::Single, 1, 0)]
    #[case(PluralRule::Single, 7, 0)]
    #[case(PluralRule::OneOther, 1, 0)]
    #[case(PluralRule::OneOther, 0, 1)]
    #[case(PluralRule::OneOther, -1, 0)]
    #[case(PluralRule::French, 0, 0)]
    #[case(PluralRule::French, 2, 1)]
    #[case(PluralRule::EastSlavic, 21, 0)]
    #[case(PluralRule::EastSlavic, 11, 2)]
    #[case(PluralRule::EastSlavic, 23, 1)]
    #[case(PluralRule::EastSlavic, 13, 2)]
    #[case(PluralRule::Polish, 1, 0)]
    #[case(PluralRule::Polish, 22, 1)]
    #[case(PluralRule::Polish, 21, 2)]
    #[case(PluralRule::Czech, 3, 1)]
    #[case(PluralRule::Czech, 5, 2)]
    fn test_form_index(#[case] rule: PluralRule, #[case] count: i64, #[case] expected: usize) {
        assert_that!(rule.form_index(count), eq(expected));
    }

    #[rstest]
    fn test_select_form_clamps_to_last() {
        let forms = vec!["%n 匹馬".to_string()];

        assert_that!(select_form(&forms, PluralRule::OneOther, 5), some(eq("%n 匹馬")));
        assert_that!(select_form(&[], PluralRule::OneOther, 5), none());
    }

    #[rstest]
    fn test_select_form_skips_empty_form() {
        let forms = vec![String::new(), "%n records".to_string()];

        assert_that!(select_form(&forms, PluralRule::OneOther, 1), none());
        assert_that!(select_form(&forms, PluralRule::OneOther, 2), some(eq("%n records")));
    }

    #[rstest]
    #[case(PluralRule::Single, 1)]
    #[case(PluralRule::French, 2)]
    #[case(PluralRule::Polish, 3)]
    fn test_form_count(#[case] rule: PluralRule, #[case] expected: usize) {
        assert_that!(rule.form_count(), eq(expected));
    }

    #[rstest]
    fn test_substitute_count() {
        assert_that!(substitute_count("%n runners, %n scratched", 3), eq("3 runners, 3 scratched"));
    }
}
