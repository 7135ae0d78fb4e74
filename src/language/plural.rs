// SPDX-License-Identifier: PMPL-1.0-or-later

//! Numerus (plural) rules.
//!
//! A numerus message carries one `<numerusform>` per plural category of the
//! target language, in the order below. `form_index` picks the form for a
//! count the same way Qt's runtime does.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluralRule {
    /// No plural distinction (Japanese, Chinese, Korean, ...).
    OneForm,
    /// Singular for 1, plural otherwise (English, Dutch, German, ...).
    NotOne,
    /// Singular for 0 and 1 (French, Brazilian Portuguese).
    GreaterThanOne,
    /// Russian, Ukrainian, Belarusian, Serbian, Croatian, Bosnian.
    Slavic,
    Polish,
    /// Czech and Slovak.
    Czech,
    Lithuanian,
    Latvian,
    Slovenian,
    Irish,
    Romanian,
    /// Ends in 1, ends in 2, everything else.
    Macedonian,
    Welsh,
    Arabic,
}

impl PluralRule {
    pub fn form_count(self) -> usize {
        match self {
            Self::OneForm => 1,
            Self::NotOne | Self::GreaterThanOne => 2,
            Self::Slavic
            | Self::Polish
            | Self::Czech
            | Self::Lithuanian
            | Self::Latvian
            | Self::Irish
            | Self::Romanian
            | Self::Macedonian => 3,
            Self::Slovenian | Self::Welsh => 4,
            Self::Arabic => 6,
        }
    }

    /// Index of the numerus form to show for `n`.
    pub fn form_index(self, n: u64) -> usize {
        let mod10 = n % 10;
        let mod100 = n % 100;
        let teen = (10..=19).contains(&mod100);
        match self {
            Self::OneForm => 0,
            Self::NotOne => usize::from(n != 1),
            Self::GreaterThanOne => usize::from(n > 1),
            Self::Slavic => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if (2..=4).contains(&mod10) && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&mod10) && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Lithuanian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if mod10 != 0 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match mod100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Macedonian => match mod10 {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 2,
                _ => 3,
            },
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&mod100) => 3,
                _ if mod100 >= 11 => 4,
                _ => 5,
            },
        }
    }
}

/// Plural rule for a locale name such as `nl`, `nl_NL` or `pt-BR`.
pub fn plural_rule(locale: &str) -> Option<PluralRule> {
    let territory = locale.split(['_', '-']).nth(1).unwrap_or("");
    let rule = match super::base_code(locale) {
        "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "ka" | "km" | "lo" | "my"
        | "jv" | "su" | "bo" | "dz" | "ii" => PluralRule::OneForm,
        "fr" | "ln" | "mg" | "ti" | "wa" | "oc" | "br" => PluralRule::GreaterThanOne,
        "pt" if territory.eq_ignore_ascii_case("BR") => PluralRule::GreaterThanOne,
        "ru" | "uk" | "be" | "sr" | "hr" | "bs" => PluralRule::Slavic,
        "pl" => PluralRule::Polish,
        "cs" | "sk" => PluralRule::Czech,
        "lt" => PluralRule::Lithuanian,
        "lv" => PluralRule::Latvian,
        "sl" => PluralRule::Slovenian,
        "ga" => PluralRule::Irish,
        "ro" | "mo" => PluralRule::Romanian,
        "mk" => PluralRule::Macedonian,
        "cy" => PluralRule::Welsh,
        "ar" => PluralRule::Arabic,
        code if super::is_valid_iso639_1(code) => PluralRule::NotOne,
        _ => return None,
    };
    Some(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dutch_has_two_forms() {
        let rule = plural_rule("nl_NL").unwrap();
        assert_eq!(rule, PluralRule::NotOne);
        assert_eq!(rule.form_count(), 2);
        assert_eq!(rule.form_index(1), 0);
        assert_eq!(rule.form_index(0), 1);
        assert_eq!(rule.form_index(12), 1);
    }

    #[test]
    fn brazilian_portuguese_differs_from_portugal() {
        assert_eq!(plural_rule("pt_BR"), Some(PluralRule::GreaterThanOne));
        assert_eq!(plural_rule("pt-BR"), Some(PluralRule::GreaterThanOne));
        assert_eq!(plural_rule("pt_PT"), Some(PluralRule::NotOne));
    }

    #[test]
    fn slavic_forms() {
        let rule = PluralRule::Slavic;
        assert_eq!(rule.form_index(1), 0);
        assert_eq!(rule.form_index(21), 0);
        assert_eq!(rule.form_index(11), 2);
        assert_eq!(rule.form_index(3), 1);
        assert_eq!(rule.form_index(13), 2);
        assert_eq!(rule.form_index(5), 2);
    }

    #[test]
    fn polish_and_czech() {
        assert_eq!(PluralRule::Polish.form_index(1), 0);
        assert_eq!(PluralRule::Polish.form_index(22), 1);
        assert_eq!(PluralRule::Polish.form_index(21), 2);
        assert_eq!(PluralRule::Czech.form_index(4), 1);
        assert_eq!(PluralRule::Czech.form_index(24), 2);
    }

    #[test]
    fn macedonian_has_three_forms() {
        let rule = plural_rule("mk_MK").unwrap();
        assert_eq!(rule.form_count(), 3);
        assert_eq!(rule.form_index(1), 0);
        assert_eq!(rule.form_index(11), 0);
        assert_eq!(rule.form_index(2), 1);
        assert_eq!(rule.form_index(22), 1);
        assert_eq!(rule.form_index(3), 2);
        assert_eq!(rule.form_index(10), 2);
    }

    #[test]
    fn form_index_stays_in_range() {
        let rules = [
            PluralRule::OneForm,
            PluralRule::NotOne,
            PluralRule::GreaterThanOne,
            PluralRule::Slavic,
            PluralRule::Polish,
            PluralRule::Czech,
            PluralRule::Lithuanian,
            PluralRule::Latvian,
            PluralRule::Slovenian,
            PluralRule::Irish,
            PluralRule::Romanian,
            PluralRule::Macedonian,
            PluralRule::Welsh,
            PluralRule::Arabic,
        ];
        for rule in rules {
            for n in 0..250 {
                assert!(rule.form_index(n) < rule.form_count(), "{:?} n={}", rule, n);
            }
        }
    }

    #[test]
    fn unknown_locale_has_no_rule() {
        assert_eq!(plural_rule("xx_YY"), None);
        assert_eq!(plural_rule(""), None);
    }
}
