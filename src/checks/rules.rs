// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rule identifiers, names and default severities

use crate::types::{Rule, Severity};

impl Rule {
    /// Stable identifier used in SARIF output and config files
    pub fn id(self) -> &'static str {
        match self {
            Rule::EmptySource => "TS001",
            Rule::DuplicateSource => "TS002",
            Rule::EmptyTranslation => "TS003",
            Rule::NumerusFormCount => "TS004",
            Rule::PlaceholderMismatch => "TS005",
            Rule::UnfinishedTranslation => "TS006",
            Rule::AcceleratorMismatch => "TS007",
            Rule::WhitespaceMismatch => "TS008",
            Rule::PunctuationMismatch => "TS009",
            Rule::IdenticalTranslation => "TS010",
            Rule::NumerusNotFlagged => "TS011",
            Rule::UnknownLanguage => "TS012",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::EmptySource => "empty-source",
            Rule::DuplicateSource => "duplicate-source",
            Rule::EmptyTranslation => "empty-translation",
            Rule::NumerusFormCount => "numerus-form-count",
            Rule::PlaceholderMismatch => "placeholder-mismatch",
            Rule::UnfinishedTranslation => "unfinished-translation",
            Rule::AcceleratorMismatch => "accelerator-mismatch",
            Rule::WhitespaceMismatch => "whitespace-mismatch",
            Rule::PunctuationMismatch => "punctuation-mismatch",
            Rule::IdenticalTranslation => "identical-translation",
            Rule::NumerusNotFlagged => "numerus-not-flagged",
            Rule::UnknownLanguage => "unknown-language",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Rule::EmptySource => Severity::Critical,
            Rule::DuplicateSource
            | Rule::EmptyTranslation
            | Rule::NumerusFormCount
            | Rule::PlaceholderMismatch => Severity::High,
            Rule::AcceleratorMismatch | Rule::NumerusNotFlagged | Rule::UnknownLanguage => {
                Severity::Medium
            }
            Rule::UnfinishedTranslation
            | Rule::WhitespaceMismatch
            | Rule::PunctuationMismatch
            | Rule::IdenticalTranslation => Severity::Low,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::EmptySource => "Message has an empty source text",
            Rule::DuplicateSource => "Same source and disambiguation appear twice in one context",
            Rule::EmptyTranslation => "Translation is marked finished but has no text",
            Rule::NumerusFormCount => {
                "Numerus translation does not have one form per plural category of the language"
            }
            Rule::PlaceholderMismatch => "Placeholders in the translation differ from the source",
            Rule::UnfinishedTranslation => "Translation is unfinished; the English source is shown",
            Rule::AcceleratorMismatch => "Keyboard accelerator (&) present on only one side",
            Rule::WhitespaceMismatch => "Leading or trailing whitespace differs from the source",
            Rule::PunctuationMismatch => "Terminal punctuation differs from the source",
            Rule::IdenticalTranslation => "Finished translation is identical to the source",
            Rule::NumerusNotFlagged => "Source uses %n but the message is not a numerus message",
            Rule::UnknownLanguage => "Catalog language is missing or has no known plural rule",
        }
    }

    /// Accepts an id (`TS005`, case-insensitive) or a name (`placeholder-mismatch`).
    pub fn parse(value: &str) -> Option<Rule> {
        let value = value.trim();
        Rule::all()
            .iter()
            .copied()
            .find(|rule| rule.id().eq_ignore_ascii_case(value) || rule.name() == value)
    }
}
