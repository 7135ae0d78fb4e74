// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language metadata for catalog locales: ISO 639-1 validation, display
//! names, and the plural rules that decide how many numerus forms a
//! translation needs.

mod iso639;
mod plural;

pub use iso639::{is_valid_iso639_1, language_name, native_name};
pub use plural::{plural_rule, PluralRule};

/// Language part of a Qt locale name: `nl_NL` -> `nl`, `pt-BR` -> `pt`.
pub fn base_code(locale: &str) -> &str {
    locale.split(['_', '-', '.', '@']).next().unwrap_or(locale)
}

/// Thousands separator Qt's locale data uses when formatting `%Ln`.
pub fn group_separator(locale: &str) -> char {
    match base_code(locale) {
        "nl" | "de" | "da" | "it" | "es" | "pt" | "id" | "tr" | "el" | "ro" | "sl" | "hr"
        | "sr" | "vi" | "is" => '.',
        "fr" | "ru" | "uk" | "be" | "pl" | "cs" | "sk" | "sv" | "nb" | "nn" | "fi" | "hu"
        | "bg" | "lt" | "lv" | "et" => '\u{a0}',
        _ => ',',
    }
}
