// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime lookup table.
//!
//! A `Translator` is built once from a loaded catalog (at startup or on a
//! language switch) and never mutated afterwards, so it can be shared by
//! reference across threads without locking. Only finished, non-empty
//! translations are kept: anything else resolves to the English source,
//! which is the fallback the UI shows.

use crate::catalog::Catalog;
use crate::language::{group_separator, plural_rule, PluralRule};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Context used for strings coming from the C core.
pub const C_CONTEXT: &str = "gettextFromC";

#[derive(Debug, Clone)]
pub struct Translator {
    language: Option<String>,
    rule: PluralRule,
    /// Thousands separator for `%Ln`
    separator: char,
    /// context -> source -> variants by disambiguation
    table: HashMap<String, HashMap<String, Vec<Variant>>>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Variant {
    comment: String,
    forms: Vec<String>,
}

/// One source string in an exported table. Numerus messages export their
/// forms; a source with disambiguated variants exports them keyed by comment
/// (`""` for the plain one).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportValue {
    Text(String),
    Forms(Vec<String>),
    Disambiguated(BTreeMap<String, ExportValue>),
}

impl Variant {
    fn export(&self) -> ExportValue {
        match self.forms.as_slice() {
            [single] => ExportValue::Text(single.clone()),
            forms => ExportValue::Forms(forms.to_vec()),
        }
    }
}

impl Translator {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let rule = catalog
            .language
            .as_deref()
            .and_then(plural_rule)
            .unwrap_or(PluralRule::NotOne);
        let mut table: HashMap<String, HashMap<String, Vec<Variant>>> = HashMap::new();
        let mut len = 0;
        let mut skipped = 0;

        for entry in catalog.entries() {
            let message = entry.message;
            let translation = &message.translation;
            if !translation.is_finished() || translation.body.is_empty() {
                skipped += 1;
                continue;
            }
            let variants = table
                .entry(entry.context.to_string())
                .or_default()
                .entry(message.source.clone())
                .or_default();
            // First definition wins, like lrelease.
            if variants
                .iter()
                .any(|v| v.comment == message.disambiguation())
            {
                continue;
            }
            variants.push(Variant {
                comment: message.disambiguation().to_string(),
                forms: translation.body.forms().to_vec(),
            });
            len += 1;
        }

        debug!(
            language = catalog.language.as_deref().unwrap_or("?"),
            translations = len,
            skipped,
            "built translator"
        );
        Self {
            language: catalog.language.clone(),
            rule,
            separator: catalog.language.as_deref().map_or(',', group_separator),
            table,
            len,
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    /// Number of usable translations.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw translation for `(context, source, disambiguation)`, or `None`
    /// when the catalog has nothing usable.
    ///
    /// A miss with a non-empty disambiguation is retried without it. For
    /// numerus messages `n` selects the form; a missing or negative count
    /// selects the first one.
    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        disambiguation: &str,
        n: Option<i64>,
    ) -> Option<&str> {
        let variants = self.table.get(context)?.get(source)?;
        let variant = variants
            .iter()
            .find(|v| v.comment == disambiguation)
            .or_else(|| {
                if disambiguation.is_empty() {
                    None
                } else {
                    variants.iter().find(|v| v.comment.is_empty())
                }
            })?;

        let index = match n {
            Some(n) if n >= 0 && variant.forms.len() > 1 => self
                .rule
                .form_index(n as u64)
                .min(variant.forms.len() - 1),
            _ => 0,
        };
        let text = variant.forms.get(index)?;
        if text.is_empty() {
            None
        } else {
            Some(text.as_str())
        }
    }

    /// Translation with fallback to `source`. With a non-negative `n`,
    /// every `%n` is replaced by the count and every `%Ln` by the count
    /// with the catalog locale's digit grouping (`1.000` for Dutch).
    pub fn translate(
        &self,
        context: &str,
        source: &str,
        disambiguation: &str,
        n: Option<i64>,
    ) -> String {
        let text = self
            .lookup(context, source, disambiguation, n)
            .unwrap_or(source);
        match n {
            Some(n) if n >= 0 => substitute_count(text, n, self.separator),
            _ => text.to_string(),
        }
    }

    /// The whole table as `context -> source -> translation`, sorted.
    pub fn export(&self) -> BTreeMap<String, BTreeMap<String, ExportValue>> {
        self.table
            .iter()
            .map(|(context, sources)| {
                let sources = sources
                    .iter()
                    .map(|(source, variants)| {
                        let value = match variants.as_slice() {
                            [only] if only.comment.is_empty() => only.export(),
                            _ => ExportValue::Disambiguated(
                                variants
                                    .iter()
                                    .map(|v| (v.comment.clone(), v.export()))
                                    .collect(),
                            ),
                        };
                        (source.clone(), value)
                    })
                    .collect();
                (context.clone(), sources)
            })
            .collect()
    }

    pub fn tr(&self, context: &str, source: &str) -> String {
        self.translate(context, source, "", None)
    }

    /// Lookup for strings the C core marks with `translate("gettextFromC", ...)`.
    pub fn tr_c(&self, source: &str) -> String {
        self.translate(C_CONTEXT, source, "", None)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::from_catalog(&Catalog::default())
    }
}

fn substitute_count(text: &str, n: i64, separator: char) -> String {
    let number = n.to_string();
    text.replace("%Ln", &group_digits(&number, separator))
        .replace("%n", &number)
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
