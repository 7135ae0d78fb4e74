// SPDX-License-Identifier: PMPL-1.0-or-later

//! Placeholder, accelerator and punctuation scanning
//!
//! Qt strings use `%1`..`%99` (optionally `%L1`) and `%n`/`%Ln` for counts;
//! strings from the C core use printf conversions (`%s`, `%d`, `%.1f`,
//! `%1$s`). `%%` is a literal percent sign. Digits after `%` are a Qt
//! argument only when no conversion letter follows them: `%5d` is a printf
//! spec with width 5, `%5 ` is Qt argument five.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const COUNT: &str = "%n";

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"%%",
            r"|%(?P<pos>\d+)\$(?P<positional>[-+#0']*\d*(?:\.\d+)?(?:hh|h|ll|l|L|q|j|z|t)?[diouxXeEfFgGcsp])",
            r"|%(?P<printf>[-+#0']*\d*(?:\.\d+)?(?:hh|h|ll|l|L|q|j|z|t)?[diouxXeEfFgGcsp])",
            r"|%L?n",
            r"|%L?[1-9]\d?",
        ))
        .expect("placeholder pattern compiles")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// `%1`, `%n` with the `L` marker removed
    Qt(String),
    /// printf conversion without the `%` and position, e.g. `.1f`
    Printf { position: Option<usize>, spec: String },
}

impl Token {
    fn is_positional(&self) -> bool {
        matches!(self, Self::Printf { position: Some(_), .. })
    }

    fn render(&self) -> String {
        match self {
            Self::Qt(token) => token.clone(),
            Self::Printf {
                position: Some(position),
                spec,
            } => format!("%{}${}", position, spec),
            Self::Printf { position: None, spec } => format!("%{}", spec),
        }
    }
}

/// Placeholders of `text` in order of appearance.
fn scan(text: &str) -> Vec<Token> {
    pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?.as_str();
            if whole == "%%" {
                return None;
            }
            if let (Some(position), Some(spec)) = (caps.name("pos"), caps.name("positional")) {
                return Some(Token::Printf {
                    position: position.as_str().parse().ok(),
                    spec: spec.as_str().to_string(),
                });
            }
            if let Some(spec) = caps.name("printf") {
                return Some(Token::Printf {
                    position: None,
                    spec: spec.as_str().to_string(),
                });
            }
            Some(Token::Qt(whole.replacen("%L", "%", 1)))
        })
        .collect()
}

/// Tokens ready for multiset comparison. When positions are in play,
/// unnumbered printf specs take their sequence number so `%s of %d` lines
/// up with `%2$d van %1$s`.
fn normalized(tokens: &[Token], positional: bool) -> Vec<String> {
    let mut sequence = 0;
    tokens
        .iter()
        .map(|token| match token {
            Token::Printf { position, spec } if positional => {
                sequence += 1;
                format!("%{}${}", position.unwrap_or(sequence), spec)
            }
            other => other.render(),
        })
        .collect()
}

/// Placeholders in `text`, sorted, with the `L` (localized) marker removed.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut found: Vec<String> = scan(text).iter().map(Token::render).collect();
    found.sort();
    found
}

pub fn has_count(text: &str) -> bool {
    placeholders(text).iter().any(|p| p == COUNT)
}

/// Multiset difference between source and translation placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderDiff {
    /// In the source but not the translation
    pub missing: Vec<String>,
    /// In the translation but not the source
    pub extra: Vec<String>,
}

impl PlaceholderDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing {}", self.missing.join(", ")));
        }
        if !self.extra.is_empty() {
            parts.push(format!("unexpected {}", self.extra.join(", ")));
        }
        parts.join("; ")
    }
}

/// Compare placeholder multisets. In a numerus form the count placeholder
/// may be left out (`één duik` for the singular).
pub fn compare(source: &str, translation: &str, numerus_form: bool) -> PlaceholderDiff {
    let source = scan(source);
    let translation = scan(translation);
    let positional = source.iter().chain(&translation).any(Token::is_positional);

    let mut counts: BTreeMap<String, i32> = BTreeMap::new();
    for p in normalized(&source, positional) {
        *counts.entry(p).or_default() += 1;
    }
    for p in normalized(&translation, positional) {
        *counts.entry(p).or_default() -= 1;
    }

    let mut diff = PlaceholderDiff::default();
    for (token, balance) in counts {
        if balance > 0 && !(numerus_form && token == COUNT) {
            diff.missing.extend(std::iter::repeat(token.clone()).take(balance as usize));
        } else if balance < 0 {
            diff.extra.extend(std::iter::repeat(token).take((-balance) as usize));
        }
    }
    diff
}

/// Mnemonic character marked with `&`. `&&` is a literal ampersand.
pub fn accelerator(text: &str) -> Option<char> {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
            }
            Some(next) if next.is_alphanumeric() => return Some(*next),
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Colon,
    Ellipsis,
    Question,
    Exclamation,
}

pub fn terminal_punctuation(text: &str) -> Option<Terminal> {
    let text = text.trim_end();
    if text.ends_with("...") || text.ends_with('…') {
        Some(Terminal::Ellipsis)
    } else if text.ends_with(':') {
        Some(Terminal::Colon)
    } else if text.ends_with('?') {
        Some(Terminal::Question)
    } else if text.ends_with('!') {
        Some(Terminal::Exclamation)
    } else {
        None
    }
}
