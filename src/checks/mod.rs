// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data-quality checks for translation catalogs
//!
//! Each rule inspects one message (or the catalog header) and emits a
//! `Finding`. Retired messages never reach the runtime table, so they are
//! only checked for an empty source and duplicate keys. A vanished message
//! was finished when it was retired and must still carry text; an obsolete
//! one was retired unfinished and may be empty.

pub mod placeholders;
mod rules;

use crate::catalog::{Catalog, Entry, TranslationBody, TranslationState};
use crate::config::Config;
use crate::language::{self, PluralRule};
use crate::types::*;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use placeholders::Terminal;

/// Load a catalog from disk and check it
pub fn check_file(path: &Path, config: &Config) -> Result<CatalogReport> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let catalog = Catalog::from_bytes(path, &bytes)
        .with_context(|| format!("parsing {}", path.display()))?;

    let findings = run(&catalog, config);
    let stats = stats(&catalog);
    info!(
        path = %path.display(),
        findings = findings.len(),
        completion = stats.completion,
        "checked catalog"
    );

    Ok(CatalogReport {
        path: path.to_path_buf(),
        created_at: chrono::Utc::now().to_rfc3339(),
        language: catalog.language.clone(),
        fingerprint: hex::encode(Sha256::digest(&bytes)),
        stats,
        findings,
    })
}

/// Message counts and completion percentage
pub fn stats(catalog: &Catalog) -> CatalogStats {
    let mut stats = CatalogStats {
        contexts: catalog.contexts.len(),
        ..Default::default()
    };
    for entry in catalog.entries() {
        stats.messages += 1;
        if entry.message.numerus {
            stats.numerus += 1;
        }
        match entry.message.translation.state {
            TranslationState::Finished => stats.finished += 1,
            TranslationState::Unfinished => stats.unfinished += 1,
            TranslationState::Vanished => stats.vanished += 1,
            TranslationState::Obsolete => stats.obsolete += 1,
        }
    }
    let active = stats.finished + stats.unfinished;
    stats.completion = if active == 0 {
        100.0
    } else {
        stats.finished as f64 * 100.0 / active as f64
    };
    stats
}

/// Run every enabled rule over the catalog
pub fn run(catalog: &Catalog, config: &Config) -> Vec<Finding> {
    let mut checker = Checker {
        config,
        plural: None,
        source_is_target: false,
        findings: Vec::new(),
    };
    checker.header(catalog);

    let mut seen: HashMap<(&str, &str, &str), u32> = HashMap::new();
    for entry in catalog.entries() {
        if config.ignores_context(entry.context) {
            continue;
        }
        let message = entry.message;
        let key = (entry.context, message.source.as_str(), message.disambiguation());
        let count = seen.entry(key).or_default();
        *count += 1;
        if *count == 2 {
            checker.emit(
                Rule::DuplicateSource,
                &entry,
                format!("\"{}\" is defined more than once in {}", message.source, entry.context),
            );
        }
        checker.message(&entry);
    }

    debug!(findings = checker.findings.len(), "checks finished");
    checker.findings
}

/// Fold a set of reports into a pass/fail verdict
pub fn summarize(reports: &[CatalogReport], config: &Config) -> CheckSummary {
    let count = |severity: Severity| -> usize { reports.iter().map(|r| r.count(severity)).sum() };
    let mut failures = Vec::new();

    for report in reports {
        let blocking = report
            .findings
            .iter()
            .filter(|f| f.severity >= config.fail_on)
            .count();
        if blocking > 0 {
            failures.push(format!(
                "{}: {} finding(s) at or above {}",
                report.path.display(),
                blocking,
                config.fail_on
            ));
        }
        if let Some(min) = config.min_completion {
            if report.stats.completion < min {
                failures.push(format!(
                    "{}: {:.1}% complete, below the required {:.1}%",
                    report.path.display(),
                    report.stats.completion,
                    min
                ));
            }
        }
    }

    CheckSummary {
        files: reports.len(),
        critical: count(Severity::Critical),
        high: count(Severity::High),
        medium: count(Severity::Medium),
        low: count(Severity::Low),
        passed: failures.is_empty(),
        failures,
    }
}

struct Checker<'c> {
    config: &'c Config,
    plural: Option<PluralRule>,
    /// Catalog translates into its own source language (e.g. `en_GB`)
    source_is_target: bool,
    findings: Vec<Finding>,
}

impl Checker<'_> {
    fn emit(&mut self, rule: Rule, entry: &Entry<'_>, message: String) {
        if !self.config.is_enabled(rule) {
            return;
        }
        self.findings.push(Finding {
            rule,
            severity: self.config.severity(rule),
            message,
            context: Some(entry.context.to_string()),
            source: Some(entry.message.source.clone()),
            location: entry.message.first_location(),
            ts_line: entry.message.ts_line,
        });
    }

    fn header(&mut self, catalog: &Catalog) {
        let locale = self
            .config
            .language
            .as_deref()
            .or(catalog.language.as_deref());
        self.plural = locale.and_then(language::plural_rule);
        self.source_is_target = match (locale, catalog.source_language.as_deref()) {
            (Some(target), Some(source)) => language::base_code(target) == language::base_code(source),
            (Some(target), None) => language::base_code(target) == "en",
            _ => false,
        };

        if self.plural.is_none() && self.config.is_enabled(Rule::UnknownLanguage) {
            let message = match locale {
                Some(locale) => format!("no plural rule known for language \"{}\"", locale),
                None => "catalog has no language attribute".to_string(),
            };
            self.findings.push(Finding {
                rule: Rule::UnknownLanguage,
                severity: self.config.severity(Rule::UnknownLanguage),
                message,
                context: None,
                source: None,
                location: None,
                ts_line: Some(1),
            });
        }
    }

    fn message(&mut self, entry: &Entry<'_>) {
        let message = entry.message;
        if message.source.trim().is_empty() {
            self.emit(Rule::EmptySource, entry, "source text is empty".to_string());
        }
        if message.translation.state == TranslationState::Vanished {
            self.empty_forms(entry);
        }
        if !message.is_active() {
            return;
        }

        let source = message.source.as_str();
        if !message.numerus && placeholders::has_count(source) {
            self.emit(
                Rule::NumerusNotFlagged,
                entry,
                "source uses %n but the message is not marked numerus=\"yes\"".to_string(),
            );
        }

        let translation = &message.translation;
        match translation.state {
            TranslationState::Unfinished => {
                self.emit(
                    Rule::UnfinishedTranslation,
                    entry,
                    "translation is unfinished; the source text is shown instead".to_string(),
                );
                self.numerus_shape(entry);
                // Partial work is still checked so problems surface before
                // the translator marks it done.
                if !translation.body.is_empty() {
                    self.placeholders(entry);
                }
                return;
            }
            TranslationState::Finished => {}
            TranslationState::Vanished | TranslationState::Obsolete => return,
        }

        self.empty_forms(entry);
        self.numerus_shape(entry);
        self.placeholders(entry);

        for form in translation.body.forms().iter().filter(|f| !f.is_empty()) {
            self.form_consistency(entry, form);
        }

        if let TranslationBody::Single(text) = &translation.body {
            self.identical(entry, text);
        }
    }

    fn empty_forms(&mut self, entry: &Entry<'_>) {
        let translation = &entry.message.translation;
        let forms = translation.body.forms();
        if !forms.iter().any(String::is_empty) {
            return;
        }
        let detail = match (forms.len() > 1, translation.state) {
            (true, _) => "a numerus form is empty",
            (false, TranslationState::Vanished) => "vanished translation is empty",
            (false, _) => "translation is finished but empty",
        };
        self.emit(Rule::EmptyTranslation, entry, detail.to_string());
    }

    fn numerus_shape(&mut self, entry: &Entry<'_>) {
        let message = entry.message;
        let translation = &message.translation;
        match (&translation.body, message.numerus) {
            (TranslationBody::Numerus(forms), true) => {
                if let Some(rule) = self.plural {
                    if forms.len() != rule.form_count() {
                        self.emit(
                            Rule::NumerusFormCount,
                            entry,
                            format!(
                                "{} numerus form(s), the language needs {}",
                                forms.len(),
                                rule.form_count()
                            ),
                        );
                    }
                }
            }
            (TranslationBody::Single(text), true) => {
                // An untouched numerus message may not have forms yet.
                if !(translation.state == TranslationState::Unfinished && text.is_empty()) {
                    self.emit(
                        Rule::NumerusFormCount,
                        entry,
                        "numerus message has no <numerusform> children".to_string(),
                    );
                }
            }
            (TranslationBody::Numerus(_), false) => self.emit(
                Rule::NumerusFormCount,
                entry,
                "<numerusform> children on a message without numerus=\"yes\"".to_string(),
            ),
            (TranslationBody::Single(_), false) => {}
        }
    }

    fn placeholders(&mut self, entry: &Entry<'_>) {
        let message = entry.message;
        let numerus = matches!(message.translation.body, TranslationBody::Numerus(_));
        let forms = message.translation.body.forms();
        for (index, form) in forms.iter().enumerate() {
            if form.is_empty() {
                continue;
            }
            let diff = placeholders::compare(&message.source, form, numerus);
            if diff.is_empty() {
                continue;
            }
            let text = if numerus {
                format!("numerus form {}: {}", index + 1, diff.describe())
            } else {
                diff.describe()
            };
            self.emit(Rule::PlaceholderMismatch, entry, text);
        }
    }

    fn form_consistency(&mut self, entry: &Entry<'_>, form: &str) {
        let source = entry.message.source.as_str();

        if placeholders::accelerator(source).is_some() != placeholders::accelerator(form).is_some()
        {
            let text = if placeholders::accelerator(source).is_some() {
                "source has an & accelerator, translation has none"
            } else {
                "translation has an & accelerator, source has none"
            };
            self.emit(Rule::AcceleratorMismatch, entry, text.to_string());
        }

        let leading = |s: &str| s.starts_with(char::is_whitespace);
        let trailing = |s: &str| s.ends_with(char::is_whitespace);
        if leading(source) != leading(form) || trailing(source) != trailing(form) {
            self.emit(
                Rule::WhitespaceMismatch,
                entry,
                "leading or trailing whitespace differs from the source".to_string(),
            );
        }

        let expected = placeholders::terminal_punctuation(source);
        let actual = placeholders::terminal_punctuation(form);
        if expected != actual {
            self.emit(
                Rule::PunctuationMismatch,
                entry,
                format!(
                    "source ends with {}, translation ends with {}",
                    describe_terminal(expected),
                    describe_terminal(actual)
                ),
            );
        }
    }

    fn identical(&mut self, entry: &Entry<'_>, text: &str) {
        let source = entry.message.source.as_str();
        if self.source_is_target || text != source || self.config.allows_identical(source) {
            return;
        }
        if source.chars().filter(|c| c.is_alphabetic()).count() < 4 {
            return;
        }
        self.emit(
            Rule::IdenticalTranslation,
            entry,
            "translation is identical to the source".to_string(),
        );
    }
}

fn describe_terminal(terminal: Option<Terminal>) -> &'static str {
    match terminal {
        Some(Terminal::Colon) => "':'",
        Some(Terminal::Ellipsis) => "an ellipsis",
        Some(Terminal::Question) => "'?'",
        Some(Terminal::Exclamation) => "'!'",
        None => "no punctuation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Message, Translation};

    fn catalog_with(messages: Vec<(&str, Message)>) -> Catalog {
        let mut catalog = Catalog::new(Some("nl_NL".to_string()));
        for (context, message) in messages {
            catalog.insert(context, message);
        }
        catalog
    }

    fn rules(findings: &[Finding]) -> Vec<Rule> {
        findings.iter().map(|f| f.rule).collect()
    }

    #[test]
    fn test_clean_catalog_has_no_findings() {
        let catalog = catalog_with(vec![
            ("MainWindow", Message::new("&Quit", Translation::finished("&Afsluiten"))),
            ("gettextFromC", Message::new("Error: %1", Translation::finished("Fout: %1"))),
            (
                "DiveListModel",
                Message::new("(%n dive(s))", Translation::numerus(["(%n duik)", "(%n duiken)"])),
            ),
        ]);
        assert!(run(&catalog, &Config::default()).is_empty());
    }

    #[test]
    fn test_duplicate_reported_once_per_key() {
        let catalog = catalog_with(vec![
            ("MainWindow", Message::new("Delete", Translation::finished("Wissen"))),
            ("MainWindow", Message::new("Delete", Translation::finished("Verwijderen"))),
            ("MainWindow", Message::new("Delete", Translation::finished("Weg"))),
            ("DiveListView", Message::new("Delete", Translation::finished("Wissen"))),
            (
                "MainWindow",
                Message::new("Delete", Translation::finished("Wis")).with_comment("toolbar"),
            ),
        ]);
        let findings = run(&catalog, &Config::default());
        assert_eq!(rules(&findings), vec![Rule::DuplicateSource]);
    }

    #[test]
    fn test_empty_source_and_translation() {
        let catalog = catalog_with(vec![
            ("X", Message::new("", Translation::unfinished())),
            ("X", Message::new("Tags", Translation::finished(""))),
        ]);
        let found = rules(&run(&catalog, &Config::default()));
        assert!(found.contains(&Rule::EmptySource));
        assert!(found.contains(&Rule::EmptyTranslation));
    }

    #[test]
    fn test_numerus_form_count_for_dutch() {
        let catalog = catalog_with(vec![(
            "DiveListModel",
            Message::new("(%n dive(s))", Translation::numerus(["(%n duiken)"])),
        )]);
        let findings = run(&catalog, &Config::default());
        assert_eq!(rules(&findings), vec![Rule::NumerusFormCount]);
        assert!(findings[0].message.contains("needs 2"));
    }

    #[test]
    fn test_placeholder_mismatch() {
        let catalog = catalog_with(vec![(
            "gettextFromC",
            Message::new("Malformed XML response. Line %1: %2", Translation::finished("Ongeldig XML-antwoord. Regel %1:")),
        )]);
        let findings = run(&catalog, &Config::default());
        let finding = findings
            .iter()
            .find(|f| f.rule == Rule::PlaceholderMismatch)
            .unwrap();
        assert_eq!(finding.message, "missing %2");
        assert_eq!(finding.severity, Severity::High);
    }

    #[test]
    fn test_reordered_printf_arguments() {
        let catalog = catalog_with(vec![
            ("gettextFromC", Message::new("%s of %d", Translation::finished("%2$d van %1$s"))),
            (
                "gettextFromC",
                Message::new("value %5d units", Translation::finished("waarde %5s eenheden")),
            ),
        ]);
        let findings = run(&catalog, &Config::default());
        assert_eq!(rules(&findings), vec![Rule::PlaceholderMismatch]);
        assert_eq!(findings[0].source.as_deref(), Some("value %5d units"));
        assert_eq!(findings[0].message, "missing %5d; unexpected %5s");
    }

    #[test]
    fn test_unfinished_is_low_and_partial_text_checked() {
        let catalog = catalog_with(vec![(
            "UploadDiveLogsDE",
            Message::new(
                "Conversion of dive %1 to divelogs.de format failed",
                Translation {
                    state: TranslationState::Unfinished,
                    body: TranslationBody::Single("Conversie naar divelogs.de mislukt".into()),
                },
            ),
        )]);
        let findings = run(&catalog, &Config::default());
        assert_eq!(
            rules(&findings),
            vec![Rule::UnfinishedTranslation, Rule::PlaceholderMismatch]
        );
        assert_eq!(findings[0].severity, Severity::Low);
    }

    #[test]
    fn test_style_rules() {
        let catalog = catalog_with(vec![
            ("MainWindow", Message::new("&Quit", Translation::finished("Afsluiten"))),
            ("DiveInfo", Message::new("Tags: ", Translation::finished("Labels:"))),
            ("MainWindow", Message::new("Save as...", Translation::finished("Opslaan als"))),
            ("Profile", Message::new("Calculated ceiling", Translation::finished("Calculated ceiling"))),
            ("Stats", Message::new("%n dives", Translation::finished("%n duiken"))),
        ]);
        let found = rules(&run(&catalog, &Config::default()));
        assert!(found.contains(&Rule::AcceleratorMismatch));
        assert!(found.contains(&Rule::WhitespaceMismatch));
        assert!(found.contains(&Rule::PunctuationMismatch));
        assert!(found.contains(&Rule::IdenticalTranslation));
        assert!(found.contains(&Rule::NumerusNotFlagged));
    }

    #[test]
    fn test_config_disables_and_overrides() {
        let catalog = catalog_with(vec![(
            "Profile",
            Message::new("Calculated ceiling", Translation::finished("Calculated ceiling")),
        )]);
        let mut config = Config::default();
        config
            .severity_overrides
            .insert("identical-translation".to_string(), Severity::High);
        assert_eq!(run(&catalog, &config)[0].severity, Severity::High);

        config.identical_allowlist.push("Calculated ceiling".to_string());
        assert!(run(&catalog, &config).is_empty());

        config.identical_allowlist.clear();
        config.disabled_rules.push("TS010".to_string());
        assert!(run(&catalog, &config).is_empty());
    }

    #[test]
    fn test_unknown_language() {
        let mut catalog = catalog_with(vec![]);
        catalog.language = None;
        let findings = run(&catalog, &Config::default());
        assert_eq!(rules(&findings), vec![Rule::UnknownLanguage]);
    }

    #[test]
    fn test_obsolete_messages_skip_content_rules() {
        let catalog = catalog_with(vec![(
            "X",
            Message::new(
                "Error: %1",
                Translation {
                    state: TranslationState::Vanished,
                    body: TranslationBody::Single("Fout".into()),
                },
            ),
        )]);
        assert!(run(&catalog, &Config::default()).is_empty());
    }

    #[test]
    fn test_empty_vanished_translation() {
        let retired = |state, text: &str| {
            Message::new(
                "Show log",
                Translation {
                    state,
                    body: TranslationBody::Single(text.into()),
                },
            )
        };
        let catalog = catalog_with(vec![
            ("MainWindow", retired(TranslationState::Vanished, "")),
            ("DiveLog", retired(TranslationState::Obsolete, "")),
            ("Profile", retired(TranslationState::Vanished, "Logboek tonen")),
        ]);
        let findings = run(&catalog, &Config::default());
        assert_eq!(rules(&findings), vec![Rule::EmptyTranslation]);
        assert_eq!(findings[0].context.as_deref(), Some("MainWindow"));
        assert_eq!(findings[0].message, "vanished translation is empty");
    }

    #[test]
    fn test_stats_completion() {
        let catalog = catalog_with(vec![
            ("X", Message::new("a", Translation::finished("b"))),
            ("X", Message::new("c", Translation::unfinished())),
            ("X", Message::new("d", Translation::finished("e"))),
            (
                "Y",
                Message::new(
                    "f",
                    Translation {
                        state: TranslationState::Obsolete,
                        body: TranslationBody::Single("g".into()),
                    },
                ),
            ),
        ]);
        let stats = stats(&catalog);
        assert_eq!(stats.contexts, 2);
        assert_eq!(stats.messages, 4);
        assert_eq!(stats.finished, 2);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.obsolete, 1);
        assert!((stats.completion - 66.666).abs() < 0.01);
    }
}
