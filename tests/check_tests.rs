// SPDX-License-Identifier: PMPL-1.0-or-later

//! Checks against the fixture catalogs

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use ts_linguist::checks;
use ts_linguist::report::ReportOutputFormat;
use ts_linguist::types::*;
use ts_linguist::Config;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_clean_catalog_only_reports_unfinished() {
    let report = checks::check_file(&fixture("subsurface_nl_NL.ts"), &Config::default())
        .expect("check should succeed");

    let rules: Vec<Rule> = report.findings.iter().map(|f| f.rule).collect();
    assert_eq!(rules, vec![Rule::UnfinishedTranslation]);
    assert_eq!(report.findings[0].context.as_deref(), Some("BtDeviceSelectionDialog"));

    assert_eq!(report.language.as_deref(), Some("nl_NL"));
    assert_eq!(report.fingerprint.len(), 64);
    assert_eq!(report.stats.contexts, 6);
    assert_eq!(report.stats.messages, 15);
    assert_eq!(report.stats.finished, 13);
    assert_eq!(report.stats.unfinished, 1);
    assert_eq!(report.stats.vanished, 1);
    assert_eq!(report.stats.numerus, 1);
    assert!((report.stats.completion - 92.857).abs() < 0.01);

    let summary = checks::summarize(&[report], &Config::default());
    assert!(summary.passed, "failures: {:?}", summary.failures);
    assert_eq!(summary.low, 1);
}

#[test]
fn test_broken_catalog_triggers_each_message_rule_once() {
    let report = checks::check_file(&fixture("subsurface_broken.ts"), &Config::default()).unwrap();

    let rules: BTreeSet<&str> = report.findings.iter().map(|f| f.rule.id()).collect();
    let expected: BTreeSet<&str> = [
        "TS001", "TS002", "TS003", "TS004", "TS005", "TS006", "TS007", "TS008", "TS009", "TS010",
        "TS011",
    ]
    .into_iter()
    .collect();
    assert_eq!(rules, expected);
    assert_eq!(report.findings.len(), 11);

    assert_eq!(report.count(Severity::Critical), 1);
    assert_eq!(report.count(Severity::High), 4);
    assert_eq!(report.count(Severity::Medium), 2);
    assert_eq!(report.count(Severity::Low), 4);
    assert_eq!(report.worst(), Some(Severity::Critical));
}

#[test]
fn test_findings_point_into_the_catalog() {
    let report = checks::check_file(&fixture("subsurface_broken.ts"), &Config::default()).unwrap();

    let accelerator = report
        .findings
        .iter()
        .find(|f| f.rule == Rule::AcceleratorMismatch)
        .unwrap();
    assert_eq!(accelerator.ts_line, Some(44));
    assert_eq!(accelerator.source.as_deref(), Some("&Quit"));
    assert_eq!(
        accelerator.location.as_deref(),
        Some("../desktop-widgets/mainwindow.ui:171")
    );

    let duplicate = report
        .findings
        .iter()
        .find(|f| f.rule == Rule::DuplicateSource)
        .unwrap();
    assert_eq!(duplicate.ts_line, Some(16), "reported on the second definition");

    let placeholder = report
        .findings
        .iter()
        .find(|f| f.rule == Rule::PlaceholderMismatch)
        .unwrap();
    assert_eq!(placeholder.message, "missing %2");
    assert_eq!(placeholder.context.as_deref(), Some("gettextFromC"));
}

#[test]
fn test_broken_catalog_fails_default_threshold() {
    let report = checks::check_file(&fixture("subsurface_broken.ts"), &Config::default()).unwrap();
    let summary = checks::summarize(&[report], &Config::default());
    assert!(!summary.passed);
    assert_eq!(summary.files, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].contains("5 finding(s) at or above HIGH"));
}

#[test]
fn test_config_file_relaxes_the_run() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("ts-linguist.yaml");
    fs::write(
        &config_path,
        "disabled_rules: [TS001, duplicate-source, TS003]\n\
         severity_overrides:\n  numerus-form-count: medium\n  placeholder-mismatch: low\n\
         ignore_contexts: [MainWindow]\n",
    )
    .unwrap();
    let config = Config::load(Some(&config_path)).unwrap();

    let report = checks::check_file(&fixture("subsurface_broken.ts"), &config).unwrap();
    assert!(report.findings.iter().all(|f| f.context.as_deref() != Some("MainWindow")));
    assert_eq!(report.count(Severity::Critical), 0);
    assert_eq!(report.count(Severity::High), 0);

    let summary = checks::summarize(&[report], &config);
    assert!(summary.passed, "failures: {:?}", summary.failures);
}

#[test]
fn test_min_completion_threshold() {
    let report = checks::check_file(&fixture("subsurface_nl_NL.ts"), &Config::default()).unwrap();
    let config = Config {
        min_completion: Some(95.0),
        ..Config::default()
    };
    let summary = checks::summarize(&[report], &config);
    assert!(!summary.passed);
    assert!(summary.failures[0].contains("92.9% complete"));
}

#[test]
fn test_unknown_language_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subsurface_xx.ts");
    let xml = fs::read_to_string(fixture("subsurface_nl_NL.ts"))
        .unwrap()
        .replace("language=\"nl_NL\"", "language=\"xx_XX\"");
    fs::write(&path, xml).unwrap();

    let report = checks::check_file(&path, &Config::default()).unwrap();
    let unknown = report
        .findings
        .iter()
        .find(|f| f.rule == Rule::UnknownLanguage)
        .expect("TS012 expected");
    assert!(unknown.message.contains("xx_XX"));
    // Without a plural rule the form count cannot be judged
    assert!(report.findings.iter().all(|f| f.rule != Rule::NumerusFormCount));

    let config = Config {
        language: Some("nl_NL".to_string()),
        ..Config::default()
    };
    let report = checks::check_file(&path, &config).unwrap();
    assert!(report.findings.iter().all(|f| f.rule != Rule::UnknownLanguage));
}

#[test]
fn test_unparsable_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.ts");
    fs::write(&path, "export const answer: number = 42;\n").unwrap();
    assert!(checks::check_file(&path, &Config::default()).is_err());
}

#[test]
fn test_report_serializes_in_every_format() {
    let report = checks::check_file(&fixture("subsurface_broken.ts"), &Config::default()).unwrap();
    let reports = vec![report];

    let json = ReportOutputFormat::Json.serialize(&reports).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["language"], "nl_NL");
    assert_eq!(value[0]["findings"].as_array().unwrap().len(), 11);

    let yaml = ReportOutputFormat::Yaml.serialize(&reports).unwrap();
    let back: Vec<CatalogReport> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back[0].findings, reports[0].findings);

    let text = ReportOutputFormat::Text.serialize(&reports).unwrap();
    assert!(text.contains("subsurface_broken.ts:44: MEDIUM [TS007]"));
}
