// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for ts-linguist reports

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Data-quality rules checked against a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    EmptySource,
    DuplicateSource,
    EmptyTranslation,
    NumerusFormCount,
    PlaceholderMismatch,
    UnfinishedTranslation,
    AcceleratorMismatch,
    WhitespaceMismatch,
    PunctuationMismatch,
    IdenticalTranslation,
    NumerusNotFlagged,
    UnknownLanguage,
}

impl Rule {
    pub fn all() -> &'static [Rule] {
        &[
            Rule::EmptySource,
            Rule::DuplicateSource,
            Rule::EmptyTranslation,
            Rule::NumerusFormCount,
            Rule::PlaceholderMismatch,
            Rule::UnfinishedTranslation,
            Rule::AcceleratorMismatch,
            Rule::WhitespaceMismatch,
            Rule::PunctuationMismatch,
            Rule::IdenticalTranslation,
            Rule::NumerusNotFlagged,
            Rule::UnknownLanguage,
        ]
    }
}

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "info" | "note" => Some(Severity::Low),
            "medium" | "warning" | "warn" => Some(Severity::Medium),
            "high" | "error" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One rule violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: Rule,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Extraction site from `<location>`, e.g. `../core/divesite.cpp:382`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Line of the offending `<message>` in the catalog file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_line: Option<u32>,
}

/// Message counts for one catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    pub numerus: usize,
    /// Finished share of active (finished + unfinished) messages, 0-100
    pub completion: f64,
}

/// Result of checking a single `.ts` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReport {
    pub path: PathBuf,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// SHA-256 of the file contents
    pub fingerprint: String,
    pub stats: CatalogStats,
    pub findings: Vec<Finding>,
}

impl CatalogReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

/// Verdict over a set of checked catalogs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSummary {
    pub files: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub passed: bool,
    pub failures: Vec<String>,
}
