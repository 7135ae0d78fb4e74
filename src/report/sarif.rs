// SPDX-License-Identifier: PMPL-1.0-or-later

//! SARIF 2.1.0 output for code-scanning integration
//!
//! Each catalog becomes an artifact (with its SHA-256) and each finding a
//! result located at the line of its `<message>`. The extraction site from
//! `<location>` is attached as a related location so reviewers can jump to
//! the C++ call. See:
//! https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::types::{CatalogReport, Finding, Rule, Severity};
use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

#[derive(Debug, Clone, Serialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub artifacts: Vec<SarifArtifact>,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

/// `reportingDescriptor` for one rule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifText,
    pub default_configuration: SarifLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifLevel {
    pub level: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifText {
    pub text: String,
}

/// A scanned catalog and its content hash
#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifact {
    pub location: SarifUri,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: BTreeMap<&'static str, String>,
    /// Target locale of the catalog
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<&'static str, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub rule_index: usize,
    pub level: &'static str,
    pub message: SarifText,
    pub locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_locations: Vec<SarifLocation>,
    /// Stable across line shifts: rule, context, source
    pub partial_fingerprints: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<&'static str, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
}

fn level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low => "note",
    }
}

/// Split `../core/divelist.cpp:42` into path and line. Locations without
/// a numeric suffix (`.ui` files written by older lupdate) have no line.
fn split_location(loc: &str) -> (&str, Option<u32>) {
    match loc.rsplit_once(':') {
        Some((path, line)) => match line.parse() {
            Ok(line) => (path, Some(line)),
            Err(_) => (loc, None),
        },
        None => (loc, None),
    }
}

fn at(uri: &str, line: Option<u32>) -> SarifLocation {
    SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifUri {
                uri: uri.replace('\\', "/"),
            },
            region: line.map(|start_line| SarifRegion { start_line }),
        },
    }
}

fn result(uri: &str, finding: &Finding, rule_index: usize) -> SarifResult {
    let related = finding
        .location
        .as_deref()
        .map(split_location)
        .map(|(path, line)| vec![at(path, line)])
        .unwrap_or_default();

    let text = match &finding.context {
        Some(context) => format!("{}: {}", context, finding.message),
        None => finding.message.clone(),
    };

    let key = format!(
        "{}|{}|{}",
        finding.rule.id(),
        finding.context.as_deref().unwrap_or(""),
        finding.source.as_deref().unwrap_or("")
    );
    let mut partial_fingerprints = BTreeMap::new();
    partial_fingerprints.insert("messageKey/v1", key);

    let mut properties = BTreeMap::new();
    if let Some(context) = &finding.context {
        properties.insert("context", context.clone());
    }
    if let Some(source) = &finding.source {
        properties.insert("source", source.clone());
    }

    SarifResult {
        rule_id: finding.rule.id().to_string(),
        rule_index,
        level: level(finding.severity),
        message: SarifText { text },
        locations: vec![at(uri, finding.ts_line)],
        related_locations: related,
        partial_fingerprints,
        properties,
    }
}

/// Convert catalog reports to a single SARIF run
pub fn to_sarif(reports: &[CatalogReport]) -> Result<SarifLog> {
    // Only rules that fired, in id order
    let fired: Vec<Rule> = reports
        .iter()
        .flat_map(|r| r.findings.iter().map(|f| f.rule))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rules = fired
        .iter()
        .map(|rule| SarifRule {
            id: rule.id().to_string(),
            name: rule.name().to_string(),
            short_description: SarifText {
                text: rule.description().to_string(),
            },
            default_configuration: SarifLevel {
                level: level(rule.default_severity()),
            },
        })
        .collect();

    let mut artifacts = Vec::with_capacity(reports.len());
    let mut results = Vec::new();
    for report in reports {
        let uri = report.path.to_string_lossy().replace('\\', "/");
        let mut hashes = BTreeMap::new();
        if !report.fingerprint.is_empty() {
            hashes.insert("sha-256", report.fingerprint.clone());
        }
        let mut properties = BTreeMap::new();
        if let Some(language) = &report.language {
            properties.insert("language", language.clone());
        }
        artifacts.push(SarifArtifact {
            location: SarifUri { uri: uri.clone() },
            hashes,
            properties,
        });

        for finding in &report.findings {
            let index = fired.iter().position(|r| *r == finding.rule).unwrap_or_default();
            results.push(result(&uri, finding, index));
        }
    }

    Ok(SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            artifacts,
            results,
        }],
    })
}

/// Serialize a SARIF log to JSON string
pub fn to_sarif_json(reports: &[CatalogReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_sarif(reports)?)?)
}
