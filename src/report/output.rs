// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use crate::report::sarif;
use crate::types::CatalogReport;
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    Text,
    Json,
    Yaml,
    Sarif,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportOutputFormat::Text),
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            "sarif" => Some(ReportOutputFormat::Sarif),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportOutputFormat::Text => "txt",
            ReportOutputFormat::Json => "json",
            ReportOutputFormat::Yaml => "yaml",
            ReportOutputFormat::Sarif => "sarif",
        }
    }

    pub fn serialize(&self, reports: &[CatalogReport]) -> Result<String> {
        match self {
            ReportOutputFormat::Text => Ok(format_plain(reports)),
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(reports)?),
            ReportOutputFormat::Sarif => sarif::to_sarif_json(reports),
        }
    }
}

/// Uncolored one-finding-per-line form, `file:line: SEVERITY [TS005] message`.
/// Editors and CI log viewers pick these up as clickable locations.
fn format_plain(reports: &[CatalogReport]) -> String {
    let mut lines = Vec::new();
    for report in reports {
        let path = report.path.display();
        for finding in &report.findings {
            let place = match finding.ts_line {
                Some(line) => format!("{}:{}", path, line),
                None => path.to_string(),
            };
            let mut line = format!(
                "{}: {} [{}] {}",
                place,
                finding.severity,
                finding.rule.id(),
                finding.message
            );
            if let Some(context) = &finding.context {
                line.push_str(&format!(" ({})", context));
            }
            lines.push(line);
        }
        lines.push(format!(
            "{}: {} finding(s), {:.1}% complete",
            path,
            report.findings.len(),
            report.stats.completion
        ));
    }
    lines.join("\n")
}
