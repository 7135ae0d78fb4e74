// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::language;
use crate::types::*;
use colored::*;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &CatalogReport) {
        println!("\n{}", "=== TS-LINGUIST CATALOG REPORT ===".bold().cyan());
        println!();

        self.print_header(report);
        println!();

        self.print_stats(&report.stats);
        println!();

        self.print_findings(&report.findings);
        println!();
    }

    fn print_header(&self, report: &CatalogReport) {
        println!("{}", "CATALOG".bold().yellow());
        println!("  File: {}", report.path.display());
        match report.language.as_deref() {
            Some(locale) => {
                let english = language::language_name(locale).unwrap_or("unknown");
                match language::native_name(locale) {
                    Some(native) if native != english => {
                        println!("  Language: {} ({}, {})", locale, english, native)
                    }
                    _ => println!("  Language: {} ({})", locale, english),
                }
            }
            None => println!("  Language: {}", "not set".red()),
        }
        println!("  SHA-256: {}", report.fingerprint.dimmed());
    }

    pub fn print_stats(&self, stats: &CatalogStats) {
        println!("{}", "STATISTICS".bold().yellow());
        println!("  Contexts: {}", stats.contexts);
        println!("  Messages: {}", stats.messages);
        println!("    Finished: {}", stats.finished);
        println!("    Unfinished: {}", stats.unfinished);
        println!("    Vanished: {}", stats.vanished);
        println!("    Obsolete: {}", stats.obsolete);
        println!("    Numerus: {}", stats.numerus);

        let completion_color = if stats.completion >= 90.0 {
            "green"
        } else if stats.completion >= 60.0 {
            "yellow"
        } else {
            "red"
        };
        println!(
            "  Completion: {}%",
            format!("{:.1}", stats.completion)
                .color(completion_color)
                .bold()
        );
    }

    fn print_findings(&self, findings: &[Finding]) {
        if findings.is_empty() {
            println!("{}", "No findings".green());
            return;
        }

        println!("{}", "FINDINGS".bold().yellow());
        for severity in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ] {
            let group: Vec<&Finding> = findings.iter().filter(|f| f.severity == severity).collect();
            if group.is_empty() {
                continue;
            }
            println!(
                "  {} ({})",
                severity.to_string().color(severity_color(severity)).bold(),
                group.len()
            );
            for (i, finding) in group.iter().enumerate() {
                println!(
                    "    {}. [{}] {}",
                    i + 1,
                    finding.rule.id().bold(),
                    finding.message
                );
                if let (Some(context), Some(source)) = (&finding.context, &finding.source) {
                    println!("       {} / {:?}", context, source);
                }
                let mut places = Vec::new();
                if let Some(line) = finding.ts_line {
                    places.push(format!("line {}", line));
                }
                if let Some(location) = &finding.location {
                    places.push(location.clone());
                }
                if !places.is_empty() {
                    println!("       {}", places.join(", ").dimmed());
                }
            }
        }
    }

    pub fn print_summary(&self, summary: &CheckSummary) {
        println!("{}", "VERDICT".bold().yellow());
        println!(
            "  {} file(s): {} critical, {} high, {} medium, {} low",
            summary.files, summary.critical, summary.high, summary.medium, summary.low
        );
        if summary.passed {
            println!("  {}", "PASSED".green().bold());
        } else {
            println!("  {}", "FAILED".red().bold());
            for failure in &summary.failures {
                println!("    - {}", failure.red());
            }
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "red",
        Severity::High => "yellow",
        Severity::Medium => "blue",
        Severity::Low => "green",
    }
}
