// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sweep: batch checking of every catalog under a directory
//!
//! Walks the directory tree for `*.ts` files, checks each one in parallel,
//! and produces a summary sorted by finding count (highest first). A
//! translations folder usually holds one catalog per language, so the
//! table doubles as a per-language health overview.

use crate::checks;
use crate::config::Config;
use crate::types::{CatalogReport, CheckSummary, Severity};
use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for a sweep run
pub struct SweepConfig {
    /// Directory searched recursively for catalogs
    pub directory: PathBuf,
    /// Only list catalogs with findings
    pub findings_only: bool,
    /// Minimum number of findings to include
    pub min_findings: usize,
    pub checks: Config,
}

/// Results from checking a single catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub finding_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub messages: usize,
    pub completion: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub report: Option<CatalogReport>,
}

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub created_at: String,
    pub directory: PathBuf,
    pub files_checked: usize,
    pub files_with_findings: usize,
    pub total_findings: usize,
    pub total_critical: usize,
    /// Pass/fail over every catalog found, before the listing filters
    pub verdict: CheckSummary,
    pub results: Vec<FileResult>,
}

impl SweepReport {
    /// Full reports of every catalog that parsed, in table order
    pub fn catalog_reports(&self) -> Vec<CatalogReport> {
        self.results
            .iter()
            .filter_map(|r| r.report.clone())
            .collect()
    }
}

/// Find all `.ts` files under the given directory
pub fn discover_catalogs(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        anyhow::bail!("Not a directory: {}", directory.display());
    }

    let mut catalogs: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            // Skip VCS metadata and build output
            let name = entry.file_name().to_string_lossy();
            !(entry.depth() > 0 && (name.starts_with('.') || name == "target" || name == "build"))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
        .collect();

    catalogs.sort();
    debug!(count = catalogs.len(), directory = %directory.display(), "discovered catalogs");
    Ok(catalogs)
}

fn check_one(path: &Path, config: &Config) -> FileResult {
    match checks::check_file(path, config) {
        Ok(report) => FileResult {
            path: path.to_path_buf(),
            language: report.language.clone(),
            finding_count: report.findings.len(),
            critical_count: report.count(Severity::Critical),
            high_count: report.count(Severity::High),
            messages: report.stats.messages,
            completion: report.stats.completion,
            error: None,
            report: Some(report),
        },
        Err(e) => {
            // A TypeScript source shares the extension; keep going
            warn!(path = %path.display(), error = %e, "could not check catalog");
            FileResult {
                path: path.to_path_buf(),
                language: None,
                finding_count: 0,
                critical_count: 0,
                high_count: 0,
                messages: 0,
                completion: 0.0,
                error: Some(format!("{:#}", e)),
                report: None,
            }
        }
    }
}

/// `fail_on`/`min_completion` over the parsed catalogs. A `.ts` file that
/// could not be read or parsed fails the sweep.
fn verdict(results: &[FileResult], config: &Config) -> CheckSummary {
    let reports: Vec<CatalogReport> = results.iter().filter_map(|r| r.report.clone()).collect();
    let mut summary = checks::summarize(&reports, config);
    for result in results {
        if let Some(error) = &result.error {
            summary
                .failures
                .push(format!("{}: {}", result.path.display(), error));
        }
    }
    summary.files = results.len();
    summary.passed = summary.failures.is_empty();
    summary
}

/// Run sweep across all catalogs in a directory
pub fn run(config: &SweepConfig) -> Result<SweepReport> {
    let catalogs = discover_catalogs(&config.directory)?;

    let mut results: Vec<FileResult> = catalogs
        .par_iter()
        .map(|path| check_one(path, &config.checks))
        .collect();
    let verdict = verdict(&results, &config.checks);

    // Sort by finding count descending, path ascending for ties
    results.sort_by(|a, b| {
        b.finding_count
            .cmp(&a.finding_count)
            .then_with(|| a.path.cmp(&b.path))
    });

    // Apply filters; files that failed to parse always stay listed
    if config.findings_only {
        results.retain(|r| r.error.is_some() || r.finding_count > 0);
    }
    if config.min_findings > 0 {
        results.retain(|r| r.error.is_some() || r.finding_count >= config.min_findings);
    }

    let files_with_findings = results.iter().filter(|r| r.finding_count > 0).count();
    let total_findings: usize = results.iter().map(|r| r.finding_count).sum();
    let total_critical: usize = results.iter().map(|r| r.critical_count).sum();

    Ok(SweepReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: config.directory.clone(),
        files_checked: catalogs.len(),
        files_with_findings,
        total_findings,
        total_critical,
        verdict,
        results,
    })
}

/// Print a summary table to the terminal
pub fn print_summary(report: &SweepReport, quiet: bool) {
    if quiet {
        return;
    }

    println!("\n=== SWEEP SUMMARY ===");
    println!(
        "Directory: {}  |  Catalogs checked: {}  |  With findings: {}",
        report.directory.display(),
        report.files_checked,
        report.files_with_findings
    );
    println!(
        "Total findings: {}  |  Critical: {}",
        report.total_findings, report.total_critical
    );
    println!();

    if report.results.is_empty() {
        println!("  No catalogs with findings.");
        return;
    }

    // Header
    println!(
        "  {:<40} {:<8} {:>6} {:>6} {:>6} {:>8} {:>7}",
        "Catalog", "Lang", "Total", "Crit", "High", "Msgs", "Done"
    );
    println!("  {}", "-".repeat(87));

    // Show top 20 catalogs
    for result in report.results.iter().take(20) {
        let name = result
            .path
            .strip_prefix(&report.directory)
            .unwrap_or(&result.path)
            .display()
            .to_string();
        if let Some(err) = &result.error {
            println!("  {:<40} ERROR: {}", name, err);
        } else {
            println!(
                "  {:<40} {:<8} {:>6} {:>6} {:>6} {:>8} {:>6.1}%",
                name,
                result.language.as_deref().unwrap_or("-"),
                result.finding_count,
                result.critical_count,
                result.high_count,
                result.messages,
                result.completion,
            );
        }
    }

    if report.results.len() > 20 {
        println!("  ... and {} more catalogs", report.results.len() - 20);
    }
    println!();
}

/// Write sweep report as JSON
pub fn write_report(report: &SweepReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
