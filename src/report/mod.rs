// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report generation module

pub mod diff;
pub mod formatter;
pub mod output;
pub mod sarif;

use crate::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub use diff::{format_diff, CatalogDiff};
pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Save reports to file
pub fn save_report<P: AsRef<Path>>(
    reports: &[CatalogReport],
    format: ReportOutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let content = format.serialize(reports)?;
    fs::write(path, content).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

/// Print report to console
pub fn print_report(report: &CatalogReport) {
    let formatter = ReportFormatter::new();
    formatter.print(report);
}

pub fn print_summary(summary: &CheckSummary) {
    ReportFormatter::new().print_summary(summary);
}
