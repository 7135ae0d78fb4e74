// SPDX-License-Identifier: PMPL-1.0-or-later

//! ts-linguist: check, query and convert Qt Linguist translation catalogs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ts_linguist::catalog::{self, Catalog};
use ts_linguist::report::{self, CatalogDiff, ReportFormatter, ReportOutputFormat};
use ts_linguist::sweep::{self, SweepConfig};
use ts_linguist::types::Severity;
use ts_linguist::{checks, Config, Translator};

#[derive(Parser)]
#[command(name = "ts-linguist")]
#[command(version)]
#[command(about = "Check, query and convert Qt Linguist translation catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run data-quality checks on one or more catalogs
    Check {
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportOutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (default: ./ts-linguist.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Lowest severity that fails the run
        #[arg(long, value_parser = parse_severity)]
        fail_on: Option<Severity>,

        /// Minimum completion percentage per catalog
        #[arg(long, value_name = "PCT")]
        min_completion: Option<f64>,
    },

    /// Look up a translation the way the application would at runtime
    Lookup {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Translation context (class name, or gettextFromC for the C core)
        #[arg(long)]
        context: String,

        #[arg(value_name = "SOURCE")]
        source: String,

        /// Disambiguation comment
        #[arg(long, default_value = "")]
        comment: String,

        /// Count for numerus messages; substituted for %n
        #[arg(short, allow_negative_numbers = true)]
        n: Option<i64>,
    },

    /// Print message counts and completion
    Stats {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Dump the runtime table (context -> source -> translation)
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a catalog back out and verify nothing was lost
    Roundtrip {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep the rewritten catalog here
        #[arg(short, long, value_name = "OUT")]
        write: Option<PathBuf>,
    },

    /// Compare two versions of a catalog
    Diff {
        #[arg(value_name = "BASE")]
        base: PathBuf,

        #[arg(value_name = "COMPARE")]
        compare: PathBuf,

        /// Emit the diff as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check every .ts file under a directory
    Sweep {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Write the sweep report (JSON, or SARIF with --sarif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only list catalogs with findings
        #[arg(long)]
        findings_only: bool,

        /// Minimum number of findings to list a catalog
        #[arg(long, default_value = "0")]
        min_findings: usize,

        /// Write SARIF instead of the JSON sweep report
        #[arg(long)]
        sarif: bool,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Yaml,
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    Severity::parse(value).ok_or_else(|| format!("unknown severity `{}`", value))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            paths,
            format,
            output,
            config,
            fail_on,
            min_completion,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(severity) = fail_on {
                config.fail_on = severity;
            }
            if min_completion.is_some() {
                config.min_completion = min_completion;
            }

            let reports = paths
                .iter()
                .map(|path| checks::check_file(path, &config))
                .collect::<Result<Vec<_>>>()?;
            let summary = checks::summarize(&reports, &config);

            match (format, output) {
                (format, Some(output_path)) => {
                    report::save_report(&reports, format, &output_path)?;
                    println!("Report saved to: {}", output_path.display());
                    report::print_summary(&summary);
                }
                (ReportOutputFormat::Text, None) => {
                    for r in &reports {
                        report::print_report(r);
                    }
                    report::print_summary(&summary);
                }
                (format, None) => println!("{}", format.serialize(&reports)?),
            }

            if !summary.passed {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Lookup {
            file,
            context,
            source,
            comment,
            n,
        } => {
            let catalog = Catalog::load(&file)?;
            let translator = Translator::from_catalog(&catalog);
            if translator.lookup(&context, &source, &comment, n).is_none() {
                info!(%context, %source, "no usable translation, showing source");
            }
            println!("{}", translator.translate(&context, &source, &comment, n));
        }

        Commands::Stats { file } => {
            let catalog = Catalog::load(&file)?;
            println!("{}", file.display());
            ReportFormatter::new().print_stats(&checks::stats(&catalog));
        }

        Commands::Export {
            file,
            format,
            output,
        } => {
            let catalog = Catalog::load(&file)?;
            let table = Translator::from_catalog(&catalog).export();
            let content = match format {
                ExportFormat::Json => serde_json::to_string_pretty(&table)?,
                ExportFormat::Yaml => serde_yaml::to_string(&table)?,
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Table saved to: {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Roundtrip { file, write } => {
            let catalog = Catalog::load(&file)?;
            let result = catalog::round_trip(&catalog)?;
            println!(
                "{}: {} message(s), {} lost, {} gained",
                file.display(),
                result.triples,
                result.lost.len(),
                result.gained.len()
            );
            for triple in &result.lost {
                println!("  - {} / {:?}", triple.context, triple.source);
            }
            for triple in &result.gained {
                println!("  + {} / {:?}", triple.context, triple.source);
            }
            if let Some(path) = write {
                std::fs::write(&path, &result.xml)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Catalog written to: {}", path.display());
            }
            if !result.is_lossless() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Diff {
            base,
            compare,
            json,
        } => {
            let before = Catalog::load(&base)?;
            let after = Catalog::load(&compare)?;
            let diff = CatalogDiff::compute(&before, &after);
            if json {
                println!("{}", serde_json::to_string_pretty(&diff)?);
            } else {
                println!(
                    "{}",
                    report::format_diff(
                        &diff,
                        &base.display().to_string(),
                        &compare.display().to_string()
                    )
                );
            }
        }

        Commands::Sweep {
            directory,
            output,
            findings_only,
            min_findings,
            sarif,
            config,
        } => {
            let sweep_config = SweepConfig {
                directory,
                findings_only,
                min_findings,
                checks: Config::load(config.as_deref())?,
            };
            let sweep_report = sweep::run(&sweep_config)?;
            sweep::print_summary(&sweep_report, false);

            if let Some(output_path) = output {
                if sarif {
                    report::save_report(
                        &sweep_report.catalog_reports(),
                        ReportOutputFormat::Sarif,
                        &output_path,
                    )?;
                } else {
                    sweep::write_report(&sweep_report, &output_path)?;
                }
                println!("Sweep report saved to: {}", output_path.display());
            }

            ReportFormatter::new().print_summary(&sweep_report.verdict);
            if !sweep_report.verdict.passed {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
