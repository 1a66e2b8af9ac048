use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use manifest_audit::config::AuditConfig;
use manifest_audit::error::log_manifest_error;
use manifest_audit::manifest::{Manifest, DEFAULT_MANIFEST_PATH};
use manifest_audit::runner::RunSummary;
use tracing::level_filters::LevelFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("manifest-audit error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "manifest-audit",
    about = "Validate a package.json manifest and report each check"
)]
struct Cli {
    /// Manifest to audit.
    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    manifest: PathBuf,
    /// Audit configuration; defaults to manifest-audit.json when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only run checks whose name contains this text.
    #[arg(long)]
    filter: Option<String>,
    /// Output format for the run report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,
    /// List check names without running them.
    #[arg(long, default_value_t = false)]
    list: bool,
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Json,
    Table,
}

impl Cli {
    fn execute(self) -> Result<ExitCode> {
        init_logging(self.verbose);

        let config = match &self.config {
            Some(path) => AuditConfig::load_strict(path)
                .with_context(|| format!("loading audit config {}", path.display()))?,
            None => AuditConfig::load(),
        };

        let manifest = Manifest::load(&self.manifest)
            .inspect_err(|err| log_manifest_error(err, "manifest-audit"))
            .with_context(|| format!("loading manifest {}", self.manifest.display()))?;

        let mut suite = manifest_audit::build_suite(Arc::new(manifest), &config);
        if let Some(filter) = &self.filter {
            suite.retain_matching(filter);
            if suite.is_empty() {
                bail!("no checks matched filter {filter:?}");
            }
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();

        if self.list {
            for case in suite.cases() {
                writeln!(out, "{}", case.label())?;
            }
            return Ok(ExitCode::SUCCESS);
        }

        let summary = match self.format {
            ReportFormat::Table => {
                let summary = suite.run(&mut out).context("writing check results")?;
                summary.print_table(&mut out)?;
                summary
            }
            ReportFormat::Json => {
                let summary = suite.run_quiet();
                summary.print_json(&mut out)?;
                summary
            }
        };
        out.flush()?;
        report_outcome(&summary);
        Ok(ExitCode::from(summary.exit_code()))
    }
}

fn report_outcome(summary: &RunSummary) {
    if summary.success() {
        tracing::info!(total = summary.total(), "all checks passed");
    } else {
        tracing::warn!(
            failed = summary.failed,
            total = summary.total(),
            "manifest audit failed"
        );
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}
