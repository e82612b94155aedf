//! Command-line front end: read an export, aggregate it, write a TSV report.

use std::{
    fs::{self, File},
    io::{self, BufWriter, IsTerminal},
    path::{Path, PathBuf},
};

use chrono::Datelike;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::{info, warn};

use crate::{
    config::{CenterNames, ReportConfig},
    errors::{HuvudbokError, Result},
    ledger::aggregate,
    report::{render_flat, render_sectioned, Report},
    utils::build_info,
};

/// Text encoding of the export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    /// ISO-8859-1, as written by older Fortnox exports.
    Latin1,
    Utf8,
}

#[derive(Debug, Parser)]
#[command(
    name = "huvudbok",
    version,
    long_version = build_info::long_version(),
    about = "Sum a Fortnox huvudbok export per account and cost center"
)]
pub struct Cli {
    /// Tab-separated huvudbok export.
    #[arg(required_unless_present = "dump_config")]
    pub input: Option<PathBuf>,

    /// Only transactions dated in this year are counted. Defaults to the current year.
    #[arg(short, long)]
    pub year: Option<String>,

    /// Write the sectioned report with spreadsheet formulas.
    #[arg(short, long)]
    pub fancy: bool,

    /// JSON object mapping cost-center codes to display names.
    #[arg(short, long, value_name = "FILE")]
    pub projects: Option<PathBuf>,

    /// Report configuration (sections, merge tables, column layout).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to `<input>_crunched.tsv` or `<input>_crunched_fancy.tsv`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Encoding::Latin1)]
    pub encoding: Encoding,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub rows_written: usize,
    pub accounts: usize,
    pub cost_centers: usize,
}

/// Parses the process arguments and runs the tool.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    if cli.dump_config {
        let config = ReportConfig::resolve(cli.config.as_deref())?;
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let summary = run(&cli)?;
    print_summary(&summary);
    Ok(())
}

/// Runs one conversion described by `cli`.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let input = cli.input.as_deref().ok_or_else(|| {
        HuvudbokError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input file given",
        ))
    })?;
    let year = cli
        .year
        .clone()
        .unwrap_or_else(|| chrono::Local::now().year().to_string());

    // Configuration problems surface before the export is read.
    let config = ReportConfig::resolve(cli.config.as_deref())?;
    let merges = config.merge_table(&year)?;
    let plan = if cli.fancy {
        Some(config.section_plan()?)
    } else {
        None
    };
    let names = load_center_names(cli.projects.as_deref())?;

    let text = read_export(input, cli.encoding)?;
    let mut ledger = aggregate(text.lines(), &year, &config.aggregate_options())?;
    if !merges.is_empty() {
        info!(year = %year, pairs = merges.len(), "applying account merges");
        ledger.apply_merges(&merges);
    }

    let report = match &plan {
        Some(plan) => render_sectioned(&ledger, &names, plan, &config.sectioned_options())?,
        None => render_flat(&ledger, &names),
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input, cli.fancy));
    write_report(&report, &output)?;
    info!(path = %output.display(), rows = report.last_row(), "report written");

    Ok(RunSummary {
        output,
        rows_written: report.last_row(),
        accounts: ledger.account_count(),
        cost_centers: ledger.cost_centers().len(),
    })
}

fn load_center_names(path: Option<&Path>) -> Result<CenterNames> {
    let Some(path) = path else {
        return Ok(CenterNames::default());
    };
    match CenterNames::load(path) {
        Ok(names) => Ok(names),
        Err(err) if err.is_recoverable() => {
            warn!("{err}; cost centers are left unlabelled");
            Ok(CenterNames::default())
        }
        Err(err) => Err(err),
    }
}

/// Reads the export and decodes it to text.
pub fn read_export(path: &Path, encoding: Encoding) -> Result<String> {
    let bytes = fs::read(path)?;
    match encoding {
        // Every Latin-1 byte is the Unicode code point of the same value.
        Encoding::Latin1 => Ok(bytes.iter().map(|&byte| char::from(byte)).collect()),
        Encoding::Utf8 => String::from_utf8(bytes)
            .map_err(|err| HuvudbokError::Io(io::Error::new(io::ErrorKind::InvalidData, err))),
    }
}

/// `<dir>/<stem>_crunched.tsv`, or `_crunched_fancy.tsv` for the sectioned report.
pub fn default_output_path(input: &Path, fancy: bool) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "huvudbok".to_string());
    let suffix = if fancy { "_crunched_fancy" } else { "_crunched" };
    input.with_file_name(format!("{stem}{suffix}.tsv"))
}

fn write_report(report: &Report, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    report.write_tsv(BufWriter::new(file))?;
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    println!(
        "{} {} ({} accounts, {} cost centers, {} rows)",
        "Wrote".green().bold(),
        summary.output.display(),
        summary.accounts,
        summary.cost_centers,
        summary.rows_written
    );
}
