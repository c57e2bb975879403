//! Regime model CLI tool.
//!
//! Reads a factor table and a returns table, runs the expanding PCA regime
//! model and the HY/IG switching backtest, and writes the export tables.
//!
//! Usage: `cargo run --features cli --bin quadrant -- --factors F.csv --returns R.csv`

use std::{
    fs::{self, File},
    io::Cursor,
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, ValueEnum};
use polars::prelude::*;
use quadrant::{
    Pipeline, PipelineConfig, PipelineOutput, PipelineSummary,
    model::regimes_to_dataframe,
    primitives::Date,
    utils::{ContentCache, IngestConfig, UtilsError, returns_table_from_frame},
};
use serde::Serialize;
use tracing::{Level, info};

/// Number of contributors listed per component.
const TOP_CONTRIBUTORS: usize = 5;

#[derive(Parser)]
#[command(name = "quadrant")]
#[command(about = "Expanding PCA macro regimes and an HY/IG switching backtest", long_about = None)]
#[command(version)]
struct Cli {
    /// Factor table CSV (date column plus one column per variable)
    #[arg(long)]
    factors: PathBuf,

    /// Returns CSV with HY, IG and EMBI columns
    #[arg(long)]
    returns: PathBuf,

    /// Treat factors as raw levels and standardize with expanding z-scores
    /// over at least this many months
    #[arg(long, value_name = "MONTHS")]
    min_periods: Option<usize>,

    /// Directory to write the export tables to
    #[arg(long)]
    out: Option<PathBuf>,

    /// Summary format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let factor_bytes = fs::read(&cli.factors)?;
    let return_bytes = fs::read(&cli.returns)?;

    let mut config = PipelineConfig::default();
    if let Some(min_periods) = cli.min_periods {
        config.ingest = IngestConfig { min_periods_for_zscore: min_periods };
    }
    let pipeline = Pipeline::with_config(config);
    let raw = cli.min_periods.is_some();

    let cache = ContentCache::new();
    let (key, output) =
        pipeline.run_cached(&cache, &[factor_bytes.as_slice(), return_bytes.as_slice()], |p| {
            let factors = p.factors_from_frame(&read_csv(&factor_bytes)?, raw)?;
            let returns = returns_table_from_frame(&read_csv(&return_bytes)?)?;
            Ok((factors, returns))
        })?;
    info!(key = %key, "inputs loaded");

    if let Some(dir) = &cli.out {
        write_exports(dir, &output)?;
        info!(dir = %dir.display(), "wrote export tables");
    }

    let summary = output.summary(TOP_CONTRIBUTORS);
    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        Format::Text => print_summary(&summary),
    }
    Ok(())
}

fn read_csv(bytes: &[u8]) -> Result<DataFrame, UtilsError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(df)
}

#[derive(Serialize)]
struct LoadingRow<'a> {
    #[serde(rename = "Date")]
    date: Date,
    #[serde(rename = "Variable")]
    variable: &'a str,
    #[serde(rename = "PC1")]
    pc1: f64,
    #[serde(rename = "PC2")]
    pc2: f64,
}

fn write_exports(dir: &Path, output: &PipelineOutput) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    write_rows(&dir.join("labels.csv"), output.basic_labels())?;
    write_rows(&dir.join("labels_and_strategy.csv"), output.strategy_labels())?;
    write_rows(&dir.join("avg_by_regime.csv"), output.averages_by_regime())?;
    write_rows(&dir.join("avg_by_risk.csv"), output.averages_by_risk())?;
    write_rows(&dir.join("regime_segments.csv"), output.segments.iter())?;
    write_rows(&dir.join("calendar_returns.csv"), output.calendar.iter())?;
    write_rows(
        &dir.join("loadings_timeline.csv"),
        output.timeline.iter().flat_map(|(date, l)| {
            l.variables.iter().enumerate().map(move |(j, variable)| LoadingRow {
                date: *date,
                variable,
                pc1: l.pc1[j],
                pc2: l.pc2[j],
            })
        }),
    )?;

    write_frame(&dir.join("pcs.csv"), &mut output.series.to_dataframe()?)?;
    write_frame(&dir.join("regimes.csv"), &mut regimes_to_dataframe(&output.regimes)?)?;
    write_frame(&dir.join("backtest.csv"), &mut output.backtest.to_dataframe()?)?;
    Ok(())
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_frame(path: &Path, df: &mut DataFrame) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v * 100.0))
}

fn print_summary(s: &PipelineSummary) {
    println!("\n{}", "=".repeat(60));
    println!("QUADRANT REGIME SUMMARY");
    println!("{}", "=".repeat(60));

    match (s.as_of, s.regime) {
        (Some(date), Some(regime)) => {
            let risk = if regime.is_risk_on() { "risk-on" } else { "risk-off" };
            println!("Regime as of {date}: {regime} ({risk})");
        }
        _ => println!("Regime: undefined (insufficient history)"),
    }
    println!("Explained variance: PC1 {}, PC2 {}", fmt_opt(s.pc1_evr), fmt_opt(s.pc2_evr));
    println!("Regime runs: {}", s.regime_runs);

    if let (Some(first), Some(last)) = (s.first_date, s.last_date) {
        println!("\nBacktest {first} to {last} ({} periods)", s.periods);
    }
    println!("{:<24} {:>12} {:>12}", "", "Strategy", "EMBI");
    println!(
        "{:<24} {:>11.2}% {:>11.2}%",
        "Total return",
        s.total_strategy_return * 100.0,
        s.total_benchmark_return * 100.0
    );
    println!(
        "{:<24} {:>11.2}% {:>11.2}%",
        "Annualized return",
        s.annualized_strategy * 100.0,
        s.annualized_benchmark * 100.0
    );
    println!(
        "{:<24} {:>11.2}% {:>11.2}%",
        "Max drawdown",
        s.max_drawdown_strategy * 100.0,
        s.max_drawdown_benchmark * 100.0
    );
    println!("{:<24} {:>11.2}%", "Tracking error", s.tracking_error * 100.0);
    println!("{:<24} {:>12.2}", "Information ratio", s.information_ratio);

    for (label, top) in [("PC1", &s.top_pc1), ("PC2", &s.top_pc2)] {
        if top.is_empty() {
            continue;
        }
        println!("\nTop {label} contributors:");
        for (variable, value) in top {
            println!("  {variable:<28} {value:>+8.3}");
        }
    }
    println!();
}
