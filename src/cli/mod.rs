//! Command-line parsing for the stock dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! loading, classification, and rendering.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{Locale, ZeroConsumptionPolicy};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "stock", version, about = "Ingredient stock dashboard with restock and overstock alerts")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print restock/overstock alerts for a stock sheet.
    Alerts(AlertsArgs),
    /// Print alerts, the stock table, and a bar chart of current quantities.
    Show(ShowArgs),
    /// Append one ingredient row and write the result as a CSV report.
    Add(AddArgs),
    /// Write a stock sheet (CSV or XLSX) out as a CSV report.
    Export(ExportArgs),
    /// Launch the interactive dashboard.
    Tui(TuiArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Column names and message language.
    #[arg(long, value_enum, env = "STOCK_LOCALE", default_value_t = Locale::En, global = true)]
    pub locale: Locale,

    /// How rows with zero average daily consumption are reported.
    #[arg(
        long,
        value_enum,
        env = "STOCK_ZERO_CONSUMPTION",
        default_value_t = ZeroConsumptionPolicy::Indeterminate,
        global = true
    )]
    pub zero_consumption: ZeroConsumptionPolicy,

    /// A row is short when its runway is at most this many days.
    #[arg(long, default_value_t = 2.0, global = true)]
    pub shortage_days: f64,

    /// A row is overstocked when its quantity exceeds the minimum threshold times this factor.
    #[arg(long, default_value_t = 3.0, global = true)]
    pub excess_factor: f64,

    /// Default report path for `add`, `export`, and the dashboard.
    #[arg(long, value_name = "CSV", env = "STOCK_REPORT_PATH", global = true)]
    pub report: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// The stock sheet to load.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Stock sheet (.csv or .xlsx).
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct AlertsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print alerts as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Skip the bar chart.
    #[arg(long)]
    pub no_chart: bool,

    /// Length of the longest chart bar (columns).
    #[arg(long, default_value_t = 50)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct AddArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Ingredient name (an existing name adds a second row, it does not replace).
    #[arg(long)]
    pub ingredient: String,

    /// Current quantity.
    #[arg(long, value_parser = parse_non_negative)]
    pub quantity: f64,

    /// Average daily consumption.
    #[arg(long, value_parser = parse_non_negative)]
    pub consumption: f64,

    /// Minimum threshold.
    #[arg(long, value_parser = parse_non_negative)]
    pub threshold: f64,

    /// Output CSV (defaults to the report path).
    #[arg(short = 'o', long = "out", value_name = "CSV")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output CSV (defaults to the report path).
    #[arg(short = 'o', long = "out", value_name = "CSV")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Stock sheet to open; without it, pick one from the current directory.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Form guard mirroring the dashboard's `>= 0` inputs.
pub fn parse_non_negative(s: &str) -> Result<f64, String> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("'{s}' must be a finite number >= 0"));
    }
    Ok(v)
}
