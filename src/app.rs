//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - resolves the dashboard configuration
//! - dispatches to the CLI printers or the TUI

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{AddArgs, AlertsArgs, Command, ExportArgs, GlobalArgs, ShowArgs, TuiArgs};
use crate::domain::{ClassifierConfig, DashboardConfig, StockRecord, Thresholds};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `stock` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` feeds the clap `env` fallbacks, so it must be loaded before parsing.
    dotenvy::dotenv().ok();

    // We want `stock` and `stock --locale pt` to behave like `stock tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let is_tui = matches!(cli.command, Command::Tui(_));
    crate::logging::init_tracing(cli.global.verbose, is_tui);

    let config = dashboard_config_from_args(&cli.global)?;
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Command::Alerts(args) => handle_alerts(args, &config),
        Command::Show(args) => handle_show(args, &config),
        Command::Add(args) => handle_add(args, &config),
        Command::Export(args) => handle_export(args, &config),
        Command::Tui(args) => handle_tui(args, config),
    }
}

/// Resolve global flags (and their env fallbacks) into a `DashboardConfig`.
pub fn dashboard_config_from_args(args: &GlobalArgs) -> Result<DashboardConfig, AppError> {
    if !args.shortage_days.is_finite() {
        return Err(AppError::new(2, "`--shortage-days` must be a finite number."));
    }
    if !(args.excess_factor.is_finite() && args.excess_factor >= 0.0) {
        return Err(AppError::new(2, "`--excess-factor` must be a finite number >= 0."));
    }

    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.locale.default_report_path()));

    Ok(DashboardConfig {
        input: None,
        classifier: ClassifierConfig {
            locale: args.locale,
            thresholds: Thresholds {
                shortage_days: args.shortage_days,
                excess_factor: args.excess_factor,
            },
            zero_consumption: args.zero_consumption,
        },
        report_path,
    })
}

fn handle_alerts(args: AlertsArgs, config: &DashboardConfig) -> Result<(), AppError> {
    let run = pipeline::load_and_classify(&args.input.file, config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.alerts)
            .map_err(|e| AppError::new(2, format!("Failed to encode alerts as JSON: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_alerts(&run.alerts, config.locale()));
    }
    Ok(())
}

fn handle_show(args: ShowArgs, config: &DashboardConfig) -> Result<(), AppError> {
    let run = pipeline::load_and_classify(&args.input.file, config)?;

    print!("{}", crate::report::format_summary(&run.source, &run.table, &run.counts, config.locale()));
    println!(
        "{}: {}",
        config.locale().generated_label(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    print!("{}", crate::report::format_alerts(&run.alerts, config.locale()));
    println!();
    print!("{}", crate::report::format_table(&run.table, &run.statuses, config.locale()));

    if !args.no_chart {
        println!();
        print!(
            "{}",
            crate::plot::render_bar_chart(&run.table, &run.statuses, args.width, config.locale())
        );
    }
    Ok(())
}

fn handle_add(args: AddArgs, config: &DashboardConfig) -> Result<(), AppError> {
    let mut run = pipeline::load_and_classify(&args.input.file, config)?;

    let record = StockRecord::new(
        args.ingredient.trim(),
        args.quantity,
        args.consumption,
        args.threshold,
    );
    let name = record.ingredient.clone();
    run.append(record, &config.classifier);

    let out = args.out.unwrap_or_else(|| config.report_path.clone());
    write_report(&out, &run.table)?;

    println!("{}", config.locale().saved_message(&name));
    println!("{}", config.locale().report_saved_message(&out));
    Ok(())
}

fn handle_export(args: ExportArgs, config: &DashboardConfig) -> Result<(), AppError> {
    let run = pipeline::load_and_classify(&args.input.file, config)?;

    let out = args.out.unwrap_or_else(|| config.report_path.clone());
    write_report(&out, &run.table)?;

    println!("{}", config.locale().report_saved_message(&out));
    Ok(())
}

fn handle_tui(args: TuiArgs, mut config: DashboardConfig) -> Result<(), AppError> {
    let path = match args.file {
        Some(path) => crate::cli::picker::validate_stock_path(&path)?,
        None => crate::cli::picker::prompt_for_stock_path()?,
    };
    config.input = Some(path);
    crate::tui::run(config)
}

fn write_report(path: &Path, table: &crate::domain::StockTable) -> Result<(), AppError> {
    crate::io::export::write_table_csv(path, table)
}

/// Rewrite argv so `stock` defaults to `stock tui`.
///
/// Rules:
/// - `stock`                      -> `stock tui`
/// - `stock --locale pt ...`      -> `stock tui --locale pt ...`
/// - `stock --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "alerts" | "show" | "add" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::domain::{Locale, ZeroConsumptionPolicy};

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["stock"])), args(&["stock", "tui"]));
        assert_eq!(
            rewrite_args(args(&["stock", "-f", "a.csv"])),
            args(&["stock", "tui", "-f", "a.csv"])
        );
        assert_eq!(rewrite_args(args(&["stock", "--help"])), args(&["stock", "--help"]));
        assert_eq!(
            rewrite_args(args(&["stock", "show", "-f", "a.csv"])),
            args(&["stock", "show", "-f", "a.csv"])
        );
    }

    #[test]
    fn config_defaults_follow_locale() {
        let cli = Cli::try_parse_from([
            "stock",
            "export",
            "-f",
            "a.csv",
            "--locale",
            "pt",
            "--zero-consumption",
            "unbounded",
        ])
        .unwrap();
        let config = dashboard_config_from_args(&cli.global).unwrap();
        assert_eq!(config.locale(), Locale::Pt);
        assert_eq!(config.classifier.zero_consumption, ZeroConsumptionPolicy::Unbounded);
        assert_eq!(config.classifier.thresholds, Thresholds::default());
        assert_eq!(config.report_path, PathBuf::from("relatorio_estoque.csv"));
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let cli = Cli::try_parse_from(["stock", "alerts", "-f", "a.csv", "--excess-factor=-1"]).unwrap();
        let err = dashboard_config_from_args(&cli.global).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn add_then_export_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stock.csv");
        let out = dir.path().join("report.csv");
        std::fs::write(
            &input,
            "ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,10,5,4\n",
        )
        .unwrap();

        let config = DashboardConfig {
            input: None,
            classifier: ClassifierConfig::default(),
            report_path: dir.path().join("default.csv"),
        };
        let add = AddArgs {
            input: crate::cli::InputArgs { file: input.clone() },
            ingredient: " flour ".to_string(),
            quantity: 3.0,
            consumption: 1.0,
            threshold: 4.0,
            out: Some(out.clone()),
        };
        handle_add(add, &config).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            written,
            "ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,10,5,4\nflour,3,1,4\n"
        );

        let export = ExportArgs {
            input: crate::cli::InputArgs { file: out.clone() },
            out: None,
        };
        handle_export(export, &config).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("default.csv")).unwrap(), written);
    }
}
