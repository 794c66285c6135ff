//! Shared domain types.
//!
//! These types are intentionally kept lightweight and free of I/O so they can be:
//!
//! - produced by the loader (CSV / XLSX)
//! - consumed by the classifier
//! - rendered by every front-end (CLI text, ASCII chart, TUI)

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Input file format.
///
/// Selected from the declared file extension, never by sniffing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if ext.eq_ignore_ascii_case("xlsx") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Language of the required column names and of every user-facing string.
///
/// `Pt` matches Portuguese-language spreadsheets (`ingrediente`, `quantidade_atual`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Pt,
}

impl Locale {
    pub fn schema(self) -> ColumnSchema {
        match self {
            Self::En => ColumnSchema::new(
                "ingredient",
                "current_quantity",
                "average_daily_consumption",
                "minimum_threshold",
            ),
            Self::Pt => ColumnSchema::new(
                "ingrediente",
                "quantidade_atual",
                "consumo_medio_diario",
                "limite_minimo",
            ),
        }
    }

    /// `days` is rendered with one decimal place.
    pub fn shortage_message(self, ingredient: &str, days: f64) -> String {
        match self {
            Self::En => format!("ALERT: {ingredient} needs restocking in {days:.1} days."),
            Self::Pt => format!("ALERTA: {ingredient} precisa ser reabastecido em {days:.1} dias."),
        }
    }

    pub fn excess_message(self, ingredient: &str) -> String {
        match self {
            Self::En => format!("EXCESS: {ingredient} is overstocked."),
            Self::Pt => format!("EXCESSO: {ingredient} está em excesso."),
        }
    }

    pub fn indeterminate_message(self, ingredient: &str) -> String {
        match self {
            Self::En => format!(
                "NOTICE: {ingredient} has no recorded daily consumption; runway is indeterminate."
            ),
            Self::Pt => format!(
                "AVISO: {ingredient} não tem consumo diário registrado; previsão indeterminada."
            ),
        }
    }

    pub fn no_alerts(self) -> &'static str {
        match self {
            Self::En => "No alerts at the moment.",
            Self::Pt => "Nenhum alerta no momento.",
        }
    }

    pub fn saved_message(self, ingredient: &str) -> String {
        match self {
            Self::En => format!("{ingredient} added/edited successfully!"),
            Self::Pt => format!("{ingredient} adicionado/editado com sucesso!"),
        }
    }

    pub fn report_saved_message(self, path: &Path) -> String {
        match self {
            Self::En => format!("Report saved as `{}`.", path.display()),
            Self::Pt => format!("Relatório salvo como `{}`.", path.display()),
        }
    }

    pub fn default_report_path(self) -> &'static str {
        match self {
            Self::En => "stock_report.csv",
            Self::Pt => "relatorio_estoque.csv",
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Self::En => "Current stock per ingredient",
            Self::Pt => "Estoque Atual por Ingrediente",
        }
    }

    pub fn quantity_label(self) -> &'static str {
        match self {
            Self::En => "Current quantity",
            Self::Pt => "Quantidade Atual",
        }
    }
}

/// Names of the four required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub ingredient: String,
    pub current_quantity: String,
    pub average_daily_consumption: String,
    pub minimum_threshold: String,
}

impl ColumnSchema {
    pub fn new(
        ingredient: impl Into<String>,
        current_quantity: impl Into<String>,
        average_daily_consumption: impl Into<String>,
        minimum_threshold: impl Into<String>,
    ) -> Self {
        Self {
            ingredient: ingredient.into(),
            current_quantity: current_quantity.into(),
            average_daily_consumption: average_daily_consumption.into(),
            minimum_threshold: minimum_threshold.into(),
        }
    }

    /// Required names in canonical order.
    pub fn names(&self) -> [&str; 4] {
        [
            &self.ingredient,
            &self.current_quantity,
            &self.average_daily_consumption,
            &self.minimum_threshold,
        ]
    }
}

/// One tracked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub ingredient: String,
    pub current_quantity: f64,
    pub average_daily_consumption: f64,
    pub minimum_threshold: f64,
}

impl StockRecord {
    pub fn new(
        ingredient: impl Into<String>,
        current_quantity: f64,
        average_daily_consumption: f64,
        minimum_threshold: f64,
    ) -> Self {
        Self {
            ingredient: ingredient.into(),
            current_quantity,
            average_daily_consumption,
            minimum_threshold,
        }
    }
}

/// Positions of the required columns inside `StockTable::columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub ingredient: usize,
    pub current_quantity: usize,
    pub average_daily_consumption: usize,
    pub minimum_threshold: usize,
}

impl ColumnLayout {
    fn is_required(&self, idx: usize) -> bool {
        idx == self.ingredient
            || idx == self.current_quantity
            || idx == self.average_daily_consumption
            || idx == self.minimum_threshold
    }
}

/// A table row: the typed record plus the raw text of every non-required column.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRow {
    pub record: StockRecord,
    /// One entry per extra column, in column order.
    pub extras: Vec<String>,
}

/// Ordered stock rows plus the full column list of the source file.
///
/// Row order is display, chart, and alert order.
#[derive(Debug, Clone, PartialEq)]
pub struct StockTable {
    columns: Vec<String>,
    layout: ColumnLayout,
    rows: Vec<StockRow>,
}

impl StockTable {
    /// Empty table with exactly the four required columns.
    pub fn new(schema: &ColumnSchema) -> Self {
        let columns = schema.names().into_iter().map(str::to_string).collect();
        Self {
            columns,
            layout: ColumnLayout {
                ingredient: 0,
                current_quantity: 1,
                average_daily_consumption: 2,
                minimum_threshold: 3,
            },
            rows: Vec::new(),
        }
    }

    /// Empty table over an arbitrary header.
    ///
    /// Returns the required names that are absent when the header does not cover
    /// the schema. If a name repeats, the first occurrence wins.
    pub fn with_columns(columns: Vec<String>, schema: &ColumnSchema) -> Result<Self, Vec<String>> {
        let names = schema.names();
        let positions = names.map(|name| columns.iter().position(|c| c == name));

        let [Some(ingredient), Some(current_quantity), Some(average_daily_consumption), Some(minimum_threshold)] =
            positions
        else {
            return Err(names
                .iter()
                .zip(positions)
                .filter(|(_, pos)| pos.is_none())
                .map(|(name, _)| name.to_string())
                .collect());
        };

        Ok(Self {
            columns,
            layout: ColumnLayout {
                ingredient,
                current_quantity,
                average_daily_consumption,
                minimum_threshold,
            },
            rows: Vec::new(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn rows(&self) -> &[StockRow] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &StockRecord> {
        self.rows.iter().map(|r| &r.record)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices of the columns that are not part of the required schema.
    pub fn extra_column_indices(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&idx| !self.layout.is_required(idx))
            .collect()
    }

    /// Append `record` as the last row.
    ///
    /// No upsert: an existing ingredient with the same name is left untouched and
    /// the new row is added after it. Extra columns are left blank.
    pub fn append(&mut self, record: StockRecord) {
        let extras = vec![String::new(); self.extra_column_indices().len()];
        self.rows.push(StockRow { record, extras });
    }

    /// Push a fully-formed row (used by the loader).
    ///
    /// `extras` is resized to the number of extra columns.
    pub fn push_row(&mut self, record: StockRecord, mut extras: Vec<String>) {
        extras.resize(self.extra_column_indices().len(), String::new());
        self.rows.push(StockRow { record, extras });
    }

    /// All fields of `row` as text, in column order.
    ///
    /// Required numeric fields use `f64`'s shortest round-trip form (`10`, `2.5`).
    pub fn fields(&self, row: &StockRow) -> Vec<String> {
        let mut extras = row.extras.iter();
        (0..self.columns.len())
            .map(|idx| {
                let l = &self.layout;
                if idx == l.ingredient {
                    row.record.ingredient.clone()
                } else if idx == l.current_quantity {
                    row.record.current_quantity.to_string()
                } else if idx == l.average_daily_consumption {
                    row.record.average_daily_consumption.to_string()
                } else if idx == l.minimum_threshold {
                    row.record.minimum_threshold.to_string()
                } else {
                    extras.next().cloned().unwrap_or_default()
                }
            })
            .collect()
    }
}

/// Thresholds used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// A row is a shortage when `days_remaining <= shortage_days`.
    pub shortage_days: f64,
    /// A row is in excess when `current_quantity > minimum_threshold * excess_factor`.
    pub excess_factor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            shortage_days: 2.0,
            excess_factor: 3.0,
        }
    }
}

/// What to do with rows whose average daily consumption is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ZeroConsumptionPolicy {
    /// Emit an `Indeterminate` alert and skip both threshold rules.
    #[default]
    Indeterminate,
    /// Emit nothing for the row.
    Skip,
    /// Treat the runway as unbounded: no shortage, but the excess rule still applies.
    Unbounded,
}

/// Classifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassifierConfig {
    pub locale: Locale,
    pub thresholds: Thresholds,
    pub zero_consumption: ZeroConsumptionPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Shortage,
    Excess,
    Indeterminate,
}

/// Classification of a single row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowStatus {
    Shortage { days_remaining: f64 },
    Excess,
    Indeterminate,
    Normal,
}

impl RowStatus {
    pub fn alert_kind(self) -> Option<AlertKind> {
        match self {
            Self::Shortage { .. } => Some(AlertKind::Shortage),
            Self::Excess => Some(AlertKind::Excess),
            Self::Indeterminate => Some(AlertKind::Indeterminate),
            Self::Normal => None,
        }
    }
}

/// A user-facing alert for one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// 0-based row index in the table.
    pub row: usize,
    pub ingredient: String,
    pub kind: AlertKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<f64>,
    pub message: String,
}

/// Resolved settings for a dashboard run (CLI or TUI).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub input: Option<PathBuf>,
    pub classifier: ClassifierConfig,
    pub report_path: PathBuf,
}

impl DashboardConfig {
    pub fn locale(&self) -> Locale {
        self.classifier.locale
    }

    pub fn schema(&self) -> ColumnSchema {
        self.classifier.locale.schema()
    }
}
