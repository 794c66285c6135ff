//! Restock forecast and alert classification.
//!
//! Each row is assessed on its own, in table order:
//!
//! 1. `days_remaining = current_quantity / average_daily_consumption`
//! 2. zero consumption is resolved by `ZeroConsumptionPolicy`
//! 3. `days_remaining <= shortage_days` -> Shortage
//! 4. else `current_quantity > minimum_threshold * excess_factor` -> Excess
//! 5. else Normal (no alert)
//!
//! The rules are exclusive; Shortage is always checked first.

use serde::Serialize;

use crate::domain::{
    Alert, AlertKind, ClassifierConfig, Locale, RowStatus, StockRecord, StockTable, Thresholds,
    ZeroConsumptionPolicy,
};

/// Runway in days, or `None` when it is undefined.
///
/// Zero consumption is undefined, and so is any quotient that is not finite
/// (e.g. `NaN` values appended through the form), so callers never have to
/// format `inf`/`NaN`.
pub fn days_remaining(record: &StockRecord) -> Option<f64> {
    if record.average_daily_consumption == 0.0 {
        return None;
    }
    let days = record.current_quantity / record.average_daily_consumption;
    days.is_finite().then_some(days)
}

/// Classify a single record.
pub fn assess(record: &StockRecord, config: &ClassifierConfig) -> RowStatus {
    let thresholds = config.thresholds;
    match days_remaining(record) {
        Some(days) if days <= thresholds.shortage_days => RowStatus::Shortage { days_remaining: days },
        Some(_) => excess_or_normal(record, thresholds),
        None => match config.zero_consumption {
            ZeroConsumptionPolicy::Indeterminate => RowStatus::Indeterminate,
            ZeroConsumptionPolicy::Skip => RowStatus::Normal,
            ZeroConsumptionPolicy::Unbounded => excess_or_normal(record, thresholds),
        },
    }
}

fn excess_or_normal(record: &StockRecord, thresholds: Thresholds) -> RowStatus {
    if record.current_quantity > record.minimum_threshold * thresholds.excess_factor {
        RowStatus::Excess
    } else {
        RowStatus::Normal
    }
}

/// Status of every row, in table order.
pub fn statuses(table: &StockTable, config: &ClassifierConfig) -> Vec<RowStatus> {
    table.records().map(|r| assess(r, config)).collect()
}

/// Alerts for every row that crosses a threshold, in table order.
///
/// Normal rows are omitted, so the output is never longer than the table.
pub fn classify(table: &StockTable, config: &ClassifierConfig) -> Vec<Alert> {
    let alerts: Vec<Alert> = table
        .records()
        .enumerate()
        .filter_map(|(row, record)| to_alert(row, record, assess(record, config), config.locale))
        .collect();

    tracing::debug!(rows = table.len(), alerts = alerts.len(), "classified stock table");
    alerts
}

/// Build the user-facing alert for an assessed row.
pub fn to_alert(row: usize, record: &StockRecord, status: RowStatus, locale: Locale) -> Option<Alert> {
    let ingredient = record.ingredient.as_str();
    let (kind, days_remaining, message) = match status {
        RowStatus::Shortage { days_remaining } => (
            AlertKind::Shortage,
            Some(days_remaining),
            locale.shortage_message(ingredient, days_remaining),
        ),
        RowStatus::Excess => (AlertKind::Excess, None, locale.excess_message(ingredient)),
        RowStatus::Indeterminate => (
            AlertKind::Indeterminate,
            None,
            locale.indeterminate_message(ingredient),
        ),
        RowStatus::Normal => return None,
    };

    Some(Alert {
        row,
        ingredient: ingredient.to_string(),
        kind,
        days_remaining,
        message,
    })
}

/// Alert totals by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub shortage: usize,
    pub excess: usize,
    pub indeterminate: usize,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut counts = Self::default();
        for alert in alerts {
            match alert.kind {
                AlertKind::Shortage => counts.shortage += 1,
                AlertKind::Excess => counts.excess += 1,
                AlertKind::Indeterminate => counts.indeterminate += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.shortage + self.excess + self.indeterminate
    }
}
