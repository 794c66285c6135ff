//! Formatted terminal output: alerts, the stock table, and a run summary.
//!
//! We keep formatting code in one place so:
//! - the classifier stays free of presentation concerns
//! - output changes are localized (golden tests below)

use std::path::Path;

use crate::domain::{Alert, AlertKind, Locale, RowStatus, StockTable};
use crate::forecast::{AlertCounts, days_remaining};

/// Widest a single table cell may render before it is truncated.
const MAX_CELL_WIDTH: usize = 28;

/// One alert per line, or the locale's "no alerts" line.
pub fn format_alerts(alerts: &[Alert], locale: Locale) -> String {
    if alerts.is_empty() {
        return format!("{}\n", locale.no_alerts());
    }
    let mut out = String::new();
    for alert in alerts {
        out.push_str(&alert.message);
        out.push('\n');
    }
    out
}

/// Short header: source file, row count, and alert totals.
pub fn format_summary(source: &Path, table: &StockTable, counts: &AlertCounts, locale: Locale) -> String {
    format!(
        "=== stock - {} ===\n{}: {} | {}: {}\n{}: {} ({}={} {}={} {}={})\n",
        source.display(),
        locale.rows_label(),
        table.len(),
        locale.columns_label(),
        table.columns().len(),
        locale.alerts_label(),
        counts.total(),
        locale.kind_label(AlertKind::Shortage),
        counts.shortage,
        locale.kind_label(AlertKind::Excess),
        counts.excess,
        locale.kind_label(AlertKind::Indeterminate),
        counts.indeterminate,
    )
}

/// Render every column of the table plus `days` and `status` columns.
///
/// `statuses` is expected to be aligned with the table rows.
pub fn format_table(table: &StockTable, statuses: &[RowStatus], locale: Locale) -> String {
    let layout = table.layout();
    let n_cols = table.columns().len();

    let mut header: Vec<String> = table.columns().iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect();
    header.push(locale.days_label().to_string());
    header.push(locale.status_label().to_string());

    // Numeric columns are right-aligned.
    let mut right_aligned: Vec<bool> = (0..n_cols)
        .map(|idx| {
            idx == layout.current_quantity
                || idx == layout.average_daily_consumption
                || idx == layout.minimum_threshold
        })
        .collect();
    right_aligned.push(true);
    right_aligned.push(false);

    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells: Vec<String> = table
                .fields(row)
                .iter()
                .map(|c| truncate(c, MAX_CELL_WIDTH))
                .collect();
            let days = days_remaining(&row.record)
                .map(|d| format!("{d:.1}"))
                .unwrap_or_else(|| "-".to_string());
            let status = statuses.get(i).copied().unwrap_or(RowStatus::Normal);
            cells.push(days);
            cells.push(locale.status_text(status).to_string());
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths, &right_aligned);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths, &right_aligned);
    for cells in &body {
        push_line(&mut out, cells, &widths, &right_aligned);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], right_aligned: &[bool]) {
    let parts: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(right_aligned)
        .map(|((cell, &w), &right)| {
            if right {
                format!("{cell:>w$}")
            } else {
                format!("{cell:<w$}")
            }
        })
        .collect();
    out.push_str(parts.join("  ").trim_end());
    out.push('\n');
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
