//! ASCII bar chart for terminal output.
//!
//! This is intentionally "dumb" (one fixed-width bar per row), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Bars are drawn in table order; the bar glyph encodes the row status:
//! `#` ok, `!` shortage, `+` excess, `?` indeterminate.

use crate::domain::{Locale, RowStatus, StockTable};
use crate::report::truncate;

/// Labels longer than this are truncated.
const MAX_LABEL_WIDTH: usize = 16;

/// Render current quantity per ingredient as horizontal bars.
///
/// `width` is the length of the longest bar in columns.
pub fn render_bar_chart(table: &StockTable, statuses: &[RowStatus], width: usize, locale: Locale) -> String {
    let width = width.max(5);

    let labels: Vec<String> = table
        .records()
        .map(|r| truncate(&r.ingredient, MAX_LABEL_WIDTH))
        .collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let max_qty = quantity_max(table).unwrap_or(0.0);

    let mut out = String::new();
    out.push_str(&locale.chart_header(max_qty));
    out.push('\n');

    for (i, (label, record)) in labels.iter().zip(table.records()).enumerate() {
        let status = statuses.get(i).copied().unwrap_or(RowStatus::Normal);
        let len = bar_len(record.current_quantity, max_qty, width);
        let bar: String = std::iter::repeat_n(glyph(status), len).collect();
        let line = format!(
            "{label:<label_width$} |{bar:<width$} {}",
            record.current_quantity
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(locale.chart_legend());
    out.push('\n');
    out
}

fn glyph(status: RowStatus) -> char {
    match status {
        RowStatus::Normal => '#',
        RowStatus::Shortage { .. } => '!',
        RowStatus::Excess => '+',
        RowStatus::Indeterminate => '?',
    }
}

fn quantity_max(table: &StockTable) -> Option<f64> {
    let max = table
        .records()
        .map(|r| r.current_quantity)
        .filter(|q| q.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    (max.is_finite() && max > 0.0).then_some(max)
}

/// Bar length in columns; non-positive or non-finite quantities get no bar.
fn bar_len(qty: f64, max: f64, width: usize) -> usize {
    if !(qty.is_finite() && qty > 0.0 && max > 0.0) {
        return 0;
    }
    let u = (qty / max).clamp(0.0, 1.0);
    (u * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassifierConfig, StockRecord};
    use crate::forecast::statuses;

    #[test]
    fn bar_chart_golden_snapshot_small() {
        let mut table = StockTable::new(&Locale::En.schema());
        table.append(StockRecord::new("flour", 10.0, 5.0, 4.0));
        table.append(StockRecord::new("milk", 100.0, 2.5, 30.0));
        table.append(StockRecord::new("salt", 3.0, 1.0, 10.0));
        table.append(StockRecord::new("oil", 50.0, 1.0, 20.0));

        let st = statuses(&table, &ClassifierConfig::default());
        let txt = render_bar_chart(&table, &st, 10, Locale::En);
        let expected = concat!(
            "Plot: current quantity per ingredient | max=100\n",
            "flour |!          10\n",
            "milk  |++++++++++ 100\n",
            "salt  |           3\n",
            "oil   |#####      50\n",
            "legend: # ok  ! shortage  + excess  ? indeterminate\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_and_negative_quantities_have_no_bar() {
        let mut table = StockTable::new(&Locale::En.schema());
        table.append(StockRecord::new("ghost", -4.0, 1.0, 1.0));

        let st = statuses(&table, &ClassifierConfig::default());
        let txt = render_bar_chart(&table, &st, 10, Locale::En);
        assert!(txt.starts_with("Plot: current quantity per ingredient | max=0\n"));
        assert!(txt.contains("ghost |           -4\n"));
    }

    #[test]
    fn header_and_legend_follow_locale() {
        let mut table = StockTable::new(&Locale::Pt.schema());
        table.append(StockRecord::new("sal", 8.0, 1.0, 1.0));

        let st = statuses(&table, &ClassifierConfig::default());
        let txt = render_bar_chart(&table, &st, 5, Locale::Pt);
        assert_eq!(
            txt,
            "Gráfico: quantidade atual por ingrediente | máx=8\nsal |+++++ 8\nlegenda: # ok  ! falta  + excesso  ? indeterminado\n"
        );
    }
}
