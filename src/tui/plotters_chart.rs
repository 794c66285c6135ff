//! Plotters-powered stock bar chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{Locale, RowStatus};

/// One bar per table row, in table order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub quantity: f64,
    pub status: RowStatus,
}

/// A render-only bar chart description.
///
/// Bars and bounds are computed outside the render call (see `chart_bars`).
pub struct StockBarChart<'a> {
    pub bars: &'a [Bar],
    /// Upper y bound; the lower bound is always zero.
    pub y_max: f64,
    pub y_label: &'a str,
    /// Language of the fallback hints.
    pub locale: Locale,
}

impl<'a> Widget for StockBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                self.locale.chart_too_small(),
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.bars.is_empty() || !(self.y_max.is_finite() && self.y_max > 0.0) {
            buf.set_string(
                area.x,
                area.y,
                self.locale.nothing_to_plot(),
                Style::default().fg(Color::Gray),
            );
            return;
        }

        let x1 = self.bars.len() as f64;
        let y1 = self.y_max;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(0.0..x1, 0.0..y1)?;

            // Ingredient names live in the table next to the chart; x labels
            // would only be row indices.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(5)
                .y_desc(self.y_label)
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(self.bars.iter().enumerate().filter_map(|(i, bar)| {
                if !(bar.quantity.is_finite() && bar.quantity > 0.0) {
                    return None;
                }
                let left = i as f64 + 0.15;
                let right = i as f64 + 0.85;
                let top = bar.quantity.min(y1);
                Some(Rectangle::new(
                    [(left, 0.0), (right, top)],
                    bar_color(bar.status).filled(),
                ))
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Bar colour per row status.
pub fn bar_color(status: RowStatus) -> RGBColor {
    match status {
        RowStatus::Shortage { .. } => RGBColor(255, 0, 0),
        RowStatus::Excess => RGBColor(255, 215, 0),
        RowStatus::Indeterminate => RGBColor(128, 128, 128),
        RowStatus::Normal => RGBColor(135, 206, 235),
    }
}

/// Build bars and the y bound (5% headroom) from quantities and statuses.
pub fn chart_bars<I>(quantities: I, statuses: &[RowStatus]) -> (Vec<Bar>, f64)
where
    I: IntoIterator<Item = f64>,
{
    let bars: Vec<Bar> = quantities
        .into_iter()
        .enumerate()
        .map(|(i, quantity)| Bar {
            quantity,
            status: statuses.get(i).copied().unwrap_or(RowStatus::Normal),
        })
        .collect();

    let max = bars
        .iter()
        .map(|b| b.quantity)
        .filter(|q| q.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if max > 0.0 { max * 1.05 } else { 1.0 };

    (bars, y_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_keep_table_order_and_pad_the_bound() {
        let statuses = [RowStatus::Excess, RowStatus::Shortage { days_remaining: 1.0 }];
        let (bars, y_max) = chart_bars([200.0, 10.0, f64::NAN], &statuses);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].status, RowStatus::Excess);
        assert_eq!(bars[2].status, RowStatus::Normal);
        assert!((y_max - 210.0).abs() < 1e-9);
    }

    #[test]
    fn empty_chart_has_unit_bound() {
        let (bars, y_max) = chart_bars(Vec::new(), &[]);
        assert!(bars.is_empty());
        assert_eq!(y_max, 1.0);
    }

    #[test]
    fn status_colours() {
        assert_eq!(bar_color(RowStatus::Shortage { days_remaining: 0.5 }), RGBColor(255, 0, 0));
        assert_eq!(bar_color(RowStatus::Normal), RGBColor(135, 206, 235));
    }

    #[test]
    fn small_area_renders_hint() {
        let bars = [Bar { quantity: 1.0, status: RowStatus::Normal }];
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        StockBarChart { bars: &bars, y_max: 1.0, y_label: "qty", locale: Locale::En }
            .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }

    #[test]
    fn empty_chart_hint_is_localized() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        StockBarChart { bars: &[], y_max: 1.0, y_label: "qtd", locale: Locale::Pt }
            .render(area, &mut buf);
        let first_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.starts_with(Locale::Pt.nothing_to_plot()));
    }
}
