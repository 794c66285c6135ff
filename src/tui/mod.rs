//! Ratatui-based terminal UI.
//!
//! The dashboard shows the alert list, the stock table coloured by row status,
//! and a bar chart of current quantities. Rows can be appended through a small
//! form and the table exported to the CSV report.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::app::pipeline::{self, DashboardRun};
use crate::cli::parse_non_negative;
use crate::domain::{AlertKind, DashboardConfig, Locale, RowStatus, StockRecord};
use crate::error::AppError;
use crate::report::truncate;

mod plotters_chart;

use plotters_chart::{StockBarChart, chart_bars};

/// Table cells wider than this are truncated.
const MAX_CELL_WIDTH: usize = 20;

/// Start the TUI on `config.input`.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let source = config
        .input
        .clone()
        .ok_or_else(|| AppError::new(2, "No stock sheet selected."))?;

    // Load before entering the alternate screen so load errors print normally.
    let run = pipeline::load_and_classify(&source, &config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// The add-row form: one text buffer per required column.
#[derive(Debug, Default)]
struct AddForm {
    fields: [String; 4],
    focus: usize,
}

impl AddForm {
    fn next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn push(&mut self, c: char) {
        self.fields[self.focus].push(c);
    }

    fn backspace(&mut self) {
        self.fields[self.focus].pop();
    }

    /// Validate the buffers into a record. Errors name the offending column.
    fn submit(&self, locale: Locale) -> Result<StockRecord, String> {
        let schema = locale.schema();
        let labels = schema.names();

        let name = self.fields[0].trim();
        if name.is_empty() {
            return Err(format!("{}: {}", labels[0], locale.name_required()));
        }

        let number = |idx: usize| parse_non_negative(&self.fields[idx]).map_err(|e| format!("{}: {e}", labels[idx]));
        Ok(StockRecord::new(name, number(1)?, number(2)?, number(3)?))
    }
}

struct App {
    config: DashboardConfig,
    run: DashboardRun,
    /// First visible table row.
    scroll: usize,
    form: Option<AddForm>,
    status: String,
}

impl App {
    fn new(config: DashboardConfig, run: DashboardRun) -> Self {
        let status = config.locale().loaded_message(run.table.len());
        Self {
            config,
            run,
            scroll: 0,
            form: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.form.is_some() {
            self.handle_form_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('a') => {
                self.form = Some(AddForm::default());
                self.status = self.config.locale().form_opened().to_string();
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.scroll + 1 < self.run.table.len() {
                    self.scroll += 1;
                }
            }
            _ => {}
        }

        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match code {
            KeyCode::Esc => {
                self.form = None;
                self.status = self.config.locale().form_canceled().to_string();
            }
            KeyCode::Tab | KeyCode::Down => form.next(),
            KeyCode::BackTab | KeyCode::Up => form.prev(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.push(c),
            KeyCode::Enter => match form.submit(self.config.locale()) {
                Ok(record) => {
                    let name = record.ingredient.clone();
                    self.run.append(record, &self.config.classifier);
                    self.form = None;
                    self.status = self.config.locale().saved_message(&name);
                }
                Err(reason) => {
                    self.status = reason;
                }
            },
            _ => {}
        }
    }

    fn export(&mut self) {
        let path = &self.config.report_path;
        match crate::io::export::write_table_csv(path, &self.run.table) {
            Ok(()) => {
                self.status = format!(
                    "{} ({})",
                    self.config.locale().report_saved_message(path),
                    chrono::Local::now().format("%H:%M:%S")
                );
            }
            Err(err) => {
                self.status = self.config.locale().export_failed(err);
            }
        }
    }

    /// Re-read the source file; on failure the current table stays on screen.
    fn reload(&mut self) {
        match pipeline::load_and_classify(&self.run.source, &self.config) {
            Ok(run) => {
                self.run = run;
                self.scroll = self.scroll.min(self.run.table.len().saturating_sub(1));
                self.status = self.config.locale().reloaded_message(self.run.table.len());
            }
            Err(err) => {
                tracing::warn!(error = %err, "reload failed");
                self.status = self.config.locale().reload_failed(err);
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Some(form) = &self.form {
            self.draw_form(frame, size, form);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let counts = &self.run.counts;
        let locale = self.config.locale();
        let lines = vec![
            Line::from(vec![
                Span::styled("stock", Style::default().fg(Color::Cyan)),
                Span::raw(locale.dashboard_subtitle()),
            ]),
            Line::from(Span::styled(
                format!(
                    "{}: {} | {}: {} | {}: {} | {}: {} | {}: {}",
                    locale.file_label(),
                    self.run.source.display(),
                    locale.rows_label(),
                    self.run.table.len(),
                    locale.kind_label(AlertKind::Shortage),
                    counts.shortage,
                    locale.kind_label(AlertKind::Excess),
                    counts.excess,
                    locale.kind_label(AlertKind::Indeterminate),
                    counts.indeterminate,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let alert_rows = self.run.alerts.len().clamp(1, 6) as u16;
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(alert_rows + 2), Constraint::Min(0)])
            .split(columns[0]);

        self.draw_alerts(frame, left[0]);
        self.draw_table(frame, left[1]);
        self.draw_chart(frame, columns[1]);
    }

    fn draw_alerts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = if self.run.alerts.is_empty() {
            vec![ListItem::new(self.config.locale().no_alerts()).style(Style::default().fg(Color::Green))]
        } else {
            self.run
                .alerts
                .iter()
                .map(|alert| ListItem::new(alert.message.clone()).style(Style::default().fg(alert_color(alert.kind))))
                .collect()
        };

        let list = List::new(items).block(
            Block::default()
                .title(self.config.locale().alerts_label())
                .borders(Borders::ALL),
        );
        frame.render_widget(list, area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = &self.run.table;
        let locale = self.config.locale();

        let mut header: Vec<String> = table.columns().to_vec();
        header.push(locale.days_label().to_string());
        header.push(locale.status_label().to_string());

        let body: Vec<Vec<String>> = table
            .rows()
            .iter()
            .zip(&self.run.statuses)
            .map(|(row, status)| {
                let mut cells = table.fields(row);
                cells.push(
                    crate::forecast::days_remaining(&row.record)
                        .map(|d| format!("{d:.1}"))
                        .unwrap_or_else(|| "-".to_string()),
                );
                cells.push(locale.status_text(*status).to_string());
                cells
            })
            .collect();

        let widths: Vec<Constraint> = (0..header.len())
            .map(|col| {
                let widest = std::iter::once(&header[col])
                    .chain(body.iter().map(|cells| &cells[col]))
                    .map(|s| s.chars().count().min(MAX_CELL_WIDTH))
                    .max()
                    .unwrap_or(0);
                Constraint::Length(widest as u16)
            })
            .collect();

        let rows: Vec<Row> = body
            .iter()
            .zip(&self.run.statuses)
            .skip(self.scroll)
            .map(|(cells, status)| {
                Row::new(cells.iter().map(|c| Cell::from(truncate(c, MAX_CELL_WIDTH))))
                    .style(Style::default().fg(status_color(*status)))
            })
            .collect();

        let title = self.config.locale().stock_title(self.scroll);

        let widget = Table::new(rows, widths)
            .header(
                Row::new(header.into_iter().map(|h| Cell::from(truncate(&h, MAX_CELL_WIDTH))))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .column_spacing(2)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(widget, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let locale = self.config.locale();
        let block = Block::default().title(locale.chart_title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let quantities = self.run.table.records().map(|r| r.current_quantity);
        let (bars, y_max) = chart_bars(quantities, &self.run.statuses);
        let widget = StockBarChart {
            bars: &bars,
            y_max,
            y_label: locale.quantity_label(),
            locale,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.form.is_some() {
            self.config.locale().form_help()
        } else {
            self.config.locale().dashboard_help()
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect, form: &AddForm) {
        let locale = self.config.locale();
        let schema = locale.schema();
        let rect = centered_rect(60, 6, area);

        let lines: Vec<Line> = schema
            .names()
            .iter()
            .zip(&form.fields)
            .enumerate()
            .map(|(idx, (label, value))| {
                if idx == form.focus {
                    Line::from(Span::styled(
                        format!("» {label}: {value}_"),
                        Style::default().fg(Color::Black).bg(Color::White),
                    ))
                } else {
                    Line::from(format!("  {label}: {value}"))
                }
            })
            .collect();

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title(locale.form_title()).borders(Borders::ALL));
        frame.render_widget(Clear, rect);
        frame.render_widget(p, rect);
    }
}

fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Shortage => Color::Red,
        AlertKind::Excess => Color::Yellow,
        AlertKind::Indeterminate => Color::Gray,
    }
}

fn status_color(status: RowStatus) -> Color {
    match status {
        RowStatus::Shortage { .. } => Color::Red,
        RowStatus::Excess => Color::Yellow,
        RowStatus::Indeterminate => Color::DarkGray,
        RowStatus::Normal => Color::Rgb(135, 206, 235),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
