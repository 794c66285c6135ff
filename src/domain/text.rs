//! Report and dashboard wording per locale.
//!
//! Alert messages live next to `Locale` in `types.rs`; this file holds the
//! labels used by the text report, the ASCII chart, and the TUI.

use std::fmt::Display;

use super::types::{AlertKind, Locale, RowStatus};

impl Locale {
    pub fn chart_header(self, max: f64) -> String {
        match self {
            Self::En => format!("Plot: current quantity per ingredient | max={max}"),
            Self::Pt => format!("Gráfico: quantidade atual por ingrediente | máx={max}"),
        }
    }

    pub fn chart_legend(self) -> &'static str {
        match self {
            Self::En => "legend: # ok  ! shortage  + excess  ? indeterminate",
            Self::Pt => "legenda: # ok  ! falta  + excesso  ? indeterminado",
        }
    }

    pub fn kind_label(self, kind: AlertKind) -> &'static str {
        match (self, kind) {
            (Self::En, AlertKind::Shortage) => "shortage",
            (Self::En, AlertKind::Excess) => "excess",
            (Self::En, AlertKind::Indeterminate) => "indeterminate",
            (Self::Pt, AlertKind::Shortage) => "falta",
            (Self::Pt, AlertKind::Excess) => "excesso",
            (Self::Pt, AlertKind::Indeterminate) => "indeterminado",
        }
    }

    /// Status column text; rows without an alert read `ok`.
    pub fn status_text(self, status: RowStatus) -> &'static str {
        status.alert_kind().map_or("ok", |kind| self.kind_label(kind))
    }

    pub fn generated_label(self) -> &'static str {
        match self {
            Self::En => "Generated",
            Self::Pt => "Gerado em",
        }
    }

    pub fn file_label(self) -> &'static str {
        match self {
            Self::En => "file",
            Self::Pt => "arquivo",
        }
    }

    pub fn rows_label(self) -> &'static str {
        match self {
            Self::En => "Rows",
            Self::Pt => "Linhas",
        }
    }

    pub fn columns_label(self) -> &'static str {
        match self {
            Self::En => "columns",
            Self::Pt => "colunas",
        }
    }

    pub fn alerts_label(self) -> &'static str {
        match self {
            Self::En => "Alerts",
            Self::Pt => "Alertas",
        }
    }

    pub fn dashboard_subtitle(self) -> &'static str {
        match self {
            Self::En => " - ingredient stock dashboard",
            Self::Pt => " - painel de estoque de ingredientes",
        }
    }

    /// Table title; `first_row` is the 0-based first visible row.
    pub fn stock_title(self, first_row: usize) -> String {
        match (self, first_row) {
            (Self::En, 0) => "Stock".to_string(),
            (Self::Pt, 0) => "Estoque".to_string(),
            (Self::En, n) => format!("Stock (from row {})", n + 1),
            (Self::Pt, n) => format!("Estoque (a partir da linha {})", n + 1),
        }
    }

    pub fn dashboard_help(self) -> &'static str {
        match self {
            Self::En => "a add  e export  r reload  ↑/↓ scroll  q quit",
            Self::Pt => "a adicionar  e exportar  r recarregar  ↑/↓ rolar  q sair",
        }
    }

    pub fn form_help(self) -> &'static str {
        match self {
            Self::En => "Tab/↑/↓ move  Enter save  Esc cancel",
            Self::Pt => "Tab/↑/↓ mover  Enter salvar  Esc cancelar",
        }
    }

    pub fn form_title(self) -> &'static str {
        match self {
            Self::En => "Add ingredient",
            Self::Pt => "Adicionar ingrediente",
        }
    }

    pub fn form_opened(self) -> &'static str {
        match self {
            Self::En => "Adding an ingredient. Enter saves, Esc cancels.",
            Self::Pt => "Adicionando ingrediente. Enter salva, Esc cancela.",
        }
    }

    pub fn form_canceled(self) -> &'static str {
        match self {
            Self::En => "Add canceled.",
            Self::Pt => "Inclusão cancelada.",
        }
    }

    pub fn name_required(self) -> &'static str {
        match self {
            Self::En => "a name is required",
            Self::Pt => "o nome é obrigatório",
        }
    }

    pub fn days_label(self) -> &'static str {
        match self {
            Self::En => "days",
            Self::Pt => "dias",
        }
    }

    pub fn status_label(self) -> &'static str {
        match self {
            Self::En => "status",
            Self::Pt => "situação",
        }
    }

    pub fn chart_too_small(self) -> &'static str {
        match self {
            Self::En => "Chart area too small (resize terminal).",
            Self::Pt => "Área do gráfico pequena demais (redimensione o terminal).",
        }
    }

    pub fn nothing_to_plot(self) -> &'static str {
        match self {
            Self::En => "No quantities to plot.",
            Self::Pt => "Nenhuma quantidade para exibir.",
        }
    }

    pub fn loaded_message(self, rows: usize) -> String {
        match self {
            Self::En => format!("Loaded {rows} row(s)."),
            Self::Pt => format!("{rows} linha(s) carregada(s)."),
        }
    }

    pub fn reloaded_message(self, rows: usize) -> String {
        match self {
            Self::En => format!("Reloaded {rows} row(s)."),
            Self::Pt => format!("{rows} linha(s) recarregada(s)."),
        }
    }

    pub fn reload_failed(self, err: impl Display) -> String {
        match self {
            Self::En => format!("Reload failed: {err}"),
            Self::Pt => format!("Falha ao recarregar: {err}"),
        }
    }

    pub fn export_failed(self, err: impl Display) -> String {
        match self {
            Self::En => format!("Export failed: {err}"),
            Self::Pt => format!("Falha ao exportar: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_title_counts_rows_from_one() {
        assert_eq!(Locale::En.stock_title(0), "Stock");
        assert_eq!(Locale::Pt.stock_title(4), "Estoque (a partir da linha 5)");
    }

    #[test]
    fn every_label_is_translated() {
        for kind in [AlertKind::Shortage, AlertKind::Excess, AlertKind::Indeterminate] {
            assert_ne!(Locale::En.kind_label(kind), Locale::Pt.kind_label(kind));
        }
        assert_ne!(Locale::En.chart_legend(), Locale::Pt.chart_legend());
        assert_eq!(Locale::Pt.chart_header(100.0), "Gráfico: quantidade atual por ingrediente | máx=100");
    }
}
