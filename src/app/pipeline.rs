//! Shared "load -> classify" pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow; the CLI and
//! the TUI can then focus on presentation (printing vs widgets).

use std::path::{Path, PathBuf};

use crate::domain::{Alert, ClassifierConfig, DashboardConfig, RowStatus, StockRecord, StockTable};
use crate::error::AppError;
use crate::forecast::{AlertCounts, classify, statuses};
use crate::io::ingest::load_table_file;

/// A loaded table together with its current classification.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub source: PathBuf,
    pub table: StockTable,
    pub statuses: Vec<RowStatus>,
    pub alerts: Vec<Alert>,
    pub counts: AlertCounts,
}

impl DashboardRun {
    pub fn new(source: PathBuf, table: StockTable, config: &ClassifierConfig) -> Self {
        let mut run = Self {
            source,
            table,
            statuses: Vec::new(),
            alerts: Vec::new(),
            counts: AlertCounts::default(),
        };
        run.reclassify(config);
        run
    }

    /// Recompute statuses and alerts from the current table.
    pub fn reclassify(&mut self, config: &ClassifierConfig) {
        self.statuses = statuses(&self.table, config);
        self.alerts = classify(&self.table, config);
        self.counts = AlertCounts::from_alerts(&self.alerts);
    }

    /// Append a row (no upsert) and refresh the classification.
    pub fn append(&mut self, record: StockRecord, config: &ClassifierConfig) {
        tracing::info!(ingredient = %record.ingredient, "appending stock row");
        self.table.append(record);
        self.reclassify(config);
    }
}

/// Load `path` with the configured schema and classify it.
pub fn load_and_classify(path: &Path, config: &DashboardConfig) -> Result<DashboardRun, AppError> {
    let table = load_table_file(path, &config.schema())?;
    Ok(DashboardRun::new(path.to_path_buf(), table, &config.classifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlertKind, Locale};

    fn config() -> DashboardConfig {
        DashboardConfig {
            input: None,
            classifier: ClassifierConfig {
                locale: Locale::Pt,
                ..ClassifierConfig::default()
            },
            report_path: PathBuf::from("relatorio_estoque.csv"),
        }
    }

    #[test]
    fn load_classify_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.csv");
        std::fs::write(
            &path,
            "ingrediente,quantidade_atual,consumo_medio_diario,limite_minimo\nfarinha,10,5,4\nleite,50,10,30\n",
        )
        .unwrap();

        let cfg = config();
        let mut run = load_and_classify(&path, &cfg).unwrap();
        assert_eq!(run.alerts.len(), 1);
        assert_eq!(run.alerts[0].kind, AlertKind::Shortage);
        assert_eq!(run.statuses.len(), 2);

        run.append(StockRecord::new("farinha", 500.0, 5.0, 4.0), &cfg.classifier);
        assert_eq!(run.table.len(), 3);
        assert_eq!(run.counts.excess, 1);
        assert_eq!(run.alerts.last().unwrap().message, "EXCESSO: farinha está em excesso.");
    }

    #[test]
    fn schema_failure_produces_no_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.csv");
        std::fs::write(&path, "ingrediente,quantidade_atual,consumo_medio_diario\nfarinha,1,5\n").unwrap();

        let err = load_and_classify(&path, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("'limite_minimo'"));
    }
}
