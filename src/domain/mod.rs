//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the stock data model (`StockRecord`, `StockTable`, `ColumnSchema`)
//! - classifier settings and outputs (`Thresholds`, `RowStatus`, `Alert`)
//! - localized user-facing text (`Locale`, with report and TUI wording in `text`)

mod text;
pub mod types;

pub use types::*;
