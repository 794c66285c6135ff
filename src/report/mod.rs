//! Reporting utilities: formatted alerts, the stock table, and run summaries.

pub mod format;

pub use format::*;
