//! Input/output helpers.
//!
//! - CSV / XLSX ingest + validation (`ingest`)
//! - CSV report export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
