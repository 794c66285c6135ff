//! Stock forecasting.
//!
//! Runway estimation and threshold-based alert classification over a loaded
//! `StockTable`. Everything here is pure: no I/O and no mutation of the table.

pub mod classifier;

pub use classifier::*;
