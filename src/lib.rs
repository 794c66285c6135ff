//! `stock-alerts` library crate.
//!
//! The binary (`stock`) is a thin wrapper around this library so that:
//!
//! - loading and classification are testable without spawning processes
//! - the CLI printers and the TUI share one load -> classify pipeline

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
