//! Terminal plotting.
//!
//! - deterministic ASCII bar chart for the `chart` subcommand (`ascii`)
//!
//! The TUI renders its chart with Plotters instead (see `tui::plotters_chart`).

pub mod ascii;

pub use ascii::*;
