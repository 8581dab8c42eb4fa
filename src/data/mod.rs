//! Synthetic sales data generation (`sample` subcommand).

pub mod sample;

pub use sample::*;
