//! Model training orchestration.
//!
//! Responsibilities:
//!
//! - normalize dates to ordinals
//! - build the one-hot feature encoding
//! - split rows deterministically into training/held-out partitions
//! - fit OLS and compute MSE diagnostics

pub mod trainer;

pub use trainer::*;
