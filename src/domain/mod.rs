//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - loaded sales records and the in-memory dataset (`SalesRow`, `Dataset`)
//! - training configuration and the train report (`TrainConfig`, `TrainReport`)
//! - per-product aggregates (`ProductTotal`)
//! - date parsing/normalization helpers shared by train and predict

pub mod types;

pub use types::*;
