//! Linear sales model: feature encoding and prediction.
//!
//! The encoding and the fitted model are small, pure types so that the
//! trainer and the session can stay generic over them.

pub mod model;

pub use model::*;
