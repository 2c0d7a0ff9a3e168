//! Chain data sources
//!
//! Handles:
//! - Deterministic synthetic chains for demos and offline runs
//! - JSON snapshot storage

pub mod sample;
pub mod store;

pub use sample::*;
pub use store::*;
