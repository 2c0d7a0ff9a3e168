//! Core data types for exposure analysis
//!
//! Defines fundamental types:
//! - OptionRecord: one contract of a chain snapshot
//! - ChainSnapshot: the immutable input of an analysis run
//! - Greeks: per-contract sensitivities
//! - GexError: crate error type

pub mod error;
pub mod greeks;
pub mod option;
pub mod snapshot;

pub use error::*;
pub use greeks::*;
pub use option::*;
pub use snapshot::*;
