//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (closed-form price and exposure Greeks)

pub mod black_scholes;

pub use black_scholes::*;
