//! Option Greeks
//!
//! The first and second order sensitivities that dealer exposure is built from.

use serde::{Deserialize, Serialize};

/// Per-contract sensitivities used for exposure
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Vanna: d²V/dSdσ (sensitivity of delta to vol)
    pub vanna: f64,
    /// Charm: d²V/dSdt (delta decay)
    pub charm: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, vanna: f64, charm: f64) -> Self {
        Self {
            delta,
            gamma,
            vanna,
            charm,
        }
    }

    /// All-zero Greeks, used for expired or degenerate contracts
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.vanna.is_finite()
            && self.charm.is_finite()
    }

    /// Scale Greeks by a factor (e.g., open interest times multiplier)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            vanna: self.vanna * factor,
            charm: self.charm * factor,
        }
    }

    /// Add two Greeks (for position totals)
    pub fn add(&self, other: &Greeks) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            vanna: self.vanna + other.vanna,
            charm: self.charm + other.charm,
        }
    }
}
