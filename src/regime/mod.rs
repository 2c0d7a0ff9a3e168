//! Market Regime Classification
//!
//! Reads the net dealer gamma posture out of a strike profile:
//! - **Regime**: positive / negative / mixed gamma environment
//! - **Flip points**: midpoints where strike exposure changes sign
//! - **Dealer positioning**: call vs. put gamma, overall and near the money
//! - **Scenarios**: net gamma recomputed at shifted spot prices
//! - **Signals**: human-readable summary of levels and regime

mod classify;
mod positioning;
mod scenarios;
mod signals;

pub use classify::*;
pub use positioning::*;
pub use scenarios::*;
pub use signals::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};

/// Gamma environment implied by dealer positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Dealers long gamma: hedging dampens moves
    Positive,
    /// Dealers short gamma: hedging amplifies moves
    Negative,
    Mixed,
}

impl Regime {
    pub fn label(&self) -> &'static str {
        match self {
            Regime::Positive => "Positive Gamma Environment — Expect Lower Volatility",
            Regime::Negative => "Negative Gamma Environment — Expect Higher Volatility",
            Regime::Mixed => "Mixed Gamma Environment — Moderate Volatility Expected",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Regime::Positive => "POSITIVE",
            Regime::Negative => "NEGATIVE",
            Regime::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Midpoint between adjacent strikes whose exposure changes sign
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaFlipPoint {
    pub strike: f64,
    pub lower_strike: f64,
    pub upper_strike: f64,
}

impl GammaFlipPoint {
    /// "430 to 435"
    pub fn transition(&self) -> String {
        format!("{:.0} to {:.0}", self.lower_strike, self.upper_strike)
    }
}

/// Regime classification of one strike profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRegime {
    pub regime: Regime,
    pub net_gamma: f64,
    /// Sum of positive strike exposures
    pub total_positive_gamma: f64,
    /// Sum of negative strike exposures
    pub total_negative_gamma: f64,
    /// Net exposure of strikes within the near-money band
    pub near_money_gamma: f64,
    pub gamma_flip_points: Vec<GammaFlipPoint>,
}

/// Configuration for regime classification and derived views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Band around spot, as a fraction, counted as near the money.
    /// Default: 0.05
    pub near_money_pct: f64,

    /// Band around spot counted as at the money for dealer positioning.
    /// Default: 0.02
    pub atm_pct: f64,

    /// Flip points closer than this fraction of spot raise a signal.
    /// Default: 0.10
    pub flip_zone_pct: f64,

    /// Relative spot moves for gamma scenarios.
    /// Default: ±1%, ±3%, ±5%
    pub scenario_moves: Vec<f64>,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            near_money_pct: 0.05,
            atm_pct: 0.02,
            flip_zone_pct: 0.10,
            scenario_moves: vec![-0.05, -0.03, -0.01, 0.01, 0.03, 0.05],
        }
    }
}

impl RegimeConfig {
    pub fn validate(&self) -> GexResult<()> {
        for (name, band) in [
            ("near_money_pct", self.near_money_pct),
            ("atm_pct", self.atm_pct),
            ("flip_zone_pct", self.flip_zone_pct),
        ] {
            if !band.is_finite() || band < 0.0 {
                return Err(GexError::config(format!(
                    "regime.{} must be a non-negative number, got {}",
                    name, band
                )));
            }
        }
        if let Some(m) = self.scenario_moves.iter().find(|m| !m.is_finite() || **m <= -1.0) {
            return Err(GexError::config(format!(
                "regime.scenario_moves entry {} would move spot to or below zero",
                m
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(
            Regime::Positive.to_string(),
            "Positive Gamma Environment — Expect Lower Volatility"
        );
        assert_eq!(
            Regime::Mixed.label(),
            "Mixed Gamma Environment — Moderate Volatility Expected"
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(RegimeConfig::default().validate().is_ok());
        let bad = RegimeConfig {
            scenario_moves: vec![0.01, -1.0],
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let negative_band = RegimeConfig {
            atm_pct: -0.1,
            ..Default::default()
        };
        assert!(negative_band.validate().is_err());
    }
}
