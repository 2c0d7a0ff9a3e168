//! Trading signals from levels and regime

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{MarketRegime, Regime, RegimeConfig};
use crate::levels::GammaLevels;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    /// Nearest resistance above spot
    Resistance { strike: f64, distance_pct: f64 },
    /// Nearest support below spot
    Support { strike: f64, distance_pct: f64 },
    KingNode { strike: f64, gamma_exposure: f64 },
    /// Flip point within the flip-zone band
    FlipZone { strike: f64, distance_pct: f64 },
    Regime(Regime),
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Resistance {
                strike,
                distance_pct,
            } => write!(f, "Resistance at ${:.0} ({:.1}% above)", strike, distance_pct),
            Signal::Support {
                strike,
                distance_pct,
            } => write!(f, "Support at ${:.0} ({:.1}% below)", strike, distance_pct),
            Signal::KingNode {
                strike,
                gamma_exposure,
            } if *gamma_exposure > 0.0 => write!(
                f,
                "King Node (Positive): ${:.0} - Strong support/resistance level",
                strike
            ),
            Signal::KingNode { strike, .. } => write!(
                f,
                "King Node (Negative): ${:.0} - Potential volatility catalyst",
                strike
            ),
            Signal::FlipZone { strike, .. } => write!(
                f,
                "Gamma Flip Zone: ${:.0} - Major volatility shift possible",
                strike
            ),
            Signal::Regime(regime) => write!(f, "{}", regime),
        }
    }
}

/// Signals in display order: resistance, support, king node, flip zones,
/// regime last
pub fn trading_signals(
    levels: &GammaLevels,
    regime: &MarketRegime,
    spot: f64,
    config: &RegimeConfig,
) -> Vec<Signal> {
    let mut signals = Vec::new();

    if let Some(strike) = levels.nearest_resistance() {
        signals.push(Signal::Resistance {
            strike,
            distance_pct: (strike - spot) / spot * 100.0,
        });
    }
    if let Some(strike) = levels.nearest_support() {
        signals.push(Signal::Support {
            strike,
            distance_pct: (spot - strike) / spot * 100.0,
        });
    }

    signals.push(Signal::KingNode {
        strike: levels.king_node.strike,
        gamma_exposure: levels.king_node.gamma_exposure,
    });

    let band_pct = config.flip_zone_pct * 100.0;
    for flip in &regime.gamma_flip_points {
        let distance_pct = (flip.strike - spot).abs() / spot * 100.0;
        if distance_pct < band_pct {
            signals.push(Signal::FlipZone {
                strike: flip.strike,
                distance_pct,
            });
        }
    }

    signals.push(Signal::Regime(regime.regime));
    signals
}
