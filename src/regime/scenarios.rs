//! Net dealer gamma under spot shifts

use serde::{Deserialize, Serialize};

use crate::exposure::{ExposureConfig, ExposureSet};
use crate::models::greeks;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaScenario {
    /// Spot move in percent
    pub price_move_pct: f64,
    pub new_price: f64,
    pub net_gamma_exposure: f64,
}

/// Reprice every contract at `spot × (1 + move)` and sum dealer gamma
///
/// Volatility, rate and time to expiry are held fixed.
pub fn gamma_scenarios(
    set: &ExposureSet,
    config: &ExposureConfig,
    moves: &[f64],
) -> Vec<GammaScenario> {
    let records = set.canonical_records();

    moves
        .iter()
        .map(|&m| {
            let new_price = set.spot() * (1.0 + m);
            let net_gamma_exposure: f64 = records
                .iter()
                .map(|r| {
                    let time = r.days_to_expiration as f64 / config.day_count;
                    let g = greeks(
                        new_price,
                        r.strike,
                        set.risk_free_rate(),
                        r.implied_volatility,
                        time,
                        r.option_type,
                    );
                    let (gamma, _, _) =
                        config.dealer_exposures(r.option_type, r.open_interest, &g, new_price);
                    if gamma.is_finite() {
                        gamma
                    } else {
                        0.0
                    }
                })
                .sum();

            tracing::debug!("Scenario {:+.1}%: net gamma ${:.0}", m * 100.0, net_gamma_exposure);

            GammaScenario {
                price_move_pct: m * 100.0,
                new_price,
                net_gamma_exposure,
            }
        })
        .collect()
}
