//! Regime decision table and gamma flip points

use super::{GammaFlipPoint, MarketRegime, Regime, RegimeConfig};
use crate::aggregation::{StrikeAggregate, StrikeProfile};

/// First matching row wins:
/// net > 0 and near > 0 → Positive, net < 0 and near < 0 → Negative,
/// anything else → Mixed
pub fn determine_regime(net_gamma: f64, near_money_gamma: f64) -> Regime {
    if net_gamma > 0.0 && near_money_gamma > 0.0 {
        Regime::Positive
    } else if net_gamma < 0.0 && near_money_gamma < 0.0 {
        Regime::Negative
    } else {
        Regime::Mixed
    }
}

/// Classify the gamma environment around `current_price`
///
/// Returns `None` for an empty profile.
pub fn classify_regime(
    profile: &StrikeProfile,
    current_price: f64,
    config: &RegimeConfig,
) -> Option<MarketRegime> {
    if profile.is_empty() {
        return None;
    }

    let total_positive_gamma: f64 = profile
        .iter()
        .map(|r| r.gamma_exposure)
        .filter(|g| *g > 0.0)
        .sum();
    let total_negative_gamma: f64 = profile
        .iter()
        .map(|r| r.gamma_exposure)
        .filter(|g| *g < 0.0)
        .sum();
    let net_gamma = total_positive_gamma + total_negative_gamma;

    let band = current_price * config.near_money_pct;
    let near_money_gamma: f64 = profile
        .iter()
        .filter(|r| r.strike >= current_price - band && r.strike <= current_price + band)
        .map(|r| r.gamma_exposure)
        .sum();

    let regime = determine_regime(net_gamma, near_money_gamma);
    let gamma_flip_points = find_flip_points(profile.rows());

    tracing::info!(
        "{} (net ${:.0}, near money ${:.0}, {} flip points)",
        regime,
        net_gamma,
        near_money_gamma,
        gamma_flip_points.len()
    );

    Some(MarketRegime {
        regime,
        net_gamma,
        total_positive_gamma,
        total_negative_gamma,
        near_money_gamma,
        gamma_flip_points,
    })
}

/// Midpoints between adjacent strike rows whose exposures have strictly
/// opposite signs. Rows must be sorted ascending by strike; zero carries no
/// sign and never flips.
pub fn find_flip_points(rows: &[StrikeAggregate]) -> Vec<GammaFlipPoint> {
    rows.windows(2)
        .filter(|w| {
            let (a, b) = (w[0].gamma_exposure, w[1].gamma_exposure);
            (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
        })
        .map(|w| GammaFlipPoint {
            strike: (w[0].strike + w[1].strike) / 2.0,
            lower_strike: w[0].strike,
            upper_strike: w[1].strike,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        assert_eq!(determine_regime(100.0, 50.0), Regime::Positive);
        assert_eq!(determine_regime(-100.0, -50.0), Regime::Negative);
        assert_eq!(determine_regime(100.0, -50.0), Regime::Mixed);
        assert_eq!(determine_regime(-100.0, 50.0), Regime::Mixed);
        assert_eq!(determine_regime(0.0, 0.0), Regime::Mixed);
    }

    #[test]
    fn test_flip_points() {
        let profile = StrikeProfile::from_totals(vec![
            (100.0, -5.0, 0.0, 1),
            (105.0, 3.0, 0.0, 1),
            (110.0, 2.0, 0.0, 1),
            (115.0, -1.0, 0.0, 1),
            (120.0, 4.0, 0.0, 1),
        ]);
        let flips = find_flip_points(profile.rows());
        let strikes: Vec<f64> = flips.iter().map(|f| f.strike).collect();
        assert_eq!(strikes, vec![102.5, 112.5, 117.5]);
        assert_eq!(flips[1].transition(), "110 to 115");
    }

    #[test]
    fn test_zero_does_not_flip() {
        let profile = StrikeProfile::from_totals(vec![
            (100.0, 5.0, 0.0, 1),
            (105.0, 0.0, 0.0, 1),
            (110.0, -5.0, 0.0, 1),
        ]);
        assert!(find_flip_points(profile.rows()).is_empty());
    }

    #[test]
    fn test_classify_regime() {
        // Near money band at 100 is [95, 105]
        let profile = StrikeProfile::from_totals(vec![
            (80.0, 500.0, 0.0, 1),
            (95.0, -100.0, 0.0, 1),
            (100.0, -50.0, 0.0, 1),
            (105.0, 30.0, 0.0, 1),
            (120.0, -200.0, 0.0, 1),
        ]);
        let regime = classify_regime(&profile, 100.0, &RegimeConfig::default()).unwrap();

        assert_eq!(regime.total_positive_gamma, 530.0);
        assert_eq!(regime.total_negative_gamma, -350.0);
        assert_eq!(regime.net_gamma, 180.0);
        assert_eq!(regime.near_money_gamma, -120.0);
        assert_eq!(regime.regime, Regime::Mixed);
        assert_eq!(regime.gamma_flip_points.len(), 3);
    }

    #[test]
    fn test_empty_profile() {
        assert!(classify_regime(&StrikeProfile::default(), 100.0, &RegimeConfig::default()).is_none());
    }
}
