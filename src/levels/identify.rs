//! Resistance, support and key-level identification

use super::{percentile, GammaLevels, KeyLevel, KeyLevelKind, LevelConfig};
use crate::aggregation::{StrikeAggregate, StrikeProfile};

/// Identify king node, resistance and support from a strike profile
///
/// Returns `None` for an empty profile.
pub fn identify_levels(
    profile: &StrikeProfile,
    current_price: f64,
    config: &LevelConfig,
) -> Option<GammaLevels> {
    let king_node = profile.king_node()?.clone();

    let above: Vec<&StrikeAggregate> = profile.iter().filter(|r| r.strike > current_price).collect();
    let below: Vec<&StrikeAggregate> = profile.iter().filter(|r| r.strike < current_price).collect();

    let resistance_levels = significant_strikes(&above, config);
    let support_levels = significant_strikes(&below, config);

    // First strictly larger wins, so ties resolve to the lowest strike
    let mut largest_positive: Option<&StrikeAggregate> = None;
    let mut largest_negative: Option<&StrikeAggregate> = None;
    for row in profile {
        if row.gamma_exposure > 0.0
            && largest_positive.map_or(true, |p| row.gamma_exposure > p.gamma_exposure)
        {
            largest_positive = Some(row);
        }
        if row.gamma_exposure < 0.0
            && largest_negative.map_or(true, |n| row.abs_gamma_exposure > n.abs_gamma_exposure)
        {
            largest_negative = Some(row);
        }
    }

    // Same first-strictly-smaller rule as the king node
    let mut zero_gamma: Option<&StrikeAggregate> = None;
    for row in profile {
        if zero_gamma.map_or(true, |z| row.abs_gamma_exposure < z.abs_gamma_exposure) {
            zero_gamma = Some(row);
        }
    }

    let levels = GammaLevels {
        current_price,
        resistance_levels,
        support_levels,
        king_node,
        largest_positive: largest_positive.cloned(),
        largest_negative: largest_negative.cloned(),
        positive_nodes: profile.iter().filter(|r| r.gamma_exposure > 0.0).cloned().collect(),
        negative_nodes: profile.iter().filter(|r| r.gamma_exposure < 0.0).cloned().collect(),
        zero_gamma_level: zero_gamma.map(|r| r.strike),
        total_gex: profile.total_gamma_exposure(),
    };

    tracing::debug!(
        "King node {:.2}, resistance {:?}, support {:?}",
        levels.king_node.strike,
        levels.resistance_levels,
        levels.support_levels
    );

    Some(levels)
}

/// Strikes at or above the significance percentile of |GEX| within one side,
/// largest first
fn significant_strikes(side: &[&StrikeAggregate], config: &LevelConfig) -> Vec<f64> {
    let abs: Vec<f64> = side.iter().map(|r| r.abs_gamma_exposure).collect();
    let Some(threshold) = percentile(&abs, config.significance_percentile) else {
        return Vec::new();
    };

    let mut significant: Vec<&StrikeAggregate> = side
        .iter()
        .copied()
        .filter(|r| r.abs_gamma_exposure >= threshold)
        .collect();

    // Stable sort keeps ascending strike order among equal magnitudes
    significant.sort_by(|a, b| b.abs_gamma_exposure.total_cmp(&a.abs_gamma_exposure));

    significant
        .into_iter()
        .take(config.max_levels)
        .map(|r| r.strike)
        .collect()
}

/// Flatten levels into the key-levels table, sorted by distance from spot
pub fn key_levels(levels: &GammaLevels, profile: &StrikeProfile, spot: f64) -> Vec<KeyLevel> {
    let mut out = vec![KeyLevel::from_row(KeyLevelKind::KingNode, &levels.king_node, spot)];

    for (i, strike) in levels.resistance_levels.iter().enumerate() {
        if let Some(row) = profile.at(*strike) {
            out.push(KeyLevel::from_row(KeyLevelKind::Resistance(i + 1), row, spot));
        }
    }
    for (i, strike) in levels.support_levels.iter().enumerate() {
        if let Some(row) = profile.at(*strike) {
            out.push(KeyLevel::from_row(KeyLevelKind::Support(i + 1), row, spot));
        }
    }

    out.sort_by(|a, b| a.distance_from_current.total_cmp(&b.distance_from_current));
    out
}
