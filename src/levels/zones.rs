//! Profile levels and dealer hedging zones

use super::{
    percentile, HedgingZone, Intensity, LevelConfig, ProfileLevel, ProfileLevelKind, Side,
    ZoneType,
};
use crate::aggregation::StrikeProfile;

/// Top `n` strikes by |GEX|, nearest to spot first
pub fn profile_levels(profile: &StrikeProfile, spot: f64, n: usize) -> Vec<ProfileLevel> {
    let mut by_size: Vec<_> = profile.iter().collect();
    by_size.sort_by(|a, b| b.abs_gamma_exposure.total_cmp(&a.abs_gamma_exposure));

    let mut levels: Vec<ProfileLevel> = by_size
        .into_iter()
        .take(n)
        .map(|row| ProfileLevel {
            strike: row.strike,
            gamma_exposure: row.gamma_exposure,
            abs_gamma_exposure: row.abs_gamma_exposure,
            kind: if row.gamma_exposure > 0.0 {
                ProfileLevelKind::ResistanceSupport
            } else {
                ProfileLevelKind::VolatilityCatalyst
            },
            distance_pct: row.distance_pct(spot),
            side: Side::of(row.strike, spot),
        })
        .collect();

    levels.sort_by(|a, b| a.distance_pct.total_cmp(&b.distance_pct));
    levels
}

/// Tag every strike with a hedging intensity, nearest to spot first
///
/// Tiers come from percentiles of |GEX| across the whole profile.
pub fn hedging_zones(profile: &StrikeProfile, spot: f64, config: &LevelConfig) -> Vec<HedgingZone> {
    let abs: Vec<f64> = profile.iter().map(|r| r.abs_gamma_exposure).collect();
    let (Some(high), Some(medium)) = (
        percentile(&abs, config.high_intensity_percentile),
        percentile(&abs, config.medium_intensity_percentile),
    ) else {
        return Vec::new();
    };

    let mut zones: Vec<HedgingZone> = profile
        .iter()
        .map(|row| {
            let intensity = if row.abs_gamma_exposure >= high {
                Intensity::High
            } else if row.abs_gamma_exposure >= medium {
                Intensity::Medium
            } else {
                Intensity::Low
            };
            HedgingZone {
                strike: row.strike,
                gamma_exposure: row.gamma_exposure,
                intensity,
                zone_type: if row.gamma_exposure > 0.0 {
                    ZoneType::SupportResistance
                } else {
                    ZoneType::VolatilityZone
                },
                distance_from_spot: row.distance_from(spot),
                distance_pct: row.distance_pct(spot),
            }
        })
        .collect();

    zones.sort_by(|a, b| a.distance_from_spot.total_cmp(&b.distance_from_spot));
    zones
}
