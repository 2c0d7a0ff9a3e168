//! Configuration for level identification

use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};

/// Configuration for level identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Percentile of |GEX| within a side that a strike must reach to count
    /// as resistance or support.
    /// Default: 0.70
    pub significance_percentile: f64,

    /// Resistance / support levels kept per side.
    /// Default: 3
    pub max_levels: usize,

    /// Strikes reported by the profile-levels view.
    /// Default: 10
    pub profile_levels: usize,

    /// |GEX| percentile across all strikes for a high-intensity zone.
    /// Default: 0.80
    pub high_intensity_percentile: f64,

    /// |GEX| percentile across all strikes for a medium-intensity zone.
    /// Default: 0.60
    pub medium_intensity_percentile: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            significance_percentile: 0.70,
            max_levels: 3,
            profile_levels: 10,
            high_intensity_percentile: 0.80,
            medium_intensity_percentile: 0.60,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> GexResult<()> {
        for (name, q) in [
            ("significance_percentile", self.significance_percentile),
            ("high_intensity_percentile", self.high_intensity_percentile),
            ("medium_intensity_percentile", self.medium_intensity_percentile),
        ] {
            if !(0.0..=1.0).contains(&q) {
                return Err(GexError::config(format!(
                    "levels.{} must be within [0, 1], got {}",
                    name, q
                )));
            }
        }
        if self.medium_intensity_percentile > self.high_intensity_percentile {
            return Err(GexError::config(
                "levels.medium_intensity_percentile exceeds high_intensity_percentile",
            ));
        }
        Ok(())
    }
}
