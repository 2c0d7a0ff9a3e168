//! Analysis configuration
//!
//! Every knob of a run in one serde-friendly struct. Missing JSON fields fall
//! back to defaults, so a config file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};
use crate::exposure::{ChainFilter, ExposureConfig};
use crate::levels::LevelConfig;
use crate::regime::RegimeConfig;

/// Configuration for a full exposure analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Annualized risk-free rate used when a snapshot does not carry one.
    /// Default: 0.05
    pub risk_free_rate: f64,
    /// Greek → dollar exposure scaling
    pub exposure: ExposureConfig,
    /// Record quality rules
    pub filter: ChainFilter,
    /// Level identification
    pub levels: LevelConfig,
    /// Regime classification, positioning and scenarios
    pub regime: RegimeConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            exposure: ExposureConfig::default(),
            filter: ChainFilter::default(),
            levels: LevelConfig::default(),
            regime: RegimeConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Strict record filtering: liquid contracts within a year, IV in (1%, 500%]
    pub fn strict() -> Self {
        Self {
            filter: ChainFilter::strict(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> GexResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GexError::config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> GexResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> GexResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> GexResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(GexError::config("risk_free_rate must be finite"));
        }

        let e = &self.exposure;
        if !(e.contract_multiplier.is_finite() && e.contract_multiplier > 0.0) {
            return Err(GexError::config(
                "exposure.contract_multiplier must be positive",
            ));
        }
        if !(e.move_normalization.is_finite() && e.move_normalization > 0.0) {
            return Err(GexError::config("exposure.move_normalization must be positive"));
        }
        if !(e.day_count.is_finite() && e.day_count > 0.0) {
            return Err(GexError::config("exposure.day_count must be positive"));
        }

        let f = &self.filter;
        if !f.min_implied_volatility.is_finite() || f.min_implied_volatility < 0.0 {
            return Err(GexError::config(
                "filter.min_implied_volatility must be non-negative",
            ));
        }
        if let Some(max_iv) = f.max_implied_volatility {
            if !(max_iv > f.min_implied_volatility) {
                return Err(GexError::config(
                    "filter.max_implied_volatility must exceed min_implied_volatility",
                ));
            }
        }

        self.levels.validate()?;
        self.regime.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_validates() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.exposure.contract_multiplier, 100.0);
        assert_eq!(config.levels.max_levels, 3);
        assert_eq!(config.regime.scenario_moves.len(), 6);
    }

    #[test]
    fn test_strict_preset() {
        let config = AnalysisConfig::strict();
        assert_eq!(config.filter.min_open_interest, 10);
        assert_eq!(config.filter.max_days_to_expiration, Some(365));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = AnalysisConfig::from_json_str(
            r#"{"risk_free_rate": 0.04, "filter": {"min_open_interest": 50}, "regime": {"near_money_pct": 0.03}}"#,
        )
        .unwrap();
        assert_eq!(config.risk_free_rate, 0.04);
        assert_eq!(config.filter.min_open_interest, 50);
        assert_eq!(config.filter.min_implied_volatility, 0.0);
        assert_eq!(config.regime.near_money_pct, 0.03);
        assert_eq!(config.regime.atm_pct, 0.02);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = AnalysisConfig::from_json_str(r#"{"exposure": {"day_count": 0}}"#).unwrap_err();
        assert!(matches!(err, GexError::Config(_)));

        let err = AnalysisConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, GexError::Config(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = AnalysisConfig::strict();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
