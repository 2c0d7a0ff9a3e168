//! Record quality filter
//!
//! Decides which chain rows carry an exposure signal. Rejections are not
//! errors: each one is reported as a [`SkipReason`] and counted.

use serde::{Deserialize, Serialize};

use super::SkipReason;
use crate::core::OptionRecord;

/// Quality rules applied to every record before pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainFilter {
    /// Minimum open interest (inclusive). Default: 1
    pub min_open_interest: u64,
    /// Minimum session volume (inclusive); `None` ignores volume
    pub min_volume: Option<u64>,
    /// Maximum days to expiration (inclusive); `None` for no limit
    pub max_days_to_expiration: Option<u32>,
    /// Implied volatility must be strictly above this. Default: 0.0
    pub min_implied_volatility: f64,
    /// Maximum implied volatility (inclusive); `None` for no limit
    pub max_implied_volatility: Option<f64>,
}

impl Default for ChainFilter {
    fn default() -> Self {
        Self {
            min_open_interest: 1,
            min_volume: None,
            max_days_to_expiration: None,
            min_implied_volatility: 0.0,
            max_implied_volatility: None,
        }
    }
}

impl ChainFilter {
    /// Tighter rules for noisy chains: liquid, dated within a year, sane IV
    pub fn strict() -> Self {
        Self {
            min_open_interest: 10,
            min_volume: Some(1),
            max_days_to_expiration: Some(365),
            min_implied_volatility: 0.01,
            max_implied_volatility: Some(5.0),
        }
    }

    /// Accept the record or report why it carries no signal
    pub fn check(&self, record: &OptionRecord) -> Result<(), SkipReason> {
        let open_interest = record
            .open_interest
            .ok_or(SkipReason::MissingOpenInterest)?;
        if open_interest == 0 {
            return Err(SkipReason::ZeroOpenInterest);
        }
        if open_interest < self.min_open_interest {
            return Err(SkipReason::BelowMinOpenInterest);
        }

        let iv = record
            .implied_volatility
            .filter(|v| !v.is_nan())
            .ok_or(SkipReason::MissingVolatility)?;
        if iv <= 0.0 {
            return Err(SkipReason::NonPositiveVolatility);
        }
        if iv <= self.min_implied_volatility {
            return Err(SkipReason::VolatilityOutOfRange);
        }
        if let Some(max_iv) = self.max_implied_volatility {
            if iv > max_iv {
                return Err(SkipReason::VolatilityOutOfRange);
            }
        }

        if record.days_to_expiration == 0 {
            return Err(SkipReason::Expired);
        }
        if let Some(max_dte) = self.max_days_to_expiration {
            if record.days_to_expiration > max_dte {
                return Err(SkipReason::BeyondMaxExpiration);
            }
        }

        if let Some(min_volume) = self.min_volume {
            if record.volume.unwrap_or(0) < min_volume {
                return Err(SkipReason::BelowMinVolume);
            }
        }

        Ok(())
    }
}
