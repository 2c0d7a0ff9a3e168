//! Chain snapshot
//!
//! The single immutable input of an analysis run: one point-in-time chain
//! plus the scalars every downstream calculation depends on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{GexError, GexResult, OptionRecord};

/// Point-in-time options chain for one underlying
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol (e.g., "SPY")
    pub underlying: String,
    /// Underlying spot price
    spot: f64,
    /// Annualized risk-free rate
    risk_free_rate: f64,
    /// Analysis date the `days_to_expiration` values were derived from
    pub as_of: Option<NaiveDate>,
    /// One record per contract
    pub records: Vec<OptionRecord>,
}

impl ChainSnapshot {
    /// Create a snapshot, rejecting a spot price the exposure math cannot use
    pub fn new(spot: f64, risk_free_rate: f64, records: Vec<OptionRecord>) -> GexResult<Self> {
        validate_scalars(spot, risk_free_rate)?;
        Ok(Self {
            underlying: String::new(),
            spot,
            risk_free_rate,
            as_of: None,
            records,
        })
    }

    pub fn with_underlying(mut self, underlying: impl Into<String>) -> Self {
        self.underlying = underlying.into();
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-check scalars after deserialization
    pub fn validate(&self) -> GexResult<()> {
        validate_scalars(self.spot, self.risk_free_rate)
    }
}

fn validate_scalars(spot: f64, risk_free_rate: f64) -> GexResult<()> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(GexError::invalid_input(format!(
            "spot price must be positive and finite, got {}",
            spot
        )));
    }
    if !risk_free_rate.is_finite() {
        return Err(GexError::invalid_input(format!(
            "risk-free rate must be finite, got {}",
            risk_free_rate
        )));
    }
    Ok(())
}
