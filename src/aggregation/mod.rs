//! Exposure Aggregation
//!
//! Reduces a per-contract [`ExposureSet`](crate::exposure::ExposureSet) into
//! three views:
//! - **By strike**: totals collapsed across expirations, with the king node
//! - **By expiration**: totals and dispersion per expiry, with impact scores
//! - **Matrix**: strike × expiration grid for gamma, vanna or charm
//!
//! All reductions sum over records in a canonical order, so results are
//! identical however the chain rows were ordered.

mod expiration;
mod matrix;
mod strike;

pub use expiration::*;
pub use matrix::*;
pub use strike::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::exposure::ExposureRecord;

/// Totals for one strike across all expirations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeAggregate {
    pub strike: f64,
    pub gamma_exposure: f64,
    pub vanna_exposure: f64,
    pub open_interest: u64,
    /// |gamma_exposure|
    pub abs_gamma_exposure: f64,
    /// Largest |gamma_exposure| in the profile; exactly one row is set
    pub is_king_node: bool,
}

impl StrikeAggregate {
    pub fn new(strike: f64, gamma_exposure: f64, vanna_exposure: f64, open_interest: u64) -> Self {
        Self {
            strike,
            gamma_exposure,
            vanna_exposure,
            open_interest,
            abs_gamma_exposure: gamma_exposure.abs(),
            is_king_node: false,
        }
    }

    /// Distance from spot in price units
    pub fn distance_from(&self, spot: f64) -> f64 {
        (self.strike - spot).abs()
    }

    /// Distance from spot as a percentage of spot
    pub fn distance_pct(&self, spot: f64) -> f64 {
        self.distance_from(spot) / spot * 100.0
    }
}

/// Totals for one expiration date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationAggregate {
    pub expiration: NaiveDate,
    pub days_to_expiration: u32,
    pub options_count: usize,
    pub total_gamma_exposure: f64,
    pub avg_gamma_exposure: f64,
    /// Sample standard deviation; 0 for a single option
    pub std_gamma_exposure: f64,
    pub total_vanna_exposure: f64,
    pub avg_vanna_exposure: f64,
    pub total_open_interest: u64,
    /// |total_gamma_exposure| / max(days_to_expiration, 1)
    pub gamma_impact_score: f64,
}

/// Which exposure a matrix cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureMetric {
    Gamma,
    Vanna,
    Charm,
}

impl ExposureMetric {
    pub fn value(&self, record: &ExposureRecord) -> f64 {
        match self {
            ExposureMetric::Gamma => record.gamma_exposure,
            ExposureMetric::Vanna => record.vanna_exposure,
            ExposureMetric::Charm => record.charm_exposure,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExposureMetric::Gamma => "Gamma",
            ExposureMetric::Vanna => "Vanna",
            ExposureMetric::Charm => "Charm",
        }
    }
}
