//! Dealer Exposure
//!
//! Turns chain records into signed dealer-exposure records.
//!
//! Sign convention (dealers assumed short calls, long puts):
//! - gamma exposure: −OI·Γ·100·S²·0.01 for calls, +OI·Γ·100·S²·0.01 for puts
//! - vanna and charm exposure: −OI·greek·100·S·0.01 for both calls and puts

mod calculator;
mod filter;

pub use calculator::*;
pub use filter::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Greeks, OptionRecord, OptionType};

/// Scaling applied when converting Greeks to dollar exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Shares per contract. Default: 100
    pub contract_multiplier: f64,
    /// Spot move the exposure is normalized to. Default: 0.01 (1%)
    pub move_normalization: f64,
    /// Days per year for time to expiry. Default: 365
    pub day_count: f64,
    /// Price contracts on the rayon pool. Results are identical either way
    pub parallel: bool,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: 100.0,
            move_normalization: 0.01,
            day_count: 365.0,
            parallel: false,
        }
    }
}

impl ExposureConfig {
    /// (gamma, vanna, charm) dollar exposure for one contract line
    pub fn dealer_exposures(
        &self,
        option_type: OptionType,
        open_interest: u64,
        greeks: &Greeks,
        spot: f64,
    ) -> (f64, f64, f64) {
        let notional = open_interest as f64 * self.contract_multiplier * self.move_normalization;
        let gamma = option_type.sign() * notional * greeks.gamma * spot * spot;
        let vanna = -notional * greeks.vanna * spot;
        let charm = -notional * greeks.charm * spot;
        (gamma, vanna, charm)
    }
}

/// Why a record produced no exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    MissingOpenInterest,
    ZeroOpenInterest,
    BelowMinOpenInterest,
    MissingVolatility,
    NonPositiveVolatility,
    VolatilityOutOfRange,
    Expired,
    BeyondMaxExpiration,
    BelowMinVolume,
    NumericalFailure,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MissingOpenInterest => "missing open interest",
            SkipReason::ZeroOpenInterest => "zero open interest",
            SkipReason::BelowMinOpenInterest => "open interest below minimum",
            SkipReason::MissingVolatility => "missing implied volatility",
            SkipReason::NonPositiveVolatility => "non-positive implied volatility",
            SkipReason::VolatilityOutOfRange => "implied volatility out of range",
            SkipReason::Expired => "expired",
            SkipReason::BeyondMaxExpiration => "beyond max expiration",
            SkipReason::BelowMinVolume => "volume below minimum",
            SkipReason::NumericalFailure => "numerical failure",
        }
    }
}

/// Processed vs. excluded record counts for one calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Records seen
    pub total: usize,
    /// Records that produced an exposure record
    pub valid: usize,
    /// Excluded records by reason
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ProcessingStats {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub(crate) fn record(&mut self, outcome: Result<(), SkipReason>) {
        self.total += 1;
        match outcome {
            Ok(()) => self.valid += 1,
            Err(reason) => *self.skipped.entry(reason).or_insert(0) += 1,
        }
    }
}

/// One contract's signed dealer exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    pub strike: f64,
    pub expiration: NaiveDate,
    pub days_to_expiration: u32,
    pub option_type: OptionType,
    pub open_interest: u64,
    pub implied_volatility: f64,
    pub last_price: Option<f64>,
    pub volume: Option<u64>,
    /// Greeks the exposures were derived from
    pub greeks: Greeks,
    pub gamma_exposure: f64,
    pub vanna_exposure: f64,
    pub charm_exposure: f64,
}

impl ExposureRecord {
    /// Canonical ordering used before summation so totals do not depend on
    /// the order contracts arrived in
    pub(crate) fn canonical_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.strike
            .total_cmp(&other.strike)
            .then(self.expiration.cmp(&other.expiration))
            .then(self.option_type.cmp(&other.option_type))
            .then(self.gamma_exposure.total_cmp(&other.gamma_exposure))
            .then(self.vanna_exposure.total_cmp(&other.vanna_exposure))
            .then(self.charm_exposure.total_cmp(&other.charm_exposure))
            .then(self.open_interest.cmp(&other.open_interest))
    }

    /// Record with fixed exposures for aggregation tests
    #[cfg(test)]
    pub(crate) fn synthetic(
        strike: f64,
        expiration: NaiveDate,
        days_to_expiration: u32,
        option_type: OptionType,
        open_interest: u64,
        exposures: (f64, f64, f64),
    ) -> Self {
        Self {
            strike,
            expiration,
            days_to_expiration,
            option_type,
            open_interest,
            implied_volatility: 0.2,
            last_price: None,
            volume: None,
            greeks: Greeks::zero(),
            gamma_exposure: exposures.0,
            vanna_exposure: exposures.1,
            charm_exposure: exposures.2,
        }
    }
}

/// Result of a completed exposure calculation
///
/// Only [`ExposureCalculator`] builds this, so every aggregate downstream is
/// guaranteed to come from a finished calculation. It serializes for
/// inspection but cannot be read back:
///
/// ```compile_fail
/// let set: gex_engine::exposure::ExposureSet = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ExposureSet {
    spot: f64,
    risk_free_rate: f64,
    records: Vec<ExposureRecord>,
    stats: ProcessingStats,
}

impl ExposureSet {
    pub(crate) fn new(
        spot: f64,
        risk_free_rate: f64,
        records: Vec<ExposureRecord>,
        stats: ProcessingStats,
    ) -> Self {
        Self {
            spot,
            risk_free_rate,
            records,
            stats,
        }
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Exposure records in input order
    pub fn records(&self) -> &[ExposureRecord] {
        &self.records
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted into canonical order for order-independent sums
    pub(crate) fn canonical_records(&self) -> Vec<&ExposureRecord> {
        let mut sorted: Vec<&ExposureRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| a.canonical_cmp(b));
        sorted
    }

    pub fn total_gamma_exposure(&self) -> f64 {
        self.canonical_records()
            .iter()
            .map(|r| r.gamma_exposure)
            .sum()
    }

    /// Records that carry nonzero gamma exposure
    pub fn non_zero_gamma_count(&self) -> usize {
        self.records.iter().filter(|r| r.gamma_exposure != 0.0).count()
    }
}

/// Build an exposure record from a record that passed the quality filter
pub(crate) fn exposure_from(
    record: &OptionRecord,
    open_interest: u64,
    implied_volatility: f64,
    greeks: Greeks,
    exposures: (f64, f64, f64),
) -> ExposureRecord {
    let (gamma_exposure, vanna_exposure, charm_exposure) = exposures;
    ExposureRecord {
        strike: record.strike,
        expiration: record.expiration,
        days_to_expiration: record.days_to_expiration,
        option_type: record.option_type,
        open_interest,
        implied_volatility,
        last_price: record.last_price,
        volume: record.volume,
        greeks,
        gamma_exposure,
        vanna_exposure,
        charm_exposure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dealer_exposure_signs() {
        let config = ExposureConfig::default();
        let g = Greeks::new(0.5, 0.02, 0.3, -0.4);

        let (call_gex, call_vex, call_cex) =
            config.dealer_exposures(OptionType::Call, 1000, &g, 100.0);
        let (put_gex, put_vex, put_cex) =
            config.dealer_exposures(OptionType::Put, 1000, &g, 100.0);

        // 1000 * 0.02 * 100 * 100^2 * 0.01
        assert!((call_gex + 200_000.0).abs() < 1e-6);
        assert!((put_gex - 200_000.0).abs() < 1e-6);

        // Vanna/charm sign does not depend on option type
        assert_eq!(call_vex, put_vex);
        assert_eq!(call_cex, put_cex);
        assert!((call_vex + 30_000.0).abs() < 1e-6);
        assert!((call_cex - 40_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_stats_counting() {
        let mut stats = ProcessingStats::default();
        stats.record(Ok(()));
        stats.record(Err(SkipReason::Expired));
        stats.record(Err(SkipReason::Expired));
        stats.record(Err(SkipReason::ZeroOpenInterest));

        assert_eq!(stats.total, 4);
        assert_eq!(stats.valid, 1);
        assert_eq!(stats.skipped_total(), 3);
        assert_eq!(stats.skipped_for(SkipReason::Expired), 2);
        assert_eq!(stats.skipped_for(SkipReason::NumericalFailure), 0);
    }
}
