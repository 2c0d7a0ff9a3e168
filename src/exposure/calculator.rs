//! ExposureCalculator - prices every contract of a snapshot and converts the
//! Greeks into dealer exposure.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;

use super::{
    exposure_from, ChainFilter, ExposureConfig, ExposureRecord, ExposureSet, ProcessingStats,
    SkipReason,
};
use crate::core::{ChainSnapshot, GexResult, OptionRecord};
use crate::models::try_greeks;

/// Computes per-contract exposure for a chain snapshot
#[derive(Debug, Clone, Default)]
pub struct ExposureCalculator {
    config: ExposureConfig,
    filter: ChainFilter,
}

impl ExposureCalculator {
    /// Create a calculator with default scaling and the permissive filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: ExposureConfig, filter: ChainFilter) -> Self {
        Self { config, filter }
    }

    pub fn config(&self) -> &ExposureConfig {
        &self.config
    }

    pub fn filter(&self) -> &ChainFilter {
        &self.filter
    }

    /// Price every record of the snapshot
    ///
    /// Records without signal and records whose Greeks are not finite are
    /// skipped and counted; they never abort the batch.
    pub fn compute(&self, snapshot: &ChainSnapshot) -> ExposureSet {
        let spot = snapshot.spot();
        let rate = snapshot.risk_free_rate();

        let outcomes: Vec<Result<ExposureRecord, SkipReason>> = if self.config.parallel {
            snapshot
                .records
                .par_iter()
                .map(|r| self.evaluate(r, spot, rate))
                .collect()
        } else {
            snapshot
                .records
                .iter()
                .map(|r| self.evaluate(r, spot, rate))
                .collect()
        };

        let mut stats = ProcessingStats::default();
        let mut per_expiration: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
        let mut records = Vec::with_capacity(outcomes.len());

        for (input, outcome) in snapshot.records.iter().zip(outcomes) {
            let counts = per_expiration.entry(input.expiration).or_insert((0, 0));
            counts.1 += 1;
            match outcome {
                Ok(record) => {
                    counts.0 += 1;
                    stats.record(Ok(()));
                    records.push(record);
                }
                Err(reason) => {
                    if reason == SkipReason::NumericalFailure {
                        tracing::warn!(
                            strike = input.strike,
                            expiration = %input.expiration,
                            "Greeks not finite, contract skipped"
                        );
                    }
                    stats.record(Err(reason));
                }
            }
        }

        for (expiration, (valid, processed)) in &per_expiration {
            tracing::debug!("{}: {}/{} valid options", expiration, valid, processed);
        }

        let set = ExposureSet::new(spot, rate, records, stats);

        if set.is_empty() {
            tracing::warn!(
                "No valid gamma exposure computed ({} records processed)",
                set.stats().total
            );
        } else {
            tracing::info!(
                "Calculated exposure for {} options, valid {}/{}, non-zero gamma {}, net gamma ${:.0}",
                set.len(),
                set.stats().valid,
                set.stats().total,
                set.non_zero_gamma_count(),
                set.total_gamma_exposure()
            );
        }

        set
    }

    /// Exposure for a single record, or the reason it has none
    pub fn evaluate(
        &self,
        record: &OptionRecord,
        spot: f64,
        rate: f64,
    ) -> Result<ExposureRecord, SkipReason> {
        self.filter.check(record)?;

        // The filter guarantees both are present
        let open_interest = record.open_interest.ok_or(SkipReason::MissingOpenInterest)?;
        let iv = record
            .implied_volatility
            .ok_or(SkipReason::MissingVolatility)?;

        let time = record.time_to_expiry(self.config.day_count);
        let greeks = try_greeks(spot, record.strike, rate, iv, time, record.option_type)
            .ok_or(SkipReason::NumericalFailure)?;

        let exposures = self
            .config
            .dealer_exposures(record.option_type, open_interest, &greeks, spot);
        if !(exposures.0.is_finite() && exposures.1.is_finite() && exposures.2.is_finite()) {
            return Err(SkipReason::NumericalFailure);
        }

        Ok(exposure_from(record, open_interest, iv, greeks, exposures))
    }
}

/// Per-contract exposure with default scaling and filtering
pub fn compute_exposures(
    spot: f64,
    risk_free_rate: f64,
    records: &[OptionRecord],
) -> GexResult<Vec<ExposureRecord>> {
    let snapshot = ChainSnapshot::new(spot, risk_free_rate, records.to_vec())?;
    let set = ExposureCalculator::new().compute(&snapshot);
    Ok(set.records().to_vec())
}
