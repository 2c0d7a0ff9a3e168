//! Strike × expiration exposure matrix

use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::ExposureMetric;
use crate::exposure::ExposureSet;

/// Exposure pivoted by strike (rows) and expiration (columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureMatrix {
    /// Exposure held in each cell
    pub metric: ExposureMetric,
    /// Row axis, ascending
    pub strikes: Vec<f64>,
    /// Column axis, ascending chronological
    pub expirations: Vec<NaiveDate>,
    /// Summed exposure [strike, expiration]; absent pairs are 0
    pub values: Array2<f64>,
}

impl ExposureMatrix {
    pub fn build(set: &ExposureSet, metric: ExposureMetric) -> Self {
        let records = set.canonical_records();

        let mut strikes: Vec<f64> = records.iter().map(|r| r.strike).collect();
        strikes.dedup();

        let mut expirations: Vec<NaiveDate> = records.iter().map(|r| r.expiration).collect();
        expirations.sort();
        expirations.dedup();

        let mut values = Array2::zeros((strikes.len(), expirations.len()));

        for record in &records {
            let (Ok(si), Ok(ei)) = (
                strikes.binary_search_by(|s| s.total_cmp(&record.strike)),
                expirations.binary_search(&record.expiration),
            ) else {
                continue;
            };
            values[[si, ei]] += metric.value(record);
        }

        Self {
            metric,
            strikes,
            expirations,
            values,
        }
    }

    pub fn gamma(set: &ExposureSet) -> Self {
        Self::build(set, ExposureMetric::Gamma)
    }

    /// Column labels as `YYYY-MM-DD`
    pub fn column_labels(&self) -> Vec<String> {
        self.expirations
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum over all cells
    pub fn total(&self) -> f64 {
        self.values.sum()
    }

    pub fn non_zero_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// (min, max) cell value, used for symmetric heatmap scaling
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Cell at (strike, expiration). Pairs on the axes but absent from the
    /// chain read as 0; pairs off the axes are `None`.
    pub fn cell(&self, strike: f64, expiration: NaiveDate) -> Option<f64> {
        let si = self
            .strikes
            .binary_search_by(|s| s.total_cmp(&strike))
            .ok()?;
        let ei = self.expirations.binary_search(&expiration).ok()?;
        Some(self.values[[si, ei]])
    }

    /// Totals per strike row
    pub fn row_totals(&self) -> Vec<f64> {
        self.values.rows().into_iter().map(|row| row.sum()).collect()
    }
}
