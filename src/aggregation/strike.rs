//! By-strike aggregation and king node selection

use serde::{Deserialize, Serialize};

use super::StrikeAggregate;
use crate::exposure::ExposureSet;

/// Strike-sorted exposure profile with exactly one king node (when non-empty)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeProfile {
    rows: Vec<StrikeAggregate>,
}

impl StrikeProfile {
    /// Group exposure records by strike
    pub fn from_exposures(set: &ExposureSet) -> Self {
        let mut rows: Vec<StrikeAggregate> = Vec::new();

        for record in set.canonical_records() {
            match rows.last_mut() {
                Some(row) if row.strike == record.strike => {
                    row.gamma_exposure += record.gamma_exposure;
                    row.vanna_exposure += record.vanna_exposure;
                    row.open_interest += record.open_interest;
                }
                _ => rows.push(StrikeAggregate::new(
                    record.strike,
                    record.gamma_exposure,
                    record.vanna_exposure,
                    record.open_interest,
                )),
            }
        }

        Self::finish(rows)
    }

    /// Build from precomputed (strike, gamma, vanna, open interest) totals,
    /// e.g. a reloaded by-strike export. Repeated strikes are summed.
    pub fn from_totals<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, f64, u64)>,
    {
        let mut sorted: Vec<(f64, f64, f64, u64)> = totals.into_iter().collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut rows: Vec<StrikeAggregate> = Vec::with_capacity(sorted.len());
        for (strike, gamma, vanna, oi) in sorted {
            match rows.last_mut() {
                Some(row) if row.strike == strike => {
                    row.gamma_exposure += gamma;
                    row.vanna_exposure += vanna;
                    row.open_interest += oi;
                }
                _ => rows.push(StrikeAggregate::new(strike, gamma, vanna, oi)),
            }
        }

        Self::finish(rows)
    }

    fn finish(mut rows: Vec<StrikeAggregate>) -> Self {
        for row in rows.iter_mut() {
            row.abs_gamma_exposure = row.gamma_exposure.abs();
            row.is_king_node = false;
        }

        // First strictly larger value wins, so ties go to the lowest strike
        let mut king: Option<usize> = None;
        for (i, row) in rows.iter().enumerate() {
            match king {
                Some(k) if row.abs_gamma_exposure <= rows[k].abs_gamma_exposure => {}
                _ => king = Some(i),
            }
        }
        if let Some(k) = king {
            rows[k].is_king_node = true;
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[StrikeAggregate] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StrikeAggregate> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The strike with the largest absolute gamma exposure
    pub fn king_node(&self) -> Option<&StrikeAggregate> {
        self.rows.iter().find(|r| r.is_king_node)
    }

    /// Row at an exact strike
    pub fn at(&self, strike: f64) -> Option<&StrikeAggregate> {
        self.rows
            .binary_search_by(|r| r.strike.total_cmp(&strike))
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn total_gamma_exposure(&self) -> f64 {
        self.rows.iter().map(|r| r.gamma_exposure).sum()
    }

    pub fn strikes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.strike).collect()
    }
}

impl<'a> IntoIterator for &'a StrikeProfile {
    type Item = &'a StrikeAggregate;
    type IntoIter = std::slice::Iter<'a, StrikeAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
