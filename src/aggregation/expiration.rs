//! By-expiration aggregation

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::ExpirationAggregate;
use crate::exposure::{ExposureRecord, ExposureSet};

/// Group exposure by expiration date, nearest expiry first
pub fn aggregate_by_expiration(set: &ExposureSet) -> Vec<ExpirationAggregate> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ExposureRecord>> = BTreeMap::new();
    for record in set.canonical_records() {
        groups.entry(record.expiration).or_default().push(record);
    }

    let mut out: Vec<ExpirationAggregate> = groups
        .into_iter()
        .map(|(expiration, records)| summarize(expiration, &records))
        .collect();

    out.sort_by(|a, b| {
        a.days_to_expiration
            .cmp(&b.days_to_expiration)
            .then(a.expiration.cmp(&b.expiration))
    });
    out
}

fn summarize(expiration: NaiveDate, records: &[&ExposureRecord]) -> ExpirationAggregate {
    let count = records.len();
    let n = count as f64;
    let days_to_expiration = records.first().map_or(0, |r| r.days_to_expiration);

    let total_gamma: f64 = records.iter().map(|r| r.gamma_exposure).sum();
    let total_vanna: f64 = records.iter().map(|r| r.vanna_exposure).sum();
    let total_oi: u64 = records.iter().map(|r| r.open_interest).sum();

    let avg_gamma = if count > 0 { total_gamma / n } else { 0.0 };
    let avg_vanna = if count > 0 { total_vanna / n } else { 0.0 };

    let std_gamma = if count > 1 {
        let ss: f64 = records
            .iter()
            .map(|r| (r.gamma_exposure - avg_gamma).powi(2))
            .sum();
        (ss / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    ExpirationAggregate {
        expiration,
        days_to_expiration,
        options_count: count,
        total_gamma_exposure: total_gamma,
        avg_gamma_exposure: avg_gamma,
        std_gamma_exposure: std_gamma,
        total_vanna_exposure: total_vanna,
        avg_vanna_exposure: avg_vanna,
        total_open_interest: total_oi,
        gamma_impact_score: total_gamma.abs() / days_to_expiration.max(1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use crate::exposure::ProcessingStats;

    fn rec(day: u32, dte: u32, gex: f64, vex: f64, oi: u64) -> ExposureRecord {
        let exp = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        ExposureRecord::synthetic(100.0 + gex / 100.0, exp, dte, OptionType::Call, oi, (gex, vex, 0.0))
    }

    #[test]
    fn test_totals_and_dispersion() {
        let set = ExposureSet::new(
            100.0,
            0.05,
            vec![
                rec(21, 20, 100.0, 10.0, 5),
                rec(7, 6, -400.0, 4.0, 1),
                rec(21, 20, 300.0, 30.0, 7),
                rec(7, 6, -200.0, 2.0, 3),
            ],
            ProcessingStats::default(),
        );

        let rows = aggregate_by_expiration(&set);
        assert_eq!(rows.len(), 2);

        let near = &rows[0];
        assert_eq!(near.days_to_expiration, 6);
        assert_eq!(near.options_count, 2);
        assert!((near.total_gamma_exposure + 600.0).abs() < 1e-9);
        assert!((near.avg_gamma_exposure + 300.0).abs() < 1e-9);
        // sample std of [-400, -200]
        assert!((near.std_gamma_exposure - 141.421_356_237).abs() < 1e-6);
        assert_eq!(near.total_open_interest, 4);
        assert!((near.gamma_impact_score - 100.0).abs() < 1e-9);

        let far = &rows[1];
        assert!((far.total_vanna_exposure - 40.0).abs() < 1e-9);
        assert!((far.avg_vanna_exposure - 20.0).abs() < 1e-9);
        assert!((far.gamma_impact_score - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_option_has_zero_std() {
        let set = ExposureSet::new(
            100.0,
            0.05,
            vec![rec(3, 0, 50.0, 1.0, 1)],
            ProcessingStats::default(),
        );
        let rows = aggregate_by_expiration(&set);
        assert_eq!(rows[0].std_gamma_exposure, 0.0);
        // Zero DTE divides by one
        assert!((rows[0].gamma_impact_score - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        let set = ExposureSet::new(100.0, 0.05, Vec::new(), ProcessingStats::default());
        assert!(aggregate_by_expiration(&set).is_empty());
    }
}
