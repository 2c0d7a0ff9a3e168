//! End-to-end tests of the exposure pipeline through the public API

use approx::assert_relative_eq;
use chrono::NaiveDate;
use gex_engine::prelude::*;
use proptest::prelude::*;
use tempfile::tempdir;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
}

fn expiry(days: u32) -> NaiveDate {
    as_of() + chrono::Duration::days(i64::from(days))
}

fn sample_report() -> ExposureReport {
    let snapshot =
        generate_sample_chain("SPY", 450.0, 0.05, as_of(), &SampleChainConfig::default()).unwrap();
    GexAnalyzer::new().analyze(&snapshot)
}

#[test]
fn test_two_contract_scenario_matches_closed_form() {
    let records = vec![
        OptionRecord::new(430.0, expiry(4), 4, OptionType::Call, 1000, 0.18),
        OptionRecord::new(425.0, expiry(4), 4, OptionType::Put, 1000, 0.19),
    ];

    let report = compute_exposure_report(428.5, 0.05, &records).unwrap();
    assert_eq!(report.status, ReportStatus::Complete);
    assert_eq!(report.exposures.len(), 2);

    let call = report
        .exposures
        .iter()
        .find(|r| r.option_type == OptionType::Call)
        .unwrap();
    let put = report
        .exposures
        .iter()
        .find(|r| r.option_type == OptionType::Put)
        .unwrap();

    // OI · Γ · 100 · S² · 0.01, short calls and long puts
    assert_relative_eq!(call.gamma_exposure, -8_974_613.792_556_32, max_relative = 1e-6);
    assert_relative_eq!(put.gamma_exposure, 7_767_533.024_866_308, max_relative = 1e-6);

    assert_relative_eq!(
        report.net_gamma_exposure(),
        -8_974_613.792_556_32 + 7_767_533.024_866_308,
        max_relative = 1e-6
    );

    let king = report.by_strike.king_node().unwrap();
    assert_eq!(king.strike, 430.0);
}

#[test]
fn test_flip_points_at_midpoints() {
    let profile = StrikeProfile::from_totals(
        [100.0, 105.0, 110.0, 115.0, 120.0]
            .into_iter()
            .zip([-5.0, 3.0, 2.0, -1.0, 4.0])
            .map(|(k, g)| (k, g, 0.0, 1)),
    );

    let flips = find_flip_points(profile.rows());
    let strikes: Vec<f64> = flips.iter().map(|f| f.strike).collect();
    assert_eq!(strikes, vec![102.5, 112.5, 117.5]);
    assert_eq!(flips[1].lower_strike, 110.0);
    assert_eq!(flips[1].upper_strike, 115.0);
}

#[test]
fn test_regime_cases() {
    assert_eq!(determine_regime(100.0, 50.0), Regime::Positive);
    assert_eq!(determine_regime(-100.0, -50.0), Regime::Negative);
    assert_eq!(determine_regime(100.0, -50.0), Regime::Mixed);

    assert_eq!(
        Regime::Positive.label(),
        "Positive Gamma Environment — Expect Lower Volatility"
    );
    assert_eq!(
        Regime::Negative.label(),
        "Negative Gamma Environment — Expect Higher Volatility"
    );
    assert_eq!(
        Regime::Mixed.label(),
        "Mixed Gamma Environment — Moderate Volatility Expected"
    );
}

#[test]
fn test_matrix_total_equals_strike_total() {
    let report = sample_report();
    assert!(report.status.is_complete());

    let by_strike = report.by_strike.total_gamma_exposure();
    assert_relative_eq!(report.gamma_matrix.total(), by_strike, max_relative = 1e-9);

    let (rows, cols) = report.gamma_matrix.shape();
    assert_eq!(rows, report.by_strike.len());
    assert_eq!(cols, report.by_expiration.len());

    let by_expiration: f64 = report
        .by_expiration
        .iter()
        .map(|e| e.total_gamma_exposure)
        .sum();
    assert_relative_eq!(by_expiration, by_strike, max_relative = 1e-9);
}

#[test]
fn test_king_node_is_unique_maximum() {
    let report = sample_report();
    let kings: Vec<&StrikeAggregate> =
        report.by_strike.iter().filter(|r| r.is_king_node).collect();
    assert_eq!(kings.len(), 1);

    let max_abs = report
        .by_strike
        .iter()
        .map(|r| r.abs_gamma_exposure)
        .fold(0.0, f64::max);
    assert_eq!(kings[0].abs_gamma_exposure, max_abs);
}

#[test]
fn test_degenerate_records_excluded() {
    let records = vec![
        OptionRecord::new(100.0, expiry(30), 30, OptionType::Call, 500, 0.0),
        OptionRecord::new(100.0, expiry(0), 0, OptionType::Put, 500, 0.25),
        OptionRecord::new(105.0, expiry(30), 30, OptionType::Call, 500, 0.22),
    ];

    let report = compute_exposure_report(100.0, 0.05, &records).unwrap();
    assert_eq!(report.exposures.len(), 1);
    assert_eq!(report.exposures[0].strike, 105.0);
    assert_eq!(report.stats.skipped_for(SkipReason::NonPositiveVolatility), 1);
    assert_eq!(report.stats.skipped_for(SkipReason::Expired), 1);

    for row in &report.by_strike {
        assert!(row.gamma_exposure.is_finite());
        assert!(row.vanna_exposure.is_finite());
    }
    assert!(report.gamma_matrix.total().is_finite());
}

#[test]
fn test_zero_time_greeks_are_zero() {
    let g = bs_greeks(100.0, 100.0, 0.05, 0.2, 0.0, OptionType::Call);
    assert_eq!(g.gamma, 0.0);
    assert_eq!(g.vanna, 0.0);
    assert_eq!(g.charm, 0.0);
}

#[test]
fn test_empty_outcomes_are_distinguished() {
    let empty = compute_exposure_report(100.0, 0.05, &[]).unwrap();
    assert_eq!(empty.status, ReportStatus::NoMarketData);
    assert!(empty.regime.is_none());
    assert!(empty.signals.is_empty());

    let filtered = compute_exposure_report(
        100.0,
        0.05,
        &[OptionRecord::new(100.0, expiry(30), 30, OptionType::Call, 0, 0.2)],
    )
    .unwrap();
    assert_eq!(filtered.status, ReportStatus::NoValidContracts);
    assert!(filtered.by_strike.is_empty());
    assert!(filtered.gamma_matrix.is_empty());

    assert!(compute_exposure_report(f64::NAN, 0.05, &[]).is_err());
}

#[test]
fn test_sample_chain_end_to_end() {
    let report = sample_report();

    assert_eq!(report.stats.total, 120);
    assert_eq!(report.stats.valid, 120);
    assert_eq!(report.by_expiration.len(), 3);
    assert!(report.by_expiration.windows(2).all(|w| {
        w[0].days_to_expiration <= w[1].days_to_expiration
    }));

    let levels = report.levels.as_ref().unwrap();
    assert!(levels.resistance_levels.len() <= 3);
    assert!(levels.support_levels.len() <= 3);
    assert!(levels.resistance_levels.iter().all(|s| *s > 450.0));
    assert!(levels.support_levels.iter().all(|s| *s < 450.0));

    assert!(report
        .key_levels
        .iter()
        .any(|l| l.kind == KeyLevelKind::KingNode));
    assert!(report
        .key_levels
        .windows(2)
        .all(|w| w[0].distance_from_current <= w[1].distance_from_current));

    let regime = report.regime.as_ref().unwrap();
    assert_relative_eq!(
        regime.net_gamma,
        regime.total_positive_gamma + regime.total_negative_gamma,
        max_relative = 1e-9
    );
    assert!(report
        .signals
        .iter()
        .any(|s| matches!(s, Signal::Regime(r) if *r == regime.regime)));

    assert_eq!(report.scenarios.len(), 6);

    let json = serde_json::to_string(&report).unwrap();
    let back: ExposureReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.by_strike.strikes(), report.by_strike.strikes());
    assert_eq!(back.status, report.status);
}

#[test]
fn test_export_all_artifacts() {
    let report = sample_report();
    let dir = tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path(), "SPY");

    let written = exporter.export(&report, ExportKind::All).unwrap();
    assert_eq!(written.len(), ExportKind::ARTIFACTS.len());
    for path in &written {
        assert!(path.exists());
    }

    let raw = std::fs::read_to_string(exporter.path_for(ExportKind::Raw)).unwrap();
    assert_eq!(raw.lines().count(), 1 + report.exposures.len());
}

#[test]
fn test_snapshot_reload_gives_same_report() {
    let snapshot =
        generate_sample_chain("QQQ", 380.0, 0.05, as_of(), &SampleChainConfig::default()).unwrap();
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.save(&snapshot).unwrap();

    let reloaded = store.load("QQQ").unwrap().unwrap();
    assert_eq!(reloaded.records, snapshot.records);

    let analyzer = GexAnalyzer::new();
    let a = analyzer.analyze(&snapshot);
    let b = analyzer.analyze(&reloaded);

    assert_eq!(a.by_strike, b.by_strike);
    assert_eq!(a.regime, b.regime);
}

fn record_strategy() -> impl Strategy<Value = OptionRecord> {
    (
        0usize..8,
        prop::sample::select(vec![4u32, 11, 32]),
        any::<bool>(),
        1u64..5000,
        0.05f64..0.8,
    )
        .prop_map(|(k, dte, is_call, oi, iv)| {
            let option_type = if is_call {
                OptionType::Call
            } else {
                OptionType::Put
            };
            OptionRecord::new(90.0 + 2.5 * k as f64, expiry(dte), dte, option_type, oi, iv)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Aggregates do not depend on the order contracts arrive in
    #[test]
    fn aggregation_is_order_independent(
        (original, shuffled) in prop::collection::vec(record_strategy(), 1..40)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = compute_exposure_report(100.0, 0.05, &original).unwrap();
        let b = compute_exposure_report(100.0, 0.05, &shuffled).unwrap();

        prop_assert_eq!(&a.by_strike, &b.by_strike);
        prop_assert_eq!(&a.by_expiration, &b.by_expiration);
        prop_assert_eq!(a.gamma_matrix.total(), b.gamma_matrix.total());
        prop_assert_eq!(&a.regime, &b.regime);
    }

    /// Calls never add dealer gamma, puts never remove it
    #[test]
    fn gamma_sign_follows_option_type(
        records in prop::collection::vec(record_strategy(), 1..40),
        spot in 80.0f64..120.0,
    ) {
        let report = compute_exposure_report(spot, 0.05, &records).unwrap();
        prop_assert_eq!(report.exposures.len(), records.len());

        for r in &report.exposures {
            prop_assert!(r.greeks.gamma >= 0.0);
            match r.option_type {
                OptionType::Call => prop_assert!(r.gamma_exposure <= 0.0),
                OptionType::Put => prop_assert!(r.gamma_exposure >= 0.0),
            }
        }
    }
}
