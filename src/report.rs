//! GexAnalyzer - Main facade for the exposure analysis pipeline
//!
//! Runs calculation, aggregation, level identification and regime
//! classification over one snapshot and bundles every view into an
//! [`ExposureReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::{
    aggregate_by_expiration, ExpirationAggregate, ExposureMatrix, ExposureMetric, StrikeProfile,
};
use crate::config::AnalysisConfig;
use crate::core::{ChainSnapshot, GexResult, OptionRecord};
use crate::data::SnapshotStore;
use crate::exposure::{ExposureCalculator, ExposureRecord, ExposureSet, ProcessingStats};
use crate::levels::{
    hedging_zones, identify_levels, key_levels, profile_levels, GammaLevels, HedgingZone,
    KeyLevel, ProfileLevel,
};
use crate::regime::{
    classify_regime, gamma_scenarios, trading_signals, DealerPositioning, GammaScenario,
    MarketRegime, Regime, Signal,
};

/// Whether a report carries results, and if not, why
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Complete,
    /// The snapshot had no option records at all
    NoMarketData,
    /// Records were present but none passed the quality filter
    NoValidContracts,
}

impl ReportStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReportStatus::Complete)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ReportStatus::Complete => "analysis complete",
            ReportStatus::NoMarketData => "no market data available",
            ReportStatus::NoValidContracts => "market data available but no contracts passed quality filters",
        }
    }
}

/// Every derived view of one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureReport {
    pub underlying: String,
    pub spot: f64,
    pub risk_free_rate: f64,
    pub generated_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub stats: ProcessingStats,
    pub exposures: Vec<ExposureRecord>,
    pub by_strike: StrikeProfile,
    pub by_expiration: Vec<ExpirationAggregate>,
    pub gamma_matrix: ExposureMatrix,
    pub vanna_matrix: ExposureMatrix,
    pub charm_matrix: ExposureMatrix,
    pub levels: Option<GammaLevels>,
    pub key_levels: Vec<KeyLevel>,
    pub profile_levels: Vec<ProfileLevel>,
    pub hedging_zones: Vec<HedgingZone>,
    pub regime: Option<MarketRegime>,
    pub positioning: Option<DealerPositioning>,
    pub scenarios: Vec<GammaScenario>,
    pub signals: Vec<Signal>,
}

impl ExposureReport {
    pub fn is_empty(&self) -> bool {
        self.exposures.is_empty()
    }

    pub fn net_gamma_exposure(&self) -> f64 {
        self.by_strike.total_gamma_exposure()
    }
}

/// One symbol's line in a store scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub symbol: String,
    pub current_price: f64,
    pub regime: Regime,
    pub net_gamma: f64,
    pub king_node: Option<f64>,
}

/// Main analyzer that runs the full pipeline
#[derive(Debug, Clone, Default)]
pub struct GexAnalyzer {
    config: AnalysisConfig,
}

impl GexAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration, rejecting one that fails validation
    pub fn with_config(config: AnalysisConfig) -> GexResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn calculator(&self) -> ExposureCalculator {
        ExposureCalculator::with_config(self.config.exposure.clone(), self.config.filter.clone())
    }

    /// Run the full pipeline on a snapshot
    ///
    /// Empty outcomes are reported through [`ReportStatus`], never as errors.
    pub fn analyze(&self, snapshot: &ChainSnapshot) -> ExposureReport {
        let set = self.calculator().compute(snapshot);
        self.report(snapshot, &set)
    }

    /// Analyze every snapshot in a store
    ///
    /// Symbols whose snapshot fails to load or yields no regime are logged and
    /// left out; only listing the store itself can fail.
    pub fn scan(&self, store: &SnapshotStore) -> GexResult<Vec<ScanResult>> {
        let mut results = Vec::new();
        for symbol in store.list()? {
            let snapshot = match store.load(&symbol) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!("{}: {}", symbol, e);
                    continue;
                }
            };

            let report = self.analyze(&snapshot);
            let Some(regime) = &report.regime else {
                tracing::warn!("{}: {}", symbol, report.status.describe());
                continue;
            };
            tracing::info!("{}: {}", symbol, regime.regime.short_label());

            results.push(ScanResult {
                current_price: report.spot,
                regime: regime.regime,
                net_gamma: regime.net_gamma,
                king_node: report.by_strike.king_node().map(|k| k.strike),
                symbol,
            });
        }
        Ok(results)
    }

    /// Build the report for an already computed exposure set
    pub fn report(&self, snapshot: &ChainSnapshot, set: &ExposureSet) -> ExposureReport {
        let spot = set.spot();
        let status = if snapshot.is_empty() {
            ReportStatus::NoMarketData
        } else if set.is_empty() {
            ReportStatus::NoValidContracts
        } else {
            ReportStatus::Complete
        };
        if !status.is_complete() {
            tracing::warn!("{}: {}", display_name(snapshot), status.describe());
        }

        let by_strike = StrikeProfile::from_exposures(set);
        let by_expiration = aggregate_by_expiration(set);

        let levels = identify_levels(&by_strike, spot, &self.config.levels);
        let regime = classify_regime(&by_strike, spot, &self.config.regime);

        let key_levels = levels
            .as_ref()
            .map(|l| key_levels(l, &by_strike, spot))
            .unwrap_or_default();
        let signals = match (&levels, &regime) {
            (Some(l), Some(r)) => trading_signals(l, r, spot, &self.config.regime),
            _ => Vec::new(),
        };

        let (positioning, scenarios) = if set.is_empty() {
            (None, Vec::new())
        } else {
            (
                Some(DealerPositioning::from_exposures(set, &self.config.regime)),
                gamma_scenarios(set, &self.config.exposure, &self.config.regime.scenario_moves),
            )
        };

        ExposureReport {
            underlying: snapshot.underlying.clone(),
            spot,
            risk_free_rate: set.risk_free_rate(),
            generated_at: Utc::now(),
            status,
            stats: set.stats().clone(),
            exposures: set.records().to_vec(),
            gamma_matrix: ExposureMatrix::build(set, ExposureMetric::Gamma),
            vanna_matrix: ExposureMatrix::build(set, ExposureMetric::Vanna),
            charm_matrix: ExposureMatrix::build(set, ExposureMetric::Charm),
            profile_levels: profile_levels(&by_strike, spot, self.config.levels.profile_levels),
            hedging_zones: hedging_zones(&by_strike, spot, &self.config.levels),
            by_strike,
            by_expiration,
            levels,
            key_levels,
            regime,
            positioning,
            scenarios,
            signals,
        }
    }
}

fn display_name(snapshot: &ChainSnapshot) -> &str {
    if snapshot.underlying.is_empty() {
        "snapshot"
    } else {
        &snapshot.underlying
    }
}

/// Full report with default configuration
///
/// Fails only when `spot` is not a positive finite number or `risk_free_rate`
/// is not finite.
pub fn compute_exposure_report(
    spot: f64,
    risk_free_rate: f64,
    records: &[OptionRecord],
) -> GexResult<ExposureReport> {
    let snapshot = ChainSnapshot::new(spot, risk_free_rate, records.to_vec())?;
    Ok(GexAnalyzer::new().analyze(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use chrono::NaiveDate;

    fn records() -> Vec<OptionRecord> {
        let near = NaiveDate::from_ymd_opt(2025, 1, 24).unwrap();
        let far = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap();
        vec![
            OptionRecord::new(420.0, near, 4, OptionType::Put, 2500, 0.21),
            OptionRecord::new(425.0, near, 4, OptionType::Put, 1000, 0.19),
            OptionRecord::new(430.0, near, 4, OptionType::Call, 1000, 0.18),
            OptionRecord::new(440.0, near, 4, OptionType::Call, 3000, 0.17),
            OptionRecord::new(430.0, far, 32, OptionType::Call, 500, 0.2),
            OptionRecord::new(425.0, far, 32, OptionType::Put, 800, 0.22),
        ]
    }

    #[test]
    fn test_full_report() {
        let report = compute_exposure_report(428.5, 0.05, &records()).unwrap();

        assert_eq!(report.status, ReportStatus::Complete);
        assert_eq!(report.exposures.len(), 6);
        assert_eq!(report.by_strike.len(), 4);
        assert_eq!(report.by_expiration.len(), 2);
        assert_eq!(report.gamma_matrix.shape(), (4, 2));
        assert!((report.gamma_matrix.total() - report.net_gamma_exposure()).abs() < 1e-6);
        assert!(report.levels.is_some());
        assert!(report.regime.is_some());
        assert!(report.positioning.is_some());
        assert_eq!(report.scenarios.len(), 6);
        assert!(!report.key_levels.is_empty());
        assert_eq!(report.hedging_zones.len(), 4);
        assert!(matches!(report.signals.last(), Some(Signal::Regime(_))));
    }

    #[test]
    fn test_no_market_data() {
        let report = compute_exposure_report(428.5, 0.05, &[]).unwrap();
        assert_eq!(report.status, ReportStatus::NoMarketData);
        assert!(report.levels.is_none());
        assert!(report.regime.is_none());
        assert!(report.positioning.is_none());
        assert!(report.signals.is_empty());
        assert!(report.gamma_matrix.is_empty());
    }

    #[test]
    fn test_no_valid_contracts() {
        let exp = NaiveDate::from_ymd_opt(2025, 1, 24).unwrap();
        let records = vec![
            OptionRecord::new(430.0, exp, 4, OptionType::Call, 0, 0.2),
            OptionRecord::new(430.0, exp, 4, OptionType::Put, 100, 0.0),
        ];
        let report = compute_exposure_report(428.5, 0.05, &records).unwrap();
        assert_eq!(report.status, ReportStatus::NoValidContracts);
        assert_eq!(report.stats.total, 2);
        assert!(report.by_strike.is_empty());
        assert!(report.scenarios.is_empty());
    }

    #[test]
    fn test_rejects_bad_spot() {
        assert!(compute_exposure_report(-1.0, 0.05, &records()).is_err());
        assert!(compute_exposure_report(f64::NAN, 0.05, &records()).is_err());
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = AnalysisConfig::default();
        config.levels.significance_percentile = 1.5;
        assert!(matches!(
            GexAnalyzer::with_config(config),
            Err(crate::core::GexError::Config(_))
        ));

        let mut config = AnalysisConfig::default();
        config.exposure.contract_multiplier = 0.0;
        assert!(GexAnalyzer::with_config(config).is_err());

        assert!(GexAnalyzer::with_config(AnalysisConfig::strict()).is_ok());
    }

    #[test]
    fn test_scan_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let spy = ChainSnapshot::new(428.5, 0.05, records())
            .unwrap()
            .with_underlying("SPY");
        let empty = ChainSnapshot::new(100.0, 0.05, Vec::new())
            .unwrap()
            .with_underlying("EMPTY");
        store.save(&spy).unwrap();
        store.save(&empty).unwrap();
        std::fs::write(dir.path().join("BROKEN_snapshot.json"), "{").unwrap();

        let analyzer = GexAnalyzer::new();
        let results = analyzer.scan(&store).unwrap();
        assert_eq!(results.len(), 1);

        let direct = analyzer.analyze(&spy);
        let row = &results[0];
        assert_eq!(row.symbol, "SPY");
        assert_eq!(row.current_price, 428.5);
        assert_eq!(Some(row.regime), direct.regime.as_ref().map(|r| r.regime));
        assert_eq!(row.king_node, direct.by_strike.king_node().map(|k| k.strike));
    }

    #[test]
    fn test_strict_config_filters_more() {
        let exp = NaiveDate::from_ymd_opt(2025, 1, 24).unwrap();
        let mut recs = records();
        recs.push(OptionRecord::new(435.0, exp, 4, OptionType::Call, 5, 0.2));

        let snapshot = ChainSnapshot::new(428.5, 0.05, recs).unwrap();
        let loose = GexAnalyzer::new().analyze(&snapshot);
        let strict = GexAnalyzer::with_config(AnalysisConfig::strict())
            .unwrap()
            .analyze(&snapshot);

        assert_eq!(loose.exposures.len(), 7);
        // Strict requires open interest >= 10 and a volume print
        assert_eq!(strict.exposures.len(), 0);
        assert_eq!(strict.status, ReportStatus::NoValidContracts);
    }
}
