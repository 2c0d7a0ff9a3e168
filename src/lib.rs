//! # GEX Engine - Dealer Gamma Exposure Analysis
//!
//! Computes dealer gamma, vanna and charm exposure for an options chain and
//! derives the views traders use to read market-maker hedging pressure.
//!
//! ## Overview
//!
//! Each contract is priced with Black-Scholes and its Greeks converted into
//! signed dollar exposure under a fixed dealer convention (short calls,
//! long puts). The per-contract table is then reduced into:
//! - **By strike**: net exposure per strike, with the king node
//! - **By expiration**: totals, dispersion and impact scores per expiry
//! - **Matrix**: strike × expiration grid for heatmaps and export
//! - **Levels**: resistance, support and hedging zones
//! - **Regime**: positive / negative / mixed gamma environment and flip points
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gex_engine::prelude::*;
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
//! let snapshot =
//!     generate_sample_chain("SPY", 450.0, 0.05, as_of, &SampleChainConfig::default()).unwrap();
//!
//! let report = GexAnalyzer::new().analyze(&snapshot);
//! if let Some(regime) = &report.regime {
//!     println!("{}", regime.regime);
//! }
//! for signal in &report.signals {
//!     println!("{}", signal);
//! }
//! ```
//!
//! ## What This Library Does NOT Do
//!
//! - Fetch market data (supply a [`ChainSnapshot`])
//! - Render charts
//! - Backtest or stream

pub mod aggregation;
pub mod config;
pub mod core;
pub mod data;
pub mod export;
pub mod exposure;
pub mod levels;
pub mod models;
pub mod regime;
pub mod report;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        days_between, ChainSnapshot, GexError, GexResult, Greeks, OptionRecord, OptionType,
    };

    // Configuration
    pub use crate::config::AnalysisConfig;

    // Data
    pub use crate::data::{
        generate_sample_chain, load_snapshot, sample_spot_price, save_snapshot,
        SampleChainConfig, SnapshotStore, SAMPLE_SPOT_PRICES,
    };

    // Models
    pub use crate::models::{greeks as bs_greeks, norm_cdf, norm_pdf, price as bs_price};

    // Exposure
    pub use crate::exposure::{
        compute_exposures, ChainFilter, ExposureCalculator, ExposureConfig, ExposureRecord,
        ExposureSet, ProcessingStats, SkipReason,
    };

    // Aggregation
    pub use crate::aggregation::{
        aggregate_by_expiration, ExpirationAggregate, ExposureMatrix, ExposureMetric,
        StrikeAggregate, StrikeProfile,
    };

    // Levels
    pub use crate::levels::{
        hedging_zones, identify_levels, key_levels, percentile, profile_levels, GammaLevels,
        HedgingZone, Intensity, KeyLevel, KeyLevelKind, LevelConfig, ProfileLevel, Side,
    };

    // Regime
    pub use crate::regime::{
        classify_regime, determine_regime, find_flip_points, gamma_scenarios, trading_signals,
        DealerPositioning, GammaFlipPoint, GammaScenario, MarketRegime, Regime, RegimeConfig,
        Signal,
    };

    // Report & export
    pub use crate::export::{CsvExporter, ExportKind};
    pub use crate::report::{
        compute_exposure_report, ExposureReport, GexAnalyzer, ReportStatus, ScanResult,
    };
}

// Re-export main types at crate root
pub use crate::core::{ChainSnapshot, GexError, GexResult, OptionRecord, OptionType};
pub use crate::report::{compute_exposure_report, ExposureReport, GexAnalyzer};
