//! Gamma Level Identification
//!
//! Derives price levels from a [`StrikeProfile`](crate::aggregation::StrikeProfile)
//! where dealer hedging is expected to influence price behavior.
//!
//! Level types:
//! - **King node**: the strike with the largest absolute gamma exposure
//! - **Resistance / support**: significant strikes above / below spot,
//!   filtered at a percentile of absolute exposure within each side
//! - **Profile levels**: top strikes overall, split into pinning
//!   (positive gamma) and volatility catalysts (negative gamma)
//! - **Hedging zones**: every strike tagged with a hedging intensity tier

mod config;
mod identify;
mod percentile;
mod zones;

pub use config::*;
pub use identify::*;
pub use percentile::*;
pub use zones::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregation::StrikeAggregate;

/// Which side of spot a strike sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Above,
    Below,
}

impl Side {
    /// Strikes at spot count as below
    pub fn of(strike: f64, spot: f64) -> Self {
        if strike > spot {
            Side::Above
        } else {
            Side::Below
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Above => "Above",
            Side::Below => "Below",
        }
    }
}

/// Levels identified from one strike profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaLevels {
    /// Spot the levels were identified against
    pub current_price: f64,
    /// Significant strikes above spot, largest |GEX| first
    pub resistance_levels: Vec<f64>,
    /// Significant strikes below spot, largest |GEX| first
    pub support_levels: Vec<f64>,
    pub king_node: StrikeAggregate,
    /// Strike with the largest positive gamma exposure
    pub largest_positive: Option<StrikeAggregate>,
    /// Strike with the most negative gamma exposure
    pub largest_negative: Option<StrikeAggregate>,
    /// Strikes with positive gamma exposure, ascending
    pub positive_nodes: Vec<StrikeAggregate>,
    /// Strikes with negative gamma exposure, ascending
    pub negative_nodes: Vec<StrikeAggregate>,
    /// Strike whose net exposure is closest to zero; ties go to the lowest strike
    pub zero_gamma_level: Option<f64>,
    /// Net gamma exposure over all strikes
    pub total_gex: f64,
}

impl GammaLevels {
    /// Closest resistance strictly above spot
    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistance_levels
            .iter()
            .copied()
            .filter(|&s| s > self.current_price)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Closest support strictly below spot
    pub fn nearest_support(&self) -> Option<f64> {
        self.support_levels
            .iter()
            .copied()
            .filter(|&s| s < self.current_price)
            .max_by(|a, b| a.total_cmp(b))
    }
}

/// Role of a row in the key-levels table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyLevelKind {
    KingNode,
    /// 1-based rank among resistance levels
    Resistance(usize),
    /// 1-based rank among support levels
    Support(usize),
}

impl fmt::Display for KeyLevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLevelKind::KingNode => write!(f, "King Node"),
            KeyLevelKind::Resistance(n) => write!(f, "Resistance_{}", n),
            KeyLevelKind::Support(n) => write!(f, "Support_{}", n),
        }
    }
}

/// One row of the key-levels table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLevel {
    pub kind: KeyLevelKind,
    pub strike: f64,
    pub gamma_exposure: f64,
    pub vanna_exposure: f64,
    pub open_interest: u64,
    pub distance_from_current: f64,
    pub distance_pct: f64,
    pub side: Side,
}

impl KeyLevel {
    fn from_row(kind: KeyLevelKind, row: &StrikeAggregate, spot: f64) -> Self {
        Self {
            kind,
            strike: row.strike,
            gamma_exposure: row.gamma_exposure,
            vanna_exposure: row.vanna_exposure,
            open_interest: row.open_interest,
            distance_from_current: row.distance_from(spot),
            distance_pct: row.distance_pct(spot),
            side: Side::of(row.strike, spot),
        }
    }
}

/// Character of a top-exposure strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileLevelKind {
    /// Positive gamma: dealers dampen moves through the strike
    ResistanceSupport,
    /// Non-positive gamma: dealers amplify moves through the strike
    VolatilityCatalyst,
}

impl ProfileLevelKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileLevelKind::ResistanceSupport => "Resistance/Support",
            ProfileLevelKind::VolatilityCatalyst => "Volatility Catalyst",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLevel {
    pub strike: f64,
    pub gamma_exposure: f64,
    pub abs_gamma_exposure: f64,
    pub kind: ProfileLevelKind,
    pub distance_pct: f64,
    pub side: Side,
}

/// Hedging intensity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Medium => "Medium",
            Intensity::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneType {
    SupportResistance,
    VolatilityZone,
}

impl ZoneType {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneType::SupportResistance => "Support/Resistance",
            ZoneType::VolatilityZone => "Volatility Zone",
        }
    }
}

/// A strike where dealers are expected to hedge, with its intensity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgingZone {
    pub strike: f64,
    pub gamma_exposure: f64,
    pub intensity: Intensity,
    pub zone_type: ZoneType,
    pub distance_from_spot: f64,
    pub distance_pct: f64,
}
