//! Option contract records
//!
//! One row of an options chain snapshot, as delivered by a market-data source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Dealer gamma sign: dealers are short call gamma and long put gamma
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => -1.0,
            OptionType::Put => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// A single contract in a chain snapshot
///
/// `open_interest` and `implied_volatility` are optional because providers
/// regularly omit them; such rows carry no exposure signal and are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Strike price
    pub strike: f64,
    /// Expiration date
    pub expiration: NaiveDate,
    /// Calendar days from the analysis date to expiration
    pub days_to_expiration: u32,
    /// Call or put
    pub option_type: OptionType,
    /// Contracts outstanding
    #[serde(default)]
    pub open_interest: Option<u64>,
    /// Annualized implied volatility
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    /// Last traded price
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Session volume
    #[serde(default)]
    pub volume: Option<u64>,
}

impl OptionRecord {
    pub fn new(
        strike: f64,
        expiration: NaiveDate,
        days_to_expiration: u32,
        option_type: OptionType,
        open_interest: u64,
        implied_volatility: f64,
    ) -> Self {
        Self {
            strike,
            expiration,
            days_to_expiration,
            option_type,
            open_interest: Some(open_interest),
            implied_volatility: Some(implied_volatility),
            last_price: None,
            volume: None,
        }
    }

    /// Build a record whose days-to-expiration is derived from an analysis date
    pub fn dated(
        strike: f64,
        expiration: NaiveDate,
        as_of: NaiveDate,
        option_type: OptionType,
        open_interest: u64,
        implied_volatility: f64,
    ) -> Self {
        Self::new(
            strike,
            expiration,
            days_between(expiration, as_of),
            option_type,
            open_interest,
            implied_volatility,
        )
    }

    pub fn with_last_price(mut self, last_price: f64) -> Self {
        self.last_price = Some(last_price);
        self
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Time to expiry in years for the given day count
    pub fn time_to_expiry(&self, day_count: f64) -> f64 {
        self.days_to_expiration as f64 / day_count
    }

    /// Is the strike within `pct` of spot (inclusive)?
    pub fn is_near(&self, spot: f64, pct: f64) -> bool {
        let band = spot * pct;
        self.strike >= spot - band && self.strike <= spot + band
    }
}

/// Calendar days from `as_of` to `expiration`; past expirations clamp to 0
pub fn days_between(expiration: NaiveDate, as_of: NaiveDate) -> u32 {
    let days = (expiration - as_of).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.sign(), -1.0);
        assert_eq!(OptionType::Put.sign(), 1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_days_between() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 1, 24).unwrap();
        assert_eq!(days_between(expiry, as_of), 4);
        // Already expired
        assert_eq!(days_between(as_of, expiry), 0);

        let rec = OptionRecord::dated(430.0, expiry, as_of, OptionType::Call, 1000, 0.18);
        assert_eq!(rec.days_to_expiration, 4);
        assert!((rec.time_to_expiry(365.0) - 4.0 / 365.0).abs() < 1e-15);
    }

    #[test]
    fn test_near_band() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let rec = OptionRecord::new(105.0, expiry, 30, OptionType::Put, 10, 0.2);
        assert!(rec.is_near(100.0, 0.05));
        assert!(!rec.is_near(100.0, 0.04));
    }

    #[test]
    fn test_serde_lowercase_type() {
        let json = r#"{"strike":100.0,"expiration":"2025-06-20","days_to_expiration":30,"option_type":"put"}"#;
        let rec: OptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.option_type, OptionType::Put);
        assert!(rec.open_interest.is_none());
        assert!(rec.implied_volatility.is_none());
    }
}
