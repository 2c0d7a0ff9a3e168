//! Synthetic option chains for demos and offline runs
//!
//! Generates a deterministic chain around a spot price: an even strike grid,
//! a volatility smile, and open interest that concentrates near the money and
//! in the front expiry.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::{ChainSnapshot, GexResult, OptionRecord, OptionType};
use crate::models::price;

/// Reference spot prices for common tickers
pub const SAMPLE_SPOT_PRICES: [(&str, f64); 10] = [
    ("SPY", 450.00),
    ("QQQ", 380.00),
    ("AAPL", 175.00),
    ("TSLA", 250.00),
    ("NVDA", 500.00),
    ("IWM", 200.00),
    ("DIA", 350.00),
    ("AMZN", 145.00),
    ("MSFT", 375.00),
    ("GOOGL", 140.00),
];

/// Reference spot for a ticker, case-insensitive
pub fn sample_spot_price(symbol: &str) -> Option<f64> {
    SAMPLE_SPOT_PRICES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, p)| *p)
}

/// Shape of a generated chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleChainConfig {
    /// Strikes spread evenly over ±`strike_range` around spot
    pub num_strikes: usize,
    /// Fraction of spot. Default: 0.20
    pub strike_range: f64,
    /// Days to expiration of each generated expiry
    pub expirations: Vec<u32>,
    /// At-the-money implied volatility. Default: 0.20
    pub base_iv: f64,
    /// Open interest of an at-the-money contract in a 60-day expiry
    pub base_open_interest: f64,
    /// Floor applied to every contract's open interest
    pub min_open_interest: u64,
    pub seed: u64,
}

impl Default for SampleChainConfig {
    fn default() -> Self {
        Self {
            num_strikes: 20,
            strike_range: 0.20,
            expirations: vec![7, 30, 60],
            base_iv: 0.20,
            base_open_interest: 5000.0,
            min_open_interest: 100,
            seed: 42,
        }
    }
}

/// Build a synthetic snapshot for `symbol`
///
/// Identical inputs always produce an identical chain.
pub fn generate_sample_chain(
    symbol: &str,
    spot: f64,
    risk_free_rate: f64,
    as_of: NaiveDate,
    config: &SampleChainConfig,
) -> GexResult<ChainSnapshot> {
    // Validate scalars before generating anything
    ChainSnapshot::new(spot, risk_free_rate, Vec::new())?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let strikes = strike_grid(spot, config.strike_range, config.num_strikes);
    let mut records = Vec::with_capacity(strikes.len() * config.expirations.len() * 2);

    for &dte in &config.expirations {
        let expiration = as_of + Duration::days(i64::from(dte));
        let time = dte as f64 / 365.0;
        let front_weight = 60.0 / f64::from(dte.max(1));

        for &strike in &strikes {
            let moneyness = (strike - spot) / spot;

            // OTM wings carry more volatility; the call wing is steeper above spot
            let wing = moneyness.abs();
            let (call_iv, put_iv) = if moneyness > 0.0 {
                (config.base_iv + wing * 0.3, config.base_iv + wing * 0.2)
            } else {
                (config.base_iv + wing * 0.2, config.base_iv + wing * 0.3)
            };

            let atm_factor = (-10.0 * moneyness * moneyness).exp();
            let base_oi = config.base_open_interest * atm_factor * front_weight;

            for (option_type, iv, jitter) in [
                (OptionType::Call, call_iv, rng.random_range(0.8..1.2)),
                (OptionType::Put, put_iv, rng.random_range(0.9..1.3)),
            ] {
                let oi = ((base_oi * jitter) as u64).max(config.min_open_interest);
                let volume = ((oi as f64 * rng.random_range(0.05..0.15)) as u64).max(10);
                let last_price = price(spot, strike, risk_free_rate, iv, time, option_type).max(0.01);

                records.push(
                    OptionRecord::new(strike, expiration, dte, option_type, oi, iv)
                        .with_last_price(last_price)
                        .with_volume(volume),
                );
            }
        }
    }

    tracing::info!(
        "Generated {} sample contracts for {} around ${:.2}",
        records.len(),
        symbol,
        spot
    );

    Ok(ChainSnapshot::new(spot, risk_free_rate, records)?
        .with_underlying(symbol)
        .with_as_of(as_of))
}

/// Evenly spaced strikes over spot ± range, rounded to cents
fn strike_grid(spot: f64, range: f64, n: usize) -> Vec<f64> {
    let lo = spot * (1.0 - range);
    let hi = spot * (1.0 + range);
    match n {
        0 => Vec::new(),
        1 => vec![round_cents(spot)],
        _ => (0..n)
            .map(|i| round_cents(lo + (hi - lo) * i as f64 / (n - 1) as f64))
            .collect(),
    }
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
