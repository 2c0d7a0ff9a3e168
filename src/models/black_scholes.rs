//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing (no dividend yield)
//! - The sensitivities dealer exposure is built from: delta, gamma, vanna, charm
//!
//! Degenerate inputs never raise. Expired contracts, zero volatility and
//! arithmetic that leaves the finite range all produce zero Greeks, so one bad
//! contract cannot abort a chain-wide calculation.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::core::{Greeks, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, vol, time) - vol * time.sqrt()
}

/// Black-Scholes European option price
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> f64 {
    if time <= 0.0 {
        return option_type.intrinsic(spot, strike);
    }

    let df = (-rate * time).exp();

    if vol <= 0.0 {
        // Zero vol = intrinsic value of the forward, discounted
        let forward = spot * (rate * time).exp();
        return df * option_type.intrinsic(forward, strike);
    }

    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d2(spot, strike, rate, vol, time);

    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

/// Greeks, or `None` when the contract is expired, has no volatility, or the
/// arithmetic leaves the finite range
pub fn try_greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> Option<Greeks> {
    if !(time > 0.0 && vol > 0.0 && spot > 0.0 && strike > 0.0) {
        return None;
    }
    if !(spot.is_finite() && strike.is_finite() && rate.is_finite()) {
        return None;
    }
    if !(vol.is_finite() && time.is_finite()) {
        return None;
    }

    let sqrt_t = time.sqrt();
    let vol_sqrt_t = vol * sqrt_t;
    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d1 - vol_sqrt_t;
    let pdf_d1 = norm_pdf(d1);

    let delta = match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };

    // Gamma (same for call and put)
    let gamma = pdf_d1 / (spot * vol_sqrt_t);

    // Vanna: d(delta)/d(vol)
    let vanna = -pdf_d1 * d2 / vol;

    // Charm: one expression for both calls and puts (no put-specific term)
    let charm = -pdf_d1 * (2.0 * rate * time - d2 * vol_sqrt_t) / (2.0 * time * vol_sqrt_t);

    let greeks = Greeks::new(delta, gamma, vanna, charm);
    greeks.is_finite().then_some(greeks)
}

/// Black-Scholes Greeks; all zero for degenerate contracts
pub fn greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> Greeks {
    try_greeks(spot, strike, rate, vol, time, option_type).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
    }

    #[test]
    fn test_bs_price() {
        // ATM call, 20% vol, 1 year, 5% rate
        let call_price = price(100.0, 100.0, 0.05, 0.20, 1.0, OptionType::Call);
        assert_relative_eq!(call_price, 10.4506, epsilon = 2e-4);

        // Put-call parity
        let put_price = price(100.0, 100.0, 0.05, 0.20, 1.0, OptionType::Put);
        let df = (-0.05_f64).exp();
        let parity = call_price - put_price - (100.0 - 100.0 * df);
        assert!(parity.abs() < 1e-9);
    }

    #[test]
    fn test_greeks() {
        let g = greeks(100.0, 100.0, 0.05, 0.20, 1.0, OptionType::Call);

        // ATM call delta should be around 0.5-0.7
        assert!(g.delta > 0.5 && g.delta < 0.7);
        assert!(g.gamma > 0.0);

        let p = greeks(100.0, 100.0, 0.05, 0.20, 1.0, OptionType::Put);
        assert_relative_eq!(g.delta - p.delta, 1.0, epsilon = 1e-12);
        assert_eq!(g.gamma, p.gamma);
        assert_eq!(g.vanna, p.vanna);
        assert_eq!(g.charm, p.charm);
    }

    #[test]
    fn test_gamma_matches_closed_form() {
        let (spot, strike, rate, vol, time) = (428.5, 430.0, 0.05, 0.18, 4.0 / 365.0);
        let g = greeks(spot, strike, rate, vol, time, OptionType::Call);

        let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt());
        let expected = (-0.5 * d1 * d1).exp() / (2.0 * PI).sqrt() / (spot * vol * time.sqrt());
        assert_relative_eq!(g.gamma, expected, max_relative = 1e-12);
        assert_relative_eq!(g.gamma, 0.048878077538706, max_relative = 1e-9);
    }

    #[test]
    fn test_vanna_and_charm_closed_form() {
        let (spot, strike, rate, vol, time) = (100.0, 110.0, 0.03, 0.25, 0.5);
        let g = greeks(spot, strike, rate, vol, time, OptionType::Call);

        let sqrt_t = time.sqrt();
        let d1 = d1(spot, strike, rate, vol, time);
        let d2 = d1 - vol * sqrt_t;
        let vanna = -norm_pdf(d1) * d2 / vol;
        let charm =
            -norm_pdf(d1) * (2.0 * rate * time - d2 * vol * sqrt_t) / (2.0 * time * vol * sqrt_t);

        assert_relative_eq!(g.vanna, vanna, max_relative = 1e-12);
        assert_relative_eq!(g.charm, charm, max_relative = 1e-12);
        // OTM call: d2 < 0, so vanna is positive
        assert!(g.vanna > 0.0);
    }

    #[test]
    fn test_degenerate_inputs_give_zero() {
        assert_eq!(greeks(100.0, 100.0, 0.05, 0.2, 0.0, OptionType::Call), Greeks::zero());
        assert_eq!(greeks(100.0, 100.0, 0.05, 0.0, 0.5, OptionType::Put), Greeks::zero());
        assert_eq!(greeks(100.0, -5.0, 0.05, 0.2, 0.5, OptionType::Call), Greeks::zero());
        assert_eq!(greeks(100.0, 100.0, f64::NAN, 0.2, 0.5, OptionType::Call), Greeks::zero());
        assert!(try_greeks(100.0, 100.0, 0.05, 0.2, -1.0, OptionType::Put).is_none());
    }

    #[test]
    fn test_extreme_strike_stays_finite() {
        // Far OTM with tiny vol: pdf underflows to zero, still finite
        let g = greeks(100.0, 1e6, 0.05, 0.01, 1.0 / 365.0, OptionType::Call);
        assert!(g.is_finite());
        assert_eq!(g.gamma, 0.0);
    }

    #[test]
    fn test_price_at_expiry_is_intrinsic() {
        assert_eq!(price(110.0, 100.0, 0.05, 0.2, 0.0, OptionType::Call), 10.0);
        assert_eq!(price(110.0, 100.0, 0.05, 0.2, 0.0, OptionType::Put), 0.0);
    }
}
