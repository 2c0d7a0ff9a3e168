//! Example: Dealer exposure for a hand-built chain
//!
//! Run with: cargo run --example basic_exposure

use chrono::NaiveDate;
use gex_engine::prelude::*;

fn main() -> GexResult<()> {
    let spot = 428.5;
    let rate = 0.05;
    let exp = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap_or_default();

    let records = vec![
        OptionRecord::new(420.0, exp, 30, OptionType::Put, 12_000, 0.21),
        OptionRecord::new(425.0, exp, 30, OptionType::Put, 9_500, 0.20),
        OptionRecord::new(430.0, exp, 30, OptionType::Call, 15_000, 0.18),
        OptionRecord::new(435.0, exp, 30, OptionType::Call, 11_000, 0.17),
        // Excluded: no open interest
        OptionRecord::new(440.0, exp, 30, OptionType::Call, 0, 0.17),
    ];

    println!("=== Per-Contract Greeks ===\n");
    for r in &records {
        let iv = r.implied_volatility.unwrap_or_default();
        let g = bs_greeks(spot, r.strike, rate, iv, r.time_to_expiry(365.0), r.option_type);
        println!(
            "{:>4} {:>7.2}  gamma {:.5}  vanna {:+.5}  charm {:+.5}",
            r.option_type.label(),
            r.strike,
            g.gamma,
            g.vanna,
            g.charm
        );
    }

    let snapshot = ChainSnapshot::new(spot, rate, records)?;
    let set = ExposureCalculator::new().compute(&snapshot);
    println!(
        "\n{} of {} contracts valid ({} skipped)",
        set.stats().valid,
        set.stats().total,
        set.stats().skipped_total()
    );

    println!("\n=== Dealer Exposure ===\n");
    for r in set.records() {
        println!(
            "{:>4} {:>7.2}  GEX ${:>14.0}  VEX ${:>12.0}  CEX ${:>12.0}",
            r.option_type.label(),
            r.strike,
            r.gamma_exposure,
            r.vanna_exposure,
            r.charm_exposure
        );
    }

    let profile = StrikeProfile::from_exposures(&set);
    println!("\nNet gamma exposure: ${:.0}", profile.total_gamma_exposure());
    if let Some(king) = profile.king_node() {
        println!("King node: ${:.2} (${:.0})", king.strike, king.gamma_exposure);
    }

    Ok(())
}
