//! Example: Key levels, regime and signals for a synthetic chain
//!
//! Run with: cargo run --example key_levels

use chrono::NaiveDate;
use gex_engine::prelude::*;

fn main() -> GexResult<()> {
    let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default();
    let spot = sample_spot_price("SPY").unwrap_or(450.0);
    let snapshot = generate_sample_chain("SPY", spot, 0.05, as_of, &SampleChainConfig::default())?;

    let report = GexAnalyzer::new().analyze(&snapshot);
    if !report.status.is_complete() {
        println!("{}", report.status.describe());
        return Ok(());
    }

    println!("=== SPY @ ${:.2} ===\n", report.spot);

    if let Some(regime) = &report.regime {
        println!("{}", regime.regime);
        println!("Net gamma: ${:.0}", regime.net_gamma);
        for flip in &regime.gamma_flip_points {
            println!("Flip: ${:.2} ({})", flip.strike, flip.transition());
        }
    }

    println!("\n=== Key Levels ===\n");
    for level in &report.key_levels {
        println!(
            "{:<14} ${:>8.2}  {:>6.2}% {}",
            level.kind.to_string(),
            level.strike,
            level.distance_pct,
            level.side.label()
        );
    }

    println!("\n=== Hedging Zones ===\n");
    for zone in &report.hedging_zones {
        println!(
            "${:>8.2}  {:<7} {:<18} GEX ${:.0}",
            zone.strike,
            zone.intensity.label(),
            zone.zone_type.label(),
            zone.gamma_exposure
        );
    }

    println!("\n=== By Expiration ===\n");
    for exp in &report.by_expiration {
        println!(
            "{} ({:>2}d)  GEX ${:>14.0}  impact {:.0}",
            exp.expiration, exp.days_to_expiration, exp.total_gamma_exposure, exp.gamma_impact_score
        );
    }

    println!("\n=== Signals ===\n");
    for signal in &report.signals {
        println!("{}", signal);
    }

    Ok(())
}
