//! GEX CLI
//!
//! Command-line interface for the dealer gamma exposure engine.
//!
//! ```text
//! gex --sample SPY
//! gex --snapshot spy.json --strict --export-dir exports
//! gex --sample QQQ --spot 382.5 --json > report.json
//! gex --scan snapshots
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gex_engine::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "gex", author, version, about = "Dealer gamma exposure analysis")]
struct Args {
    /// Chain snapshot JSON to analyze
    #[arg(long, conflicts_with = "sample")]
    snapshot: Option<PathBuf>,

    /// Summarize every snapshot stored in this directory
    #[arg(long, conflicts_with_all = ["snapshot", "sample"])]
    scan: Option<PathBuf>,

    /// Analyze a synthetic chain for this symbol
    #[arg(long)]
    sample: Option<String>,

    /// Spot price (overrides the snapshot; required for unknown sample symbols)
    #[arg(long)]
    spot: Option<f64>,

    /// Annualized risk-free rate (overrides snapshot and config)
    #[arg(long)]
    rate: Option<f64>,

    /// Analysis date for synthetic chains (YYYY-MM-DD, default today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Analysis config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the strict record filter
    #[arg(long, default_value = "false")]
    strict: bool,

    /// Write CSV artifacts under this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Artifact to export: raw, strike, expiration, matrix, levels, summary, all
    #[arg(long, default_value = "all")]
    export: ExportKind,

    /// Save the analyzed snapshot as JSON
    #[arg(long)]
    save_snapshot: Option<PathBuf>,

    /// Print the full report as JSON instead of the summary
    #[arg(long, default_value = "false")]
    json: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if args.strict {
        config.filter = ChainFilter::strict();
    }
    if let Some(rate) = args.rate {
        config.risk_free_rate = rate;
    }
    Ok(config)
}

fn load_snapshot_arg(args: &Args, config: &AnalysisConfig) -> anyhow::Result<ChainSnapshot> {
    if let Some(path) = &args.snapshot {
        let snapshot = load_snapshot(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        if args.spot.is_none() && args.rate.is_none() {
            return Ok(snapshot);
        }
        let spot = args.spot.unwrap_or(snapshot.spot());
        let rate = args.rate.unwrap_or(snapshot.risk_free_rate());
        let mut rebuilt =
            ChainSnapshot::new(spot, rate, snapshot.records)?.with_underlying(snapshot.underlying);
        rebuilt.as_of = snapshot.as_of;
        return Ok(rebuilt);
    }

    let Some(symbol) = &args.sample else {
        bail!("nothing to analyze: pass --snapshot <FILE>, --sample <SYMBOL> or --scan <DIR>");
    };
    let symbol = symbol.to_ascii_uppercase();
    let Some(spot) = args.spot.or_else(|| sample_spot_price(&symbol)) else {
        bail!("no reference price for {}; pass --spot", symbol);
    };
    let as_of = args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    Ok(generate_sample_chain(
        &symbol,
        spot,
        config.risk_free_rate,
        as_of,
        &SampleChainConfig::default(),
    )?)
}

fn print_summary(report: &ExposureReport) {
    let name = if report.underlying.is_empty() {
        "Chain"
    } else {
        report.underlying.as_str()
    };

    println!("{} Gamma Exposure Analysis", name);
    println!("==========================\n");
    println!("  Spot: ${:.2}", report.spot);
    println!("  Rate: {:.2}%", report.risk_free_rate * 100.0);
    println!(
        "  Contracts: {}/{} valid",
        report.stats.valid, report.stats.total
    );
    for (reason, count) in &report.stats.skipped {
        println!("    skipped ({}): {}", reason.label(), count);
    }

    if !report.status.is_complete() {
        println!("\n{}", report.status.describe());
        return;
    }

    if let Some(regime) = &report.regime {
        println!("\nMarket Regime: {}", regime.regime.short_label());
        println!("  {}", regime.regime);
        println!("  Net gamma: ${:.0}", regime.net_gamma);
        println!("  Near-money gamma: ${:.0}", regime.near_money_gamma);
        for flip in &regime.gamma_flip_points {
            println!("  Flip point: ${:.2} ({})", flip.strike, flip.transition());
        }
    }

    if let Some(zero) = report.levels.as_ref().and_then(|l| l.zero_gamma_level) {
        println!("  Zero gamma level: ${:.2}", zero);
    }

    if let Some(p) = &report.positioning {
        println!("\nDealer Positioning:");
        println!("  Call gamma: ${:.0}", p.call_gamma_exposure);
        println!("  Put gamma: ${:.0}", p.put_gamma_exposure);
        println!("  ATM net gamma: ${:.0}", p.atm_net_gamma);
        println!("  Put/call gamma ratio: {:.2}", p.put_call_gamma_ratio);
    }

    if !report.key_levels.is_empty() {
        println!("\nKey Levels:");
        for level in &report.key_levels {
            println!(
                "  {:<14} ${:>9.2}  GEX ${:>14.0}  {:>5.2}% {}",
                level.kind.to_string(),
                level.strike,
                level.gamma_exposure,
                level.distance_pct,
                level.side.label()
            );
        }
    }

    if !report.scenarios.is_empty() {
        println!("\nGamma Scenarios:");
        for s in &report.scenarios {
            println!(
                "  {:+5.1}%  ${:>9.2}  net gamma ${:>14.0}",
                s.price_move_pct, s.new_price, s.net_gamma_exposure
            );
        }
    }

    if !report.signals.is_empty() {
        println!("\nSignals:");
        for signal in &report.signals {
            println!("  {}", signal);
        }
    }
}

fn run_scan(analyzer: &GexAnalyzer, dir: &Path, json: bool) -> anyhow::Result<()> {
    let results = analyzer
        .scan(&SnapshotStore::new(dir))
        .with_context(|| format!("scanning {}", dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Scanner Results:");
    for r in &results {
        let king = r
            .king_node
            .map(|k| format!("${:.0}", k))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<6} {:<8} | Price: ${:.2} | King Node: {}",
            r.symbol,
            r.regime.short_label(),
            r.current_price,
            king
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let analyzer = GexAnalyzer::with_config(load_config(&args)?)?;

    if let Some(dir) = &args.scan {
        return run_scan(&analyzer, dir, args.json);
    }

    let snapshot = load_snapshot_arg(&args, analyzer.config())?;

    if let Some(path) = &args.save_snapshot {
        save_snapshot(&snapshot, path)
            .with_context(|| format!("saving snapshot {}", path.display()))?;
    }

    let report = analyzer.analyze(&snapshot);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(dir) = &args.export_dir {
        let exporter = CsvExporter::timestamped(dir, snapshot.underlying.clone());
        let written = exporter.export(&report, args.export)?;
        if !args.json {
            println!("\nExported {} file(s) to {}", written.len(), exporter.dir().display());
        }
    }

    Ok(())
}
