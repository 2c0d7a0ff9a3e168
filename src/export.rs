//! CSV export
//!
//! Writes the tabular artifacts of an [`ExposureReport`]:
//! raw per-contract exposure, by strike, by expiration, the strike ×
//! expiration gamma matrix, key levels and a one-row market summary.
//!
//! Every artifact is available over any [`std::io::Write`]; [`CsvExporter`] adds
//! file naming under an export directory.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::Writer as CsvWriter;

use crate::core::{GexError, GexResult};
use crate::levels::Side;
use crate::report::ExposureReport;

/// Which artifact to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Raw,
    ByStrike,
    ByExpiration,
    Matrix,
    KeyLevels,
    Summary,
    All,
}

impl ExportKind {
    /// Single artifacts, in export order
    pub const ARTIFACTS: [ExportKind; 6] = [
        ExportKind::Raw,
        ExportKind::ByStrike,
        ExportKind::ByExpiration,
        ExportKind::Matrix,
        ExportKind::KeyLevels,
        ExportKind::Summary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExportKind::Raw => "raw",
            ExportKind::ByStrike => "strike",
            ExportKind::ByExpiration => "expiration",
            ExportKind::Matrix => "matrix",
            ExportKind::KeyLevels => "levels",
            ExportKind::Summary => "summary",
            ExportKind::All => "all",
        }
    }

    /// File name suffix after the symbol
    fn file_suffix(&self) -> &'static str {
        match self {
            ExportKind::Raw => "raw_gamma_data",
            ExportKind::ByStrike => "gamma_by_strike",
            ExportKind::ByExpiration => "gamma_by_expiration",
            ExportKind::Matrix => "gamma_matrix",
            ExportKind::KeyLevels => "key_levels",
            ExportKind::Summary => "market_summary",
            ExportKind::All => "all",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportKind {
    type Err = GexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(ExportKind::Raw),
            "strike" | "by-strike" => Ok(ExportKind::ByStrike),
            "expiration" | "by-expiration" => Ok(ExportKind::ByExpiration),
            "matrix" => Ok(ExportKind::Matrix),
            "levels" | "key-levels" => Ok(ExportKind::KeyLevels),
            "summary" => Ok(ExportKind::Summary),
            "all" => Ok(ExportKind::All),
            other => Err(GexError::invalid_input(format!(
                "unknown export kind '{}' (expected raw, strike, expiration, matrix, levels, summary or all)",
                other
            ))),
        }
    }
}

fn timestamp(report: &ExposureReport) -> String {
    report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn opt<T: fmt::Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Per-contract exposure with Greeks
pub fn write_raw_exposures<W: Write>(w: W, report: &ExposureReport) -> GexResult<()> {
    let mut wtr = CsvWriter::from_writer(w);
    wtr.write_record([
        "symbol",
        "analysis_timestamp",
        "current_price",
        "expiration",
        "days_to_expiration",
        "strike",
        "type",
        "gamma_exposure",
        "vanna_exposure",
        "charm_exposure",
        "open_interest",
        "implied_volatility",
        "delta",
        "gamma",
        "vanna",
        "charm",
        "last_price",
        "volume",
    ])?;

    let ts = timestamp(report);
    for r in &report.exposures {
        wtr.write_record([
            report.underlying.clone(),
            ts.clone(),
            report.spot.to_string(),
            r.expiration.format("%Y-%m-%d").to_string(),
            r.days_to_expiration.to_string(),
            r.strike.to_string(),
            r.option_type.label().to_string(),
            r.gamma_exposure.to_string(),
            r.vanna_exposure.to_string(),
            r.charm_exposure.to_string(),
            r.open_interest.to_string(),
            r.implied_volatility.to_string(),
            r.greeks.delta.to_string(),
            r.greeks.gamma.to_string(),
            r.greeks.vanna.to_string(),
            r.greeks.charm.to_string(),
            opt(r.last_price),
            opt(r.volume),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Strike totals with distance from spot
pub fn write_by_strike<W: Write>(w: W, report: &ExposureReport) -> GexResult<()> {
    let mut wtr = CsvWriter::from_writer(w);
    wtr.write_record([
        "symbol",
        "analysis_timestamp",
        "current_price",
        "strike",
        "gamma_exposure",
        "vanna_exposure",
        "open_interest",
        "abs_gamma_exposure",
        "is_king_node",
        "distance_from_current",
        "distance_pct",
        "above_below_current",
    ])?;

    let ts = timestamp(report);
    for row in &report.by_strike {
        wtr.write_record([
            report.underlying.clone(),
            ts.clone(),
            report.spot.to_string(),
            row.strike.to_string(),
            row.gamma_exposure.to_string(),
            row.vanna_exposure.to_string(),
            row.open_interest.to_string(),
            row.abs_gamma_exposure.to_string(),
            row.is_king_node.to_string(),
            row.distance_from(report.spot).to_string(),
            row.distance_pct(report.spot).to_string(),
            Side::of(row.strike, report.spot).label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_by_expiration<W: Write>(w: W, report: &ExposureReport) -> GexResult<()> {
    let mut wtr = CsvWriter::from_writer(w);
    wtr.write_record([
        "symbol",
        "analysis_timestamp",
        "current_price",
        "expiration",
        "days_to_expiration",
        "options_count",
        "total_gamma_exposure",
        "avg_gamma_exposure",
        "std_gamma_exposure",
        "total_vanna_exposure",
        "avg_vanna_exposure",
        "total_open_interest",
        "gamma_impact_score",
    ])?;

    let ts = timestamp(report);
    for row in &report.by_expiration {
        wtr.write_record([
            report.underlying.clone(),
            ts.clone(),
            report.spot.to_string(),
            row.expiration.format("%Y-%m-%d").to_string(),
            row.days_to_expiration.to_string(),
            row.options_count.to_string(),
            row.total_gamma_exposure.to_string(),
            row.avg_gamma_exposure.to_string(),
            row.std_gamma_exposure.to_string(),
            row.total_vanna_exposure.to_string(),
            row.avg_vanna_exposure.to_string(),
            row.total_open_interest.to_string(),
            row.gamma_impact_score.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Gamma matrix preceded by `#` metadata lines
pub fn write_gamma_matrix<W: Write>(mut w: W, report: &ExposureReport) -> GexResult<()> {
    let m = &report.gamma_matrix;
    let (rows, cols) = m.shape();

    writeln!(w, "# Gamma Exposure Matrix for {}", report.underlying)?;
    writeln!(w, "# Analysis Date: {}", timestamp(report))?;
    writeln!(w, "# Current Price: ${:.2}", report.spot)?;
    writeln!(w, "# Values in USD ({} Exposure)", m.metric.label())?;
    writeln!(w, "# Rows: Strike Prices")?;
    writeln!(w, "# Columns: Expiration Dates")?;
    writeln!(w, "# Matrix Size: {} strikes x {} expirations", rows, cols)?;
    writeln!(w, "# Non-zero values: {}", m.non_zero_count())?;
    writeln!(w, "#")?;

    let mut wtr = CsvWriter::from_writer(&mut w);
    let mut header = vec!["strike".to_string()];
    header.extend(m.column_labels());
    wtr.write_record(&header)?;

    for (strike, row) in m.strikes.iter().zip(m.values.rows()) {
        let mut record = vec![strike.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_key_levels<W: Write>(w: W, report: &ExposureReport) -> GexResult<()> {
    let mut wtr = CsvWriter::from_writer(w);
    wtr.write_record([
        "symbol",
        "analysis_timestamp",
        "current_price",
        "level_type",
        "strike",
        "gamma_exposure",
        "vanna_exposure",
        "open_interest",
        "distance_from_current",
        "distance_pct",
        "above_below",
    ])?;

    let ts = timestamp(report);
    for level in &report.key_levels {
        wtr.write_record([
            report.underlying.clone(),
            ts.clone(),
            report.spot.to_string(),
            level.kind.to_string(),
            level.strike.to_string(),
            level.gamma_exposure.to_string(),
            level.vanna_exposure.to_string(),
            level.open_interest.to_string(),
            level.distance_from_current.to_string(),
            level.distance_pct.to_string(),
            level.side.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One-row regime summary; empty body when no regime was classified
pub fn write_market_summary<W: Write>(w: W, report: &ExposureReport) -> GexResult<()> {
    let mut wtr = CsvWriter::from_writer(w);
    wtr.write_record([
        "symbol",
        "analysis_timestamp",
        "current_price",
        "market_regime",
        "net_gamma_exposure",
        "total_positive_gamma",
        "total_negative_gamma",
        "near_money_gamma",
        "gamma_flip_points_count",
        "gamma_flip_points",
    ])?;

    if let Some(regime) = &report.regime {
        let flips = if regime.gamma_flip_points.is_empty() {
            "None".to_string()
        } else {
            regime
                .gamma_flip_points
                .iter()
                .map(|p| format!("${:.0}", p.strike))
                .collect::<Vec<_>>()
                .join("; ")
        };
        wtr.write_record([
            report.underlying.clone(),
            timestamp(report),
            report.spot.to_string(),
            regime.regime.label().to_string(),
            regime.net_gamma.to_string(),
            regime.total_positive_gamma.to_string(),
            regime.total_negative_gamma.to_string(),
            regime.near_money_gamma.to_string(),
            regime.gamma_flip_points.len().to_string(),
            flips,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes report artifacts as files under one directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
    symbol: String,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            dir: dir.into(),
            symbol: if symbol.is_empty() {
                "GEX".to_string()
            } else {
                symbol
            },
        }
    }

    /// `gamma_exports_<SYMBOL>_<YYYYmmdd_HHMMSS>` under `root`
    pub fn timestamped(root: impl AsRef<Path>, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let dir = root
            .as_ref()
            .join(format!("gamma_exports_{}_{}", symbol, stamp));
        Self::new(dir, symbol)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: ExportKind) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", self.symbol, kind.file_suffix()))
    }

    /// Export one artifact (or all of them)
    ///
    /// Artifacts with no rows are skipped, so the returned list only names
    /// files that were written.
    pub fn export(&self, report: &ExposureReport, kind: ExportKind) -> GexResult<Vec<PathBuf>> {
        let kinds: Vec<ExportKind> = match kind {
            ExportKind::All => ExportKind::ARTIFACTS.to_vec(),
            single => vec![single],
        };

        if self.dir.exists() && !self.dir.is_dir() {
            return Err(GexError::export(format!(
                "{} exists and is not a directory",
                self.dir.display()
            )));
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            tracing::info!("Created export directory {}", self.dir.display());
        }

        let mut written = Vec::new();
        for kind in kinds {
            if !has_rows(report, kind) {
                tracing::warn!("No {} data to export for {}", kind, self.symbol);
                continue;
            }
            let path = self.path_for(kind);
            let mut file = BufWriter::new(File::create(&path)?);
            match kind {
                ExportKind::Raw => write_raw_exposures(&mut file, report)?,
                ExportKind::ByStrike => write_by_strike(&mut file, report)?,
                ExportKind::ByExpiration => write_by_expiration(&mut file, report)?,
                ExportKind::Matrix => write_gamma_matrix(&mut file, report)?,
                ExportKind::KeyLevels => write_key_levels(&mut file, report)?,
                ExportKind::Summary => write_market_summary(&mut file, report)?,
                ExportKind::All => continue,
            }
            file.flush()?;
            tracing::info!("Exported {} to {}", kind, path.display());
            written.push(path);
        }

        Ok(written)
    }
}

fn has_rows(report: &ExposureReport, kind: ExportKind) -> bool {
    match kind {
        ExportKind::Raw => !report.exposures.is_empty(),
        ExportKind::ByStrike => !report.by_strike.is_empty(),
        ExportKind::ByExpiration => !report.by_expiration.is_empty(),
        ExportKind::Matrix => !report.gamma_matrix.is_empty(),
        ExportKind::KeyLevels => !report.key_levels.is_empty(),
        ExportKind::Summary => report.regime.is_some(),
        ExportKind::All => true,
    }
}
