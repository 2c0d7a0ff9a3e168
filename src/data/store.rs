//! Snapshot storage
//!
//! Saves chain snapshots as JSON so a run can be repeated offline against
//! exactly the same input.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{ChainSnapshot, GexError, GexResult};

/// Write a snapshot as pretty-printed JSON
pub fn save_snapshot(snapshot: &ChainSnapshot, path: impl AsRef<Path>) -> GexResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;

    tracing::info!(
        "Saved {} records for {} to {}",
        snapshot.records.len(),
        snapshot.underlying,
        path.display()
    );
    Ok(())
}

/// Read a snapshot, rejecting one whose spot or rate is unusable
pub fn load_snapshot(path: impl AsRef<Path>) -> GexResult<ChainSnapshot> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let snapshot: ChainSnapshot = serde_json::from_str(&json)
        .map_err(|e| GexError::data(format!("invalid snapshot {}: {}", path.display(), e)))?;
    snapshot.validate()?;

    tracing::info!(
        "Loaded {} records for {} from {}",
        snapshot.records.len(),
        snapshot.underlying,
        path.display()
    );
    Ok(snapshot)
}

/// Directory of snapshots named `<SYMBOL>_snapshot.json`
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}_snapshot.json", symbol))
    }

    pub fn save(&self, snapshot: &ChainSnapshot) -> GexResult<PathBuf> {
        let path = self.path_for(&snapshot.underlying);
        save_snapshot(snapshot, &path)?;
        Ok(path)
    }

    /// `Ok(None)` when nothing is stored for the symbol
    pub fn load(&self, symbol: &str) -> GexResult<Option<ChainSnapshot>> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Ok(None);
        }
        load_snapshot(path).map(Some)
    }

    /// Symbols with a stored snapshot, sorted
    pub fn list(&self) -> GexResult<Vec<String>> {
        let mut symbols = Vec::new();
        if !self.dir.exists() {
            return Ok(symbols);
        }

        for entry in fs::read_dir(&self.dir)? {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if let Some(symbol) = file_name.strip_suffix("_snapshot.json") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
