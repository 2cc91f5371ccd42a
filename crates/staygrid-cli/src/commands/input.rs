//! Shared loading and printing for the data commands.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use serde_json::Value;
use staygrid_core::{DropCounts, EngineConfig, TimelineLayoutEngine};

/// Input files common to every data command.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// JSON export of the bookings endpoint
    #[arg(long)]
    pub records: PathBuf,
    /// JSON export of the units endpoint (defaults to units seen on bookings)
    #[arg(long)]
    pub units: Option<PathBuf>,
    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub struct Sources {
    pub engine: TimelineLayoutEngine,
    pub records: Value,
    pub units: Option<Value>,
}

pub fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("invalid JSON in {}: {e}", path.display()))?;
    Ok(value)
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            Ok(EngineConfig::load_from(p)?)
        }
        None => Ok(EngineConfig::load_or_default()),
    }
}

impl SourceArgs {
    pub fn load(&self) -> Result<Sources, Box<dyn std::error::Error>> {
        let config = load_config(self.config.as_deref())?;
        let records = read_json(&self.records)?;
        let units = self.units.as_deref().map(read_json).transpose()?;
        Ok(Sources {
            engine: TimelineLayoutEngine::new(config),
            records,
            units,
        })
    }
}

/// Report records normalization skipped.
pub fn log_dropped(dropped: &DropCounts) {
    if dropped.total() == 0 {
        return;
    }
    tracing::warn!(
        total = dropped.total(),
        invalid_dates = dropped.invalid_dates,
        inverted_range = dropped.inverted_range,
        missing_unit = dropped.missing_unit,
        cancelled = dropped.cancelled,
        duplicate = dropped.duplicate,
        not_object = dropped.not_object,
        "skipped records"
    );
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
