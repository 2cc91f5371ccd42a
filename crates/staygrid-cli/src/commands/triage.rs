use clap::Args;

use super::input::{load_config, print_json, read_json};
use staygrid_core::TimelineLayoutEngine;

#[derive(Args, Debug)]
pub struct TriageArgs {
    /// JSON export of the bookings endpoint
    #[arg(long)]
    pub records: std::path::PathBuf,
    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
}

pub fn run(args: TriageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = TimelineLayoutEngine::new(load_config(args.config.as_deref())?);
    let records = read_json(&args.records)?;
    let rows = engine.triage(&records);
    tracing::info!(rows = rows.len(), "triage sorted");
    print_json(&rows)
}
