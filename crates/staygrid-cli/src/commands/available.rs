use clap::Args;
use serde::Serialize;
use staygrid_core::dates::parse_date_arg;
use staygrid_core::{AvailabilityQuery, DateWindow, UnitInfo, ValidationError};

use super::input::{print_json, SourceArgs};

#[derive(Args, Debug)]
pub struct AvailableArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Arrival day (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: String,
    /// Departure day (YYYY-MM-DD), exclusive
    #[arg(long)]
    pub check_out: String,
    /// Only units in this city ("All" for any)
    #[arg(long)]
    pub city: Option<String>,
    /// Only units of this type ("Any" for any)
    #[arg(long = "type")]
    pub unit_type: Option<String>,
}

#[derive(Serialize)]
struct AvailableReport {
    available: Vec<UnitInfo>,
    /// Month to show next, centred on the check-in.
    window: DateWindow,
}

pub fn run(args: AvailableArgs) -> Result<(), Box<dyn std::error::Error>> {
    let check_in = parse_date_arg(&args.check_in)?;
    let check_out = parse_date_arg(&args.check_out)?;
    if check_out <= check_in {
        return Err(ValidationError::InvalidDateRange {
            start: check_in,
            end: check_out,
        }
        .into());
    }
    let query = AvailabilityQuery {
        check_in,
        check_out,
        city: args.city,
        unit_type: args.unit_type,
    };

    let sources = args.source.load()?;
    let free = sources
        .engine
        .availability(&sources.records, sources.units.as_ref(), &query);
    let available: Vec<UnitInfo> = sources
        .engine
        .units(sources.units.as_ref(), &sources.records)
        .into_iter()
        .filter(|u| free.contains(&u.key))
        .collect();
    tracing::info!(found = available.len(), %check_in, %check_out, "availability search");

    print_json(&AvailableReport {
        available,
        window: DateWindow::month_of(check_in),
    })
}
