use chrono::Local;
use clap::Args;
use staygrid_core::dates::{parse_date_arg, parse_month_arg};
use staygrid_core::{DateWindow, WindowConfig};

use super::input::{log_dropped, print_json, SourceArgs};

#[derive(Args, Debug)]
pub struct BoardArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// First visible day (YYYY-MM-DD)
    #[arg(long, requires = "to", conflicts_with = "month")]
    pub from: Option<String>,
    /// Last visible day (YYYY-MM-DD)
    #[arg(long, requires = "from", conflicts_with = "month")]
    pub to: Option<String>,
    /// Show one calendar month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,
    /// Free-text filter on unit, city, guest or code
    #[arg(long, default_value = "")]
    pub search: String,
}

/// Explicit range, then month, then the configured rolling window.
fn resolve_window(
    from: Option<&str>,
    to: Option<&str>,
    month: Option<&str>,
    defaults: &WindowConfig,
) -> Result<DateWindow, Box<dyn std::error::Error>> {
    if let (Some(from), Some(to)) = (from, to) {
        return Ok(DateWindow::try_new(parse_date_arg(from)?, parse_date_arg(to)?)?);
    }
    if let Some(month) = month {
        return Ok(DateWindow::month_of(parse_month_arg(month)?));
    }
    Ok(defaults.around(Local::now().date_naive()))
}

pub fn run(args: BoardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sources = args.source.load()?;
    let window = resolve_window(
        args.from.as_deref(),
        args.to.as_deref(),
        args.month.as_deref(),
        &sources.engine.config().window,
    )?;
    tracing::info!(start = %window.start, end = %window.end, search = %args.search, "laying out board");

    let layout = sources
        .engine
        .layout(&sources.records, sources.units.as_ref(), &window, &args.search);
    log_dropped(&layout.dropped);
    if layout.conflict_count() > 0 {
        tracing::warn!(conflicts = layout.conflict_count(), "double-booked units in window");
    }
    print_json(&layout)
}
