//! Booking timeline layout.
//!
//! This module provides:
//! - Normalization of raw booking records into typed stays
//! - The unit catalog and per-unit lanes
//! - Grid placement of stay bars within a visible window
//! - Triage ordering and availability search

mod availability;
mod filter;
mod grid;
mod label;
mod lanes;
mod stay;
mod triage;
mod unit;

pub use availability::{availability, AvailabilityQuery};
pub use filter::TextFilter;
pub use grid::{place_on_grid, place_range, GridConfig, Placement};
pub use label::{bar_class, bar_label, format_money, hold_expiry_label};
pub use lanes::{group_by_unit, overlapping_pairs, Lanes};
pub use stay::{
    normalize, resolve_kind, DropCounts, NormalizeOutcome, NormalizeRules, NormalizedStay,
    StayKind,
};
pub use triage::{sort_for_triage, BookingRow, TriageEntry, TriageRow};
pub use unit::{
    catalog_units, city_options, resolve_unit_keys, type_options, UnitInfo, UnitKey,
};
