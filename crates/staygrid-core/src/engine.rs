//! The timeline layout engine.
//!
//! A thin, stateless facade binding an [`EngineConfig`] to the timeline
//! operations. Every call recomputes from the raw input; two identical calls
//! give identical output.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::dates::DateWindow;
use crate::fields::{coerce_list, UnitFields};
use crate::timeline::{
    availability, bar_class, bar_label, catalog_units, group_by_unit, normalize,
    overlapping_pairs, place_on_grid, resolve_unit_keys, sort_for_triage, AvailabilityQuery,
    BookingRow, DropCounts, NormalizeOutcome, NormalizeRules, NormalizedStay, Placement,
    TextFilter, TriageRow, UnitInfo, UnitKey,
};

/// One day column of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub start_col: i64,
    pub end_col: i64,
}

/// A stay with its bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedStay {
    #[serde(flatten)]
    pub stay: NormalizedStay,
    /// `None` when the stay is listed but has no visible nights.
    pub placement: Option<Placement>,
    pub label: String,
    pub class: String,
}

/// One unit row of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneLayout {
    pub key: UnitKey,
    pub label: String,
    /// Catalog entry; absent for units only seen on stays.
    pub unit: Option<UnitInfo>,
    pub stays: Vec<PlacedStay>,
    /// Index pairs into `stays` that double-book the unit.
    pub conflicts: Vec<(usize, usize)>,
}

/// Full board for a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub window: DateWindow,
    pub days: Vec<DayColumn>,
    pub lanes: Vec<LaneLayout>,
    pub dropped: DropCounts,
}

impl TimelineLayout {
    pub fn stay_count(&self) -> usize {
        self.lanes.iter().map(|l| l.stays.len()).sum()
    }

    pub fn conflict_count(&self) -> usize {
        self.lanes.iter().map(|l| l.conflicts.len()).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelineLayoutEngine {
    config: EngineConfig,
}

impl TimelineLayoutEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn rules(&self) -> NormalizeRules<'_> {
        NormalizeRules {
            fields: &self.config.fields,
            kinds: &self.config.kinds,
            cancellation: &self.config.cancellation,
        }
    }

    /// Normalize a raw payload (bare array or collection envelope).
    pub fn normalize(&self, records: &Value) -> NormalizeOutcome {
        normalize(coerce_list(records), &self.rules())
    }

    /// Unit catalog from the units payload, or derived from the booking
    /// records when no payload is given.
    pub fn units(&self, units: Option<&Value>, records: &Value) -> Vec<UnitInfo> {
        match units {
            Some(raw) => catalog_units(coerce_list(raw), &self.config.fields.units),
            None => catalog_units(
                coerce_list(records),
                &UnitFields::from_records(&self.config.fields),
            ),
        }
    }

    /// Normalized stays and the catalog, with name-only stays re-keyed onto
    /// catalog ids so one unit never splits across two keys.
    fn prepare(
        &self,
        records: &Value,
        units: Option<&Value>,
    ) -> (NormalizeOutcome, Vec<UnitInfo>) {
        let mut outcome = self.normalize(records);
        let catalog = self.units(units, records);
        resolve_unit_keys(&mut outcome.stays, &catalog);
        (outcome, catalog)
    }

    /// Lay out the board for `window`, optionally filtered by free text.
    pub fn layout(
        &self,
        records: &Value,
        units: Option<&Value>,
        window: &DateWindow,
        search: &str,
    ) -> TimelineLayout {
        let (outcome, catalog) = self.prepare(records, units);

        let filter = TextFilter::new(search);
        let (catalog, stays) = if filter.is_empty() {
            (catalog, outcome.stays)
        } else {
            let shown = filter.units(&catalog);
            let keys: BTreeSet<UnitKey> = shown.iter().map(|u| u.key.clone()).collect();
            let stays = filter.stays(&outcome.stays, &keys);
            (shown, stays)
        };

        let grid = &self.config.grid;
        let lanes = group_by_unit(&stays, &catalog, window)
            .into_iter()
            .map(|(key, lane)| {
                let unit = catalog.iter().find(|u| u.key == key).cloned();
                let label = match &unit {
                    Some(u) => u.label(),
                    None => lane
                        .first()
                        .map(NormalizedStay::label)
                        .unwrap_or_else(|| key.to_string()),
                };
                let conflicts = overlapping_pairs(&lane);
                let stays = lane
                    .into_iter()
                    .map(|stay| PlacedStay {
                        placement: place_on_grid(&stay, window, grid),
                        label: bar_label(&stay),
                        class: bar_class(&stay).to_string(),
                        stay,
                    })
                    .collect();
                LaneLayout {
                    key,
                    label,
                    unit,
                    stays,
                    conflicts,
                }
            })
            .collect();

        let days = window
            .days()
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let (start_col, end_col) = grid.day_band(i);
                DayColumn {
                    date,
                    start_col,
                    end_col,
                }
            })
            .collect();

        TimelineLayout {
            window: *window,
            days,
            lanes,
            dropped: outcome.dropped,
        }
    }

    /// Bookings-table rows in triage order. Cancelled rows and rows with
    /// bad dates are kept.
    pub fn triage(&self, records: &Value) -> Vec<TriageRow<BookingRow>> {
        let rows: Vec<BookingRow> = coerce_list(records)
            .iter()
            .filter_map(|r| BookingRow::from_record(r, &self.config.fields))
            .collect();
        sort_for_triage(&rows, &self.config.ranks)
    }

    /// Units free for the query range.
    pub fn availability(
        &self,
        records: &Value,
        units: Option<&Value>,
        query: &AvailabilityQuery,
    ) -> BTreeSet<UnitKey> {
        let (outcome, catalog) = self.prepare(records, units);
        availability(&catalog, &outcome.stays, query)
    }
}
