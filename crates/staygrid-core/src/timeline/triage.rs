//! Priority ordering for the bookings table.
//!
//! Rows are grouped by status rank (ongoing, upcoming, past, cancelled,
//! unknown). Inside the first two groups the next arrival comes first;
//! inside the rest the most recent departure comes first. Rows missing the
//! relevant date go to the end of their group.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stay::NormalizedStay;
use crate::dates::parse_local_date;
use crate::fields::{self, FieldTable};
use crate::vocab::StatusRankTable;

/// Anything that can be placed in the triage list.
pub trait TriageEntry {
    fn triage_status(&self) -> Option<&str>;
    fn triage_check_in(&self) -> Option<NaiveDate>;
    fn triage_check_out(&self) -> Option<NaiveDate>;
    /// Label compared case-insensitively (the unit name).
    fn triage_label(&self) -> String;
    fn triage_id(&self) -> Option<&str>;
}

impl TriageEntry for NormalizedStay {
    fn triage_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn triage_check_in(&self) -> Option<NaiveDate> {
        Some(self.check_in)
    }

    fn triage_check_out(&self) -> Option<NaiveDate> {
        Some(self.check_out)
    }

    fn triage_label(&self) -> String {
        self.label()
    }

    fn triage_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// A bookings-table row read straight from a raw record.
///
/// Unlike [`NormalizedStay`] it keeps cancelled rows and rows with missing
/// or unparsable dates, since the table lists everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: Option<String>,
    pub unit_name: String,
    pub guest: Option<String>,
    pub status: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

impl BookingRow {
    /// Read a row; non-object records yield `None`.
    pub fn from_record(record: &Value, map: &FieldTable) -> Option<Self> {
        if !record.is_object() {
            return None;
        }
        let date = |keys: &[String]| fields::text(record, keys).and_then(|s| parse_local_date(&s));
        Some(Self {
            id: fields::text(record, &map.id),
            unit_name: fields::text(record, &map.unit_name)
                .or_else(|| fields::integer(record, &map.unit_id).map(|id| id.to_string()))
                .unwrap_or_default(),
            guest: fields::text(record, &map.guest),
            status: fields::text(record, &map.status),
            check_in: date(&map.check_in),
            check_out: date(&map.check_out),
        })
    }
}

impl TriageEntry for BookingRow {
    fn triage_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn triage_check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    fn triage_check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    fn triage_label(&self) -> String {
        self.unit_name.clone()
    }

    fn triage_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// An entry with its computed rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageRow<T> {
    pub rank: u8,
    #[serde(flatten)]
    pub entry: T,
}

/// Present dates before missing ones.
fn present_first(a: Option<NaiveDate>, b: Option<NaiveDate>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare<T: TriageEntry>(a: &TriageRow<T>, b: &TriageRow<T>, ranks: &StatusRankTable) -> Ordering {
    let by_rank = a.rank.cmp(&b.rank);
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    let (x, y) = (&a.entry, &b.entry);
    let by_date = if ranks.orders_by_check_in(a.rank) {
        present_first(x.triage_check_in(), y.triage_check_in(), false)
            .then_with(|| present_first(x.triage_check_out(), y.triage_check_out(), false))
    } else {
        present_first(x.triage_check_out(), y.triage_check_out(), true)
            .then_with(|| present_first(x.triage_check_in(), y.triage_check_in(), true))
    };
    by_date
        .then_with(|| {
            x.triage_label()
                .to_lowercase()
                .cmp(&y.triage_label().to_lowercase())
        })
        .then_with(|| x.triage_label().cmp(&y.triage_label()))
        .then_with(|| x.triage_id().cmp(&y.triage_id()))
        .then_with(|| x.triage_status().cmp(&y.triage_status()))
}

/// Rank and order entries for the triage view.
///
/// The comparator is a total order over the compared attributes, so any
/// permutation of the same input yields the same output.
pub fn sort_for_triage<T: TriageEntry + Clone>(entries: &[T], ranks: &StatusRankTable) -> Vec<TriageRow<T>> {
    let mut rows: Vec<TriageRow<T>> = entries
        .iter()
        .map(|entry| TriageRow {
            rank: ranks.rank(entry.triage_status()),
            entry: entry.clone(),
        })
        .collect();
    rows.sort_by(|a, b| compare(a, b, ranks));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, unit: &str, status: &str, ci: Option<&str>, co: Option<&str>) -> BookingRow {
        BookingRow {
            id: Some(id.into()),
            unit_name: unit.into(),
            guest: None,
            status: Some(status.into()),
            check_in: ci.and_then(parse_local_date),
            check_out: co.and_then(parse_local_date),
        }
    }

    fn ids<T: TriageEntry>(rows: &[TriageRow<T>]) -> Vec<String> {
        rows.iter()
            .map(|r| r.entry.triage_id().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn groups_by_status_rank() {
        let rows = vec![
            row("past", "A", "Past", Some("2025-05-01"), Some("2025-05-03")),
            row("up", "A", "Upcoming", Some("2025-07-01"), Some("2025-07-03")),
            row("now", "A", "Ongoing", Some("2025-06-01"), Some("2025-06-09")),
        ];
        let sorted = sort_for_triage(&rows, &StatusRankTable::default());
        assert_eq!(ids(&sorted), vec!["now", "up", "past"]);
        assert_eq!(sorted.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn upcoming_by_arrival_past_by_latest_departure() {
        let rows = vec![
            row("u2", "A", "Upcoming", Some("2025-07-10"), Some("2025-07-12")),
            row("u1", "A", "Upcoming", Some("2025-07-01"), Some("2025-07-20")),
            row("p1", "A", "Past", Some("2025-01-01"), Some("2025-01-05")),
            row("p2", "A", "Past", Some("2025-03-01"), Some("2025-03-05")),
        ];
        let sorted = sort_for_triage(&rows, &StatusRankTable::default());
        assert_eq!(ids(&sorted), vec!["u1", "u2", "p2", "p1"]);
    }

    #[test]
    fn missing_dates_go_last_in_group() {
        let rows = vec![
            row("nodate", "A", "Upcoming", None, None),
            row("dated", "B", "Upcoming", Some("2025-07-01"), Some("2025-07-03")),
            row("gone", "A", "Past", Some("2025-01-01"), None),
            row("left", "A", "Past", Some("2025-01-01"), Some("2025-01-02")),
        ];
        let sorted = sort_for_triage(&rows, &StatusRankTable::default());
        assert_eq!(ids(&sorted), vec!["dated", "nodate", "left", "gone"]);
    }

    #[test]
    fn ties_break_on_case_insensitive_label_then_id() {
        let rows = vec![
            row("2", "beta", "Upcoming", Some("2025-07-01"), None),
            row("3", "Alpha", "Upcoming", Some("2025-07-01"), None),
            row("1", "beta", "Upcoming", Some("2025-07-01"), None),
        ];
        let sorted = sort_for_triage(&rows, &StatusRankTable::default());
        assert_eq!(ids(&sorted), vec!["3", "1", "2"]);
    }

    #[test]
    fn unknown_status_ranks_last() {
        let rows = vec![
            row("x", "A", "Weird", Some("2025-07-01"), Some("2025-07-02")),
            row("c", "A", "Cancelled", Some("2025-07-01"), Some("2025-07-02")),
        ];
        let sorted = sort_for_triage(&rows, &StatusRankTable::default());
        assert_eq!(ids(&sorted), vec!["c", "x"]);
        assert_eq!(sorted[1].rank, crate::vocab::UNKNOWN_RANK);
    }

    #[test]
    fn booking_row_keeps_bad_dates() {
        let map = FieldTable::default();
        let r = BookingRow::from_record(
            &json!({ "id": 4, "unit_id": 12, "status": "Cancelled", "check_in": "soon" }),
            &map,
        )
        .unwrap();
        assert_eq!(r.unit_name, "12");
        assert_eq!(r.check_in, None);
        assert!(BookingRow::from_record(&json!([1]), &map).is_none());
    }

    #[test]
    fn row_serializes_flat() {
        let rows = vec![row("1", "A", "Past", Some("2025-01-01"), Some("2025-01-02"))];
        let sorted = sort_for_triage(&rows, &StatusRankTable::default());
        let v = serde_json::to_value(&sorted[0]).unwrap();
        assert_eq!(v["rank"], 2);
        assert_eq!(v["unit_name"], "A");
        assert_eq!(v["check_in"], "2025-01-01");
    }
}
