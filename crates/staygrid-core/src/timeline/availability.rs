//! Which units are free for a date range.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::stay::NormalizedStay;
use super::unit::{UnitInfo, UnitKey};
use crate::dates::ranges_overlap;

/// Search parameters. `city` and `unit_type` of `None`, `""`, `"All"` or
/// `"Any"` do not filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub unit_type: Option<String>,
}

impl AvailabilityQuery {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
            city: None,
            unit_type: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_unit_type(mut self, unit_type: impl Into<String>) -> Self {
        self.unit_type = Some(unit_type.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.check_out > self.check_in
    }

    fn accepts(&self, unit: &UnitInfo) -> bool {
        matches_choice(self.city.as_deref(), &unit.city)
            && matches_choice(self.unit_type.as_deref(), &unit.unit_type)
    }
}

fn matches_choice(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") | Some("All") | Some("Any") => true,
        Some(w) => w == actual,
    }
}

/// Units with no reservation overlapping `[check_in, check_out)`.
///
/// Holds and blocks are ignored. An invalid query returns an empty set.
pub fn availability(
    units: &[UnitInfo],
    stays: &[NormalizedStay],
    query: &AvailabilityQuery,
) -> BTreeSet<UnitKey> {
    if !query.is_valid() {
        return BTreeSet::new();
    }

    let busy: BTreeSet<&UnitKey> = stays
        .iter()
        .filter(|s| s.kind.blocks_availability())
        .filter(|s| ranges_overlap(s.check_in, s.check_out, query.check_in, query.check_out))
        .map(|s| &s.unit_key)
        .collect();

    units
        .iter()
        .filter(|u| query.accepts(u))
        .filter(|u| !busy.contains(&u.key))
        .map(|u| u.key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::stay::StayKind;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn unit(id: i64, city: &str, unit_type: &str) -> UnitInfo {
        UnitInfo {
            key: UnitKey::Id(id),
            id: Some(id),
            name: format!("U{id}"),
            city: city.into(),
            unit_type: unit_type.into(),
            code: String::new(),
        }
    }

    fn stay(id: i64, ci: NaiveDate, co: NaiveDate, kind: StayKind) -> NormalizedStay {
        NormalizedStay::try_new(UnitKey::Id(id), ci, co)
            .unwrap()
            .with_kind(kind)
    }

    fn keys(ids: &[i64]) -> BTreeSet<UnitKey> {
        ids.iter().map(|i| UnitKey::Id(*i)).collect()
    }

    #[test]
    fn reservation_blocks_but_hold_does_not() {
        let units = vec![unit(1, "Tulum", "Studio"), unit(2, "Tulum", "Studio")];
        let stays = vec![
            stay(1, d(6, 1), d(6, 5), StayKind::Reservation),
            stay(2, d(6, 1), d(6, 5), StayKind::Hold),
        ];
        let q = AvailabilityQuery::new(d(6, 3), d(6, 4));
        assert_eq!(availability(&units, &stays, &q), keys(&[2]));
    }

    #[test]
    fn back_to_back_is_free() {
        let units = vec![unit(1, "Tulum", "Studio")];
        let stays = vec![stay(1, d(6, 1), d(6, 5), StayKind::Reservation)];
        let q = AvailabilityQuery::new(d(6, 5), d(6, 7));
        assert_eq!(availability(&units, &stays, &q), keys(&[1]));
        let q = AvailabilityQuery::new(d(5, 28), d(6, 1));
        assert_eq!(availability(&units, &stays, &q), keys(&[1]));
    }

    #[test]
    fn blocks_never_block() {
        let units = vec![unit(1, "Tulum", "Studio")];
        let stays = vec![stay(1, d(6, 1), d(6, 30), StayKind::Block)];
        let q = AvailabilityQuery::new(d(6, 10), d(6, 12));
        assert_eq!(availability(&units, &stays, &q), keys(&[1]));
    }

    #[test]
    fn filters_city_and_type() {
        let units = vec![
            unit(1, "Tulum", "Studio"),
            unit(2, "Playa", "Studio"),
            unit(3, "Tulum", "2 Bdr"),
        ];
        let q = AvailabilityQuery::new(d(6, 1), d(6, 2)).with_city("Tulum");
        assert_eq!(availability(&units, &[], &q), keys(&[1, 3]));
        let q = q.with_unit_type("Studio");
        assert_eq!(availability(&units, &[], &q), keys(&[1]));
        let q = AvailabilityQuery::new(d(6, 1), d(6, 2))
            .with_city("All")
            .with_unit_type("Any");
        assert_eq!(availability(&units, &[], &q), keys(&[1, 2, 3]));
    }

    #[test]
    fn invalid_query_is_empty() {
        let units = vec![unit(1, "Tulum", "Studio")];
        let q = AvailabilityQuery::new(d(6, 2), d(6, 2));
        assert!(availability(&units, &[], &q).is_empty());
    }
}
