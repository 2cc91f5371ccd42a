//! Unit catalog: one entry per resource lane.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stay::NormalizedStay;
use crate::fields::{self, UnitFields};

/// Resource identity: numeric unit id when known, otherwise the display
/// name. Ids order before names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitKey {
    Id(i64),
    Name(String),
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A unit in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    pub key: UnitKey,
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub unit_type: String,
    pub code: String,
}

impl UnitInfo {
    /// Display label: the name, or the key when the catalog had no name.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.key.to_string()
        } else {
            self.name.clone()
        }
    }

    pub(crate) fn haystack(&self) -> String {
        [&self.name, &self.city, &self.unit_type, &self.code]
            .into_iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Copy in attributes this entry lacks; never clears a known value.
    fn fill_from(&mut self, other: &UnitInfo) {
        for (mine, theirs) in [
            (&mut self.name, &other.name),
            (&mut self.city, &other.city),
            (&mut self.unit_type, &other.unit_type),
            (&mut self.code, &other.code),
        ] {
            if mine.is_empty() && !theirs.is_empty() {
                *mine = theirs.clone();
            }
        }
    }
}

fn read_unit(entry: &Value, map: &UnitFields) -> Option<UnitInfo> {
    let id = fields::integer(entry, &map.id);
    let name = fields::text(entry, &map.name).unwrap_or_default();
    let key = match id {
        Some(id) => UnitKey::Id(id),
        None if !name.is_empty() => UnitKey::Name(name.clone()),
        None => return None,
    };
    let code = fields::text(entry, &map.code).unwrap_or_else(|| name.clone());
    Some(UnitInfo {
        key,
        id,
        name,
        city: fields::text(entry, &map.city).unwrap_or_default(),
        unit_type: fields::text(entry, &map.unit_type).unwrap_or_default(),
        code,
    })
}

/// Id of each name carried by exactly one id-keyed unit. Case-sensitive.
fn unique_ids_by_name<'a>(units: impl Iterator<Item = &'a UnitInfo>) -> BTreeMap<String, i64> {
    let mut ids: BTreeMap<String, Option<i64>> = BTreeMap::new();
    for unit in units {
        let (UnitKey::Id(id), false) = (&unit.key, unit.name.is_empty()) else {
            continue;
        };
        ids.entry(unit.name.clone())
            .and_modify(|seen| {
                if *seen != Some(*id) {
                    *seen = None;
                }
            })
            .or_insert(Some(*id));
    }
    ids.into_iter()
        .filter_map(|(name, id)| id.map(|id| (name, id)))
        .collect()
}

/// Build the de-duplicated unit catalog.
///
/// Entries are keyed by id, falling back to name; entries without either
/// are skipped. A later entry for the same key only fills attributes the
/// earlier one left empty. A name-keyed entry whose name belongs to exactly
/// one id-keyed entry is folded into it. The result is ordered by
/// case-insensitive label, then key.
pub fn catalog_units(entries: &[Value], map: &UnitFields) -> Vec<UnitInfo> {
    let mut by_key: IndexMap<UnitKey, UnitInfo> = IndexMap::new();
    for entry in entries {
        let Some(unit) = read_unit(entry, map) else {
            continue;
        };
        match by_key.get_mut(&unit.key) {
            Some(existing) => existing.fill_from(&unit),
            None => {
                by_key.insert(unit.key.clone(), unit);
            }
        }
    }

    let ids = unique_ids_by_name(by_key.values());
    let folded: Vec<UnitInfo> = by_key
        .values()
        .filter(|u| matches!(&u.key, UnitKey::Name(name) if ids.contains_key(name)))
        .cloned()
        .collect();
    for unit in folded {
        by_key.shift_remove(&unit.key);
        if let Some(target) = by_key.get_mut(&UnitKey::Id(ids[&unit.name])) {
            target.fill_from(&unit);
        }
    }

    let mut units: Vec<UnitInfo> = by_key.into_values().collect();
    units.sort_by(|a, b| {
        a.label()
            .to_lowercase()
            .cmp(&b.label().to_lowercase())
            .then_with(|| a.key.cmp(&b.key))
    });
    units
}

/// Re-key name-only stays onto the catalog's id-keyed unit of that name.
///
/// Only names carried by exactly one id-keyed unit are resolved; ambiguous
/// or unknown names keep their name key. Returns how many stays changed.
pub fn resolve_unit_keys(stays: &mut [NormalizedStay], units: &[UnitInfo]) -> usize {
    let ids = unique_ids_by_name(units.iter());
    let mut resolved = 0;
    for stay in stays.iter_mut() {
        let UnitKey::Name(name) = &stay.unit_key else {
            continue;
        };
        if let Some(&id) = ids.get(name) {
            stay.unit_key = UnitKey::Id(id);
            stay.unit_id = Some(id);
            resolved += 1;
        }
    }
    resolved
}

/// Sorted distinct non-empty cities.
pub fn city_options(units: &[UnitInfo]) -> Vec<String> {
    units
        .iter()
        .filter(|u| !u.city.is_empty())
        .map(|u| u.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct non-empty unit types.
pub fn type_options(units: &[UnitInfo]) -> Vec<String> {
    units
        .iter()
        .filter(|u| !u.unit_type.is_empty())
        .map(|u| u.unit_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldTable;
    use serde_json::json;

    #[test]
    fn dedupes_by_id_and_fills_missing_fields() {
        let entries = vec![
            json!({ "id": 2, "name": "Zama 3" }),
            json!({ "id": 2, "name": "", "city": "Tulum", "type": "1 Bdr" }),
            json!({ "id": 2, "city": "Playa del Carmen", "type": "" }),
            json!({ "id": 1, "name": "Aldea 12", "city": "Playa del Carmen" }),
        ];
        let units = catalog_units(&entries, &UnitFields::default());
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "Aldea 12");
        let zama = &units[1];
        assert_eq!(zama.key, UnitKey::Id(2));
        assert_eq!(zama.city, "Tulum");
        assert_eq!(zama.unit_type, "1 Bdr");
        assert_eq!(zama.code, "Zama 3");
    }

    #[test]
    fn falls_back_to_name_key_and_skips_anonymous() {
        let entries = vec![json!({ "name": "Loft" }), json!({ "city": "Tulum" }), json!(3)];
        let units = catalog_units(&entries, &UnitFields::default());
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].key, UnitKey::Name("Loft".into()));
    }

    #[test]
    fn derives_catalog_from_booking_records() {
        let map = UnitFields::from_records(&FieldTable::default());
        let records = vec![
            json!({ "unit_id": 9, "unit_name": "Caribe 1", "check_in": "2025-06-01" }),
            json!({ "unitId": 9, "unitName": "Caribe 1", "unit_type": "Studio", "city": "Playa" }),
        ];
        let units = catalog_units(&records, &map);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].unit_type, "Studio");
        assert_eq!(units[0].city, "Playa");
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let entries = vec![
            json!({ "id": 1, "name": "A", "city": "Tulum", "type": "Studio" }),
            json!({ "id": 2, "name": "B", "city": "Playa", "type": "Studio" }),
            json!({ "id": 3, "name": "C", "city": "" }),
        ];
        let units = catalog_units(&entries, &UnitFields::default());
        assert_eq!(city_options(&units), vec!["Playa", "Tulum"]);
        assert_eq!(type_options(&units), vec!["Studio"]);
    }

    #[test]
    fn folds_name_only_entry_into_id_entry() {
        let map = UnitFields::from_records(&FieldTable::default());
        let records = vec![
            json!({ "unit_id": 1, "unit_name": "Aldea" }),
            json!({ "unit_name": "Aldea", "city": "Tulum" }),
            json!({ "unit_name": "Loft" }),
        ];
        let units = catalog_units(&records, &map);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].key, UnitKey::Id(1));
        assert_eq!(units[0].city, "Tulum");
        assert_eq!(units[1].key, UnitKey::Name("Loft".into()));
    }

    #[test]
    fn resolves_name_only_stays_to_unique_id() {
        let units = catalog_units(
            &[
                json!({ "id": 1, "name": "Aldea" }),
                json!({ "id": 2, "name": "Twin" }),
                json!({ "id": 3, "name": "Twin" }),
            ],
            &UnitFields::default(),
        );
        let stay = |name: &str| {
            NormalizedStay::try_new(
                UnitKey::Name(name.into()),
                chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            )
            .unwrap()
        };
        let mut stays = vec![stay("Aldea"), stay("Twin"), stay("aldea")];
        assert_eq!(resolve_unit_keys(&mut stays, &units), 1);
        assert_eq!(stays[0].unit_key, UnitKey::Id(1));
        assert_eq!(stays[0].unit_id, Some(1));
        // ambiguous and case-mismatched names keep their name key
        assert_eq!(stays[1].unit_key, UnitKey::Name("Twin".into()));
        assert_eq!(stays[2].unit_key, UnitKey::Name("aldea".into()));
    }

    #[test]
    fn unit_key_ordering_and_display() {
        assert!(UnitKey::Id(10) < UnitKey::Name("A".into()));
        assert!(UnitKey::Id(2) < UnitKey::Id(10));
        assert_eq!(UnitKey::Id(4).to_string(), "4");
        assert_eq!(serde_json::to_string(&UnitKey::Name("Loft".into())).unwrap(), "\"Loft\"");
    }
}
