//! Grouping stays into one lane per unit.

use indexmap::IndexMap;

use super::stay::NormalizedStay;
use super::unit::{UnitInfo, UnitKey};
use crate::dates::{ranges_overlap, DateWindow};

/// Stays per unit, in lane order.
pub type Lanes = IndexMap<UnitKey, Vec<NormalizedStay>>;

/// Group the stays visible in `window` by unit.
///
/// Every catalog unit gets a lane, in catalog order, even when empty. Stays
/// on units missing from the catalog get lanes after those, in key order.
/// Within a lane stays are ordered by check-in, then id, then check-out.
pub fn group_by_unit(stays: &[NormalizedStay], units: &[UnitInfo], window: &DateWindow) -> Lanes {
    let mut lanes: Lanes = units.iter().map(|u| (u.key.clone(), Vec::new())).collect();
    let known = lanes.len();

    for stay in stays {
        if !window.shows_stay(stay.check_in, stay.check_out) {
            continue;
        }
        lanes.entry(stay.unit_key.clone()).or_default().push(stay.clone());
    }

    // unseen keys were appended in encounter order
    if lanes.len() > known {
        let mut extra = lanes.split_off(known);
        extra.sort_keys();
        lanes.extend(extra);
    }

    for lane in lanes.values_mut() {
        lane.sort_by(|a, b| {
            a.check_in
                .cmp(&b.check_in)
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.check_out.cmp(&b.check_out))
        });
    }
    lanes
}

/// Index pairs of stays in one lane whose nights overlap.
///
/// Double bookings are shown, not rejected; this lets callers flag them.
pub fn overlapping_pairs(lane: &[NormalizedStay]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in lane.iter().enumerate() {
        for (j, b) in lane.iter().enumerate().skip(i + 1) {
            if ranges_overlap(a.check_in, a.check_out, b.check_in, b.check_out) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
