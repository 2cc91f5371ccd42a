//! Field resolution for loosely-typed API records.
//!
//! The booking endpoints name the same concept several ways (`check_in`,
//! `checkIn`, `start_date`). Instead of ad hoc fallback chains, each logical
//! field owns an ordered list of candidate keys; the first key holding a
//! non-null, non-empty value wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Ordered candidate key names per logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTable {
    pub id: Vec<String>,
    pub unit_id: Vec<String>,
    pub unit_name: Vec<String>,
    pub unit_code: Vec<String>,
    pub unit_type: Vec<String>,
    pub city: Vec<String>,
    pub check_in: Vec<String>,
    pub check_out: Vec<String>,
    pub guest: Vec<String>,
    pub guests: Vec<String>,
    pub status: Vec<String>,
    pub source: Vec<String>,
    pub source_normalized: Vec<String>,
    pub guest_type: Vec<String>,
    pub hold_expires_at: Vec<String>,
    pub hold_policy: Vec<String>,
    pub reservation_code: Vec<String>,
    pub payout: Vec<String>,
    pub cleaning_fee: Vec<String>,
    pub notes: Vec<String>,
    pub check_in_notes: Vec<String>,
    pub check_out_notes: Vec<String>,
    pub payment_method: Vec<String>,
    pub is_paid: Vec<String>,
    pub booking_date: Vec<String>,
    /// Keys of the separately fetched unit catalog.
    pub units: UnitFields,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self {
            id: keys(&["id", "booking_id", "bookingId"]),
            unit_id: keys(&["unit_id", "unitId"]),
            unit_name: keys(&["unit_name", "unitName", "unit", "listing_name", "listingName"]),
            unit_code: keys(&["unit_code", "unitCode"]),
            unit_type: keys(&["unit_type", "unitType", "type"]),
            city: keys(&["city"]),
            check_in: keys(&["check_in", "checkIn", "start_date", "startDate"]),
            check_out: keys(&["check_out", "checkOut", "end_date", "endDate"]),
            guest: keys(&["guest_name", "guestName", "guest", "name"]),
            guests: keys(&["guests", "num_guests"]),
            status: keys(&["status", "booking_status", "bookingStatus"]),
            source: keys(&["source", "booking_source", "bookingSource"]),
            source_normalized: keys(&["source_normalized", "sourceNormalized"]),
            guest_type: keys(&["guest_type", "guestType"]),
            hold_expires_at: keys(&["hold_expires_at", "holdExpiresAt"]),
            hold_policy: keys(&["hold_policy", "holdPolicy"]),
            reservation_code: keys(&["confirmation_code", "reservation_code", "reservationCode"]),
            payout: keys(&["payout"]),
            cleaning_fee: keys(&["cleaning_fee", "cleaningFee"]),
            notes: keys(&["notes"]),
            check_in_notes: keys(&["check_in_notes", "checkInNotes"]),
            check_out_notes: keys(&["check_out_notes", "checkOutNotes"]),
            payment_method: keys(&["payment_method", "paymentMethod"]),
            is_paid: keys(&["is_paid", "isPaid"]),
            booking_date: keys(&["booking_date", "bookingDate"]),
            units: UnitFields::default(),
        }
    }
}

/// Candidate keys for unit identity and attributes.
///
/// The default reads the unit catalog endpoint (`id`, `name`, `city`,
/// `type`); [`UnitFields::from_records`] reads the same attributes off
/// booking records, whose keys are prefixed (`unit_id`, `unit_name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitFields {
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub city: Vec<String>,
    pub unit_type: Vec<String>,
    pub code: Vec<String>,
}

impl Default for UnitFields {
    fn default() -> Self {
        Self {
            id: keys(&["id", "unit_id", "unitId"]),
            name: keys(&["name", "unit_name", "unitName", "listing_name", "listingName"]),
            city: keys(&["city"]),
            unit_type: keys(&["type", "unit_type", "unitType"]),
            code: keys(&["unit_code", "unitCode", "code"]),
        }
    }
}

impl UnitFields {
    pub fn from_records(table: &FieldTable) -> Self {
        Self {
            id: table.unit_id.clone(),
            name: table.unit_name.clone(),
            city: table.city.clone(),
            unit_type: table.unit_type.clone(),
            code: table.unit_code.clone(),
        }
    }
}

/// First candidate key with a usable value. `null` and `""` count as absent.
pub fn lookup<'a>(record: &'a Value, candidates: &[String]) -> Option<&'a Value> {
    candidates.iter().find_map(|key| match record.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    })
}

/// Resolve a field as text. Numbers and booleans are rendered, arrays and
/// objects are not text.
pub fn text(record: &Value, candidates: &[String]) -> Option<String> {
    match lookup(record, candidates)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve a field as an integer id; numeric strings are accepted.
pub fn integer(record: &Value, candidates: &[String]) -> Option<i64> {
    match lookup(record, candidates)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve a field as a number (money, counts); numeric strings are accepted.
pub fn number(record: &Value, candidates: &[String]) -> Option<f64> {
    match lookup(record, candidates)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve a field as a flag: booleans, `0`/`1`, `"true"`/`"false"`.
pub fn flag(record: &Value, candidates: &[String]) -> Option<bool> {
    match lookup(record, candidates)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Unwrap the collection envelopes the API may return.
///
/// Accepts a bare array or an object with `member`, `hydra:member`, `items`
/// or `data` holding an array. Anything else is an empty list.
pub fn coerce_list(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => ["member", "hydra:member", "items", "data"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}
