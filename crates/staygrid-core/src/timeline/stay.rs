//! Normalized stays: the typed, date-validated projection of raw booking
//! records.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::unit::UnitKey;
use crate::dates::parse_local_date;
use crate::error::ValidationError;
use crate::fields::{self, FieldTable};
use crate::vocab::{CancellationVocabulary, KindVocabulary};

/// What a stay represents on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StayKind {
    /// Confirmed booking from any channel.
    Reservation,
    /// Tentative hold; never blocks availability.
    Hold,
    /// Maintenance-style block; never blocks availability.
    Block,
}

impl StayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reservation => "Reservation",
            Self::Hold => "Hold",
            Self::Block => "Block",
        }
    }

    /// Whether this kind makes a unit unavailable.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, Self::Reservation)
    }
}

/// A stay occupying `[check_in, check_out)` on one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStay {
    pub id: Option<String>,
    pub unit_key: UnitKey,
    pub unit_id: Option<i64>,
    pub unit_name: Option<String>,
    pub city: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub kind: StayKind,
    /// Channel as sent by the API ("Airbnb", "Owners2", ...).
    pub source: String,
    /// Semantic source: "Hold"/"Block" override the channel label.
    pub source_normalized: String,
    pub status: Option<String>,
    pub guest: Option<String>,
    pub guests: Option<i64>,
    pub reservation_code: Option<String>,
    pub payout: Option<f64>,
    pub cleaning_fee: Option<f64>,
    pub notes: String,
    pub check_in_notes: String,
    pub check_out_notes: String,
    pub payment_method: Option<String>,
    pub is_paid: bool,
    pub booking_date: Option<String>,
    pub guest_type: String,
    pub hold_expires_at: Option<String>,
    pub hold_policy: String,
}

impl NormalizedStay {
    /// Build a bare stay, rejecting `check_out <= check_in`.
    ///
    /// Records from the API go through [`normalize`]; this is for callers
    /// that already hold typed data.
    pub fn try_new(
        unit_key: UnitKey,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if check_out <= check_in {
            return Err(ValidationError::InvalidDateRange {
                start: check_in,
                end: check_out,
            });
        }
        Ok(Self {
            id: None,
            unit_id: match unit_key {
                UnitKey::Id(id) => Some(id),
                UnitKey::Name(_) => None,
            },
            unit_name: match &unit_key {
                UnitKey::Id(_) => None,
                UnitKey::Name(name) => Some(name.clone()),
            },
            unit_key,
            city: None,
            check_in,
            check_out,
            kind: StayKind::Reservation,
            source: String::new(),
            source_normalized: String::new(),
            status: None,
            guest: None,
            guests: None,
            reservation_code: None,
            payout: None,
            cleaning_fee: None,
            notes: String::new(),
            check_in_notes: String::new(),
            check_out_notes: String::new(),
            payment_method: None,
            is_paid: false,
            booking_date: None,
            guest_type: String::new(),
            hold_expires_at: None,
            hold_policy: String::new(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the kind; holds and blocks also take it as their semantic source.
    pub fn with_kind(mut self, kind: StayKind) -> Self {
        self.kind = kind;
        if kind != StayKind::Reservation {
            self.source_normalized = kind.as_str().to_string();
        }
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_unit_name(mut self, name: impl Into<String>) -> Self {
        self.unit_name = Some(name.into());
        self
    }

    pub fn with_guest(mut self, guest: impl Into<String>) -> Self {
        self.guest = Some(guest.into());
        self
    }

    /// Nights between check-in and check-out (always >= 1 for a valid stay).
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(1)
    }

    /// Human-readable lane label used for tie-breaks.
    pub fn label(&self) -> String {
        self.unit_name
            .clone()
            .unwrap_or_else(|| self.unit_key.to_string())
    }

    /// Case-insensitive text used by the free-text filter.
    pub fn haystack(&self) -> String {
        [
            self.unit_name.as_deref(),
            self.city.as_deref(),
            self.guest.as_deref(),
            self.reservation_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

/// Why records were dropped during normalization. The engine never logs;
/// callers report these counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCounts {
    /// Not a JSON object.
    pub not_object: usize,
    /// Check-in or check-out missing or unparsable.
    pub invalid_dates: usize,
    /// Check-out on or before check-in.
    pub inverted_range: usize,
    /// Neither a unit id nor a unit name.
    pub missing_unit: usize,
    /// Status in the cancellation vocabulary.
    pub cancelled: usize,
    /// Repeats an id already seen earlier in the payload.
    pub duplicate: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.not_object
            + self.invalid_dates
            + self.inverted_range
            + self.missing_unit
            + self.cancelled
            + self.duplicate
    }
}

/// Result of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizeOutcome {
    pub stays: Vec<NormalizedStay>,
    pub dropped: DropCounts,
}

/// Vocabulary and field tables consulted by [`normalize`].
#[derive(Debug, Clone, Copy)]
pub struct NormalizeRules<'a> {
    pub fields: &'a FieldTable,
    pub kinds: &'a KindVocabulary,
    pub cancellation: &'a CancellationVocabulary,
}

/// Resolve the stay kind and semantic source label.
///
/// `guest_type` or the source saying hold/block wins over any channel
/// label. A source that is empty or an internal placeholder takes its
/// semantic label from `guest_type`.
pub fn resolve_kind(guest_type: &str, source: &str, kinds: &KindVocabulary) -> (StayKind, String) {
    let mut label = source.to_string();
    if kinds.is_placeholder_source(source) {
        if kinds.is_hold(guest_type) {
            label = "Hold".into();
        } else if kinds.is_block(guest_type) {
            label = "Block".into();
        }
    }
    if kinds.is_hold(&label) {
        label = "Hold".into();
    } else if kinds.is_block(&label) {
        label = "Block".into();
    }

    let kind = if kinds.is_hold(guest_type) || kinds.is_hold(&label) {
        StayKind::Hold
    } else if kinds.is_block(guest_type) || kinds.is_block(&label) {
        StayKind::Block
    } else {
        StayKind::Reservation
    };
    (kind, label)
}

enum Rejection {
    NotObject,
    InvalidDates,
    InvertedRange,
    MissingUnit,
    Cancelled,
}

fn normalize_one(record: &Value, rules: &NormalizeRules<'_>) -> Result<NormalizedStay, Rejection> {
    let f = rules.fields;
    if !record.is_object() {
        return Err(Rejection::NotObject);
    }

    let check_in = fields::text(record, &f.check_in).and_then(|s| parse_local_date(&s));
    let check_out = fields::text(record, &f.check_out).and_then(|s| parse_local_date(&s));
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Err(Rejection::InvalidDates);
    };
    if check_out <= check_in {
        return Err(Rejection::InvertedRange);
    }

    let unit_id = fields::integer(record, &f.unit_id);
    let unit_name = fields::text(record, &f.unit_name);
    let unit_key = match (unit_id, &unit_name) {
        (Some(id), _) => UnitKey::Id(id),
        (None, Some(name)) => UnitKey::Name(name.clone()),
        (None, None) => return Err(Rejection::MissingUnit),
    };

    let status = fields::text(record, &f.status);
    if rules.cancellation.is_cancelled(status.as_deref()) {
        return Err(Rejection::Cancelled);
    }

    let source = fields::text(record, &f.source).unwrap_or_default();
    let semantic = fields::text(record, &f.source_normalized).unwrap_or_else(|| source.clone());
    let guest_type = fields::text(record, &f.guest_type).unwrap_or_default();
    let (kind, source_normalized) = resolve_kind(&guest_type, &semantic, rules.kinds);

    Ok(NormalizedStay {
        id: fields::text(record, &f.id),
        unit_key,
        unit_id,
        unit_name,
        city: fields::text(record, &f.city),
        check_in,
        check_out,
        kind,
        source,
        source_normalized,
        status,
        guest: fields::text(record, &f.guest),
        guests: fields::integer(record, &f.guests),
        reservation_code: fields::text(record, &f.reservation_code),
        payout: fields::number(record, &f.payout),
        cleaning_fee: fields::number(record, &f.cleaning_fee),
        notes: fields::text(record, &f.notes).unwrap_or_default(),
        check_in_notes: fields::text(record, &f.check_in_notes).unwrap_or_default(),
        check_out_notes: fields::text(record, &f.check_out_notes).unwrap_or_default(),
        payment_method: fields::text(record, &f.payment_method),
        is_paid: fields::flag(record, &f.is_paid).unwrap_or(false),
        booking_date: fields::text(record, &f.booking_date),
        guest_type,
        hold_expires_at: fields::text(record, &f.hold_expires_at),
        hold_policy: fields::text(record, &f.hold_policy).unwrap_or_default(),
    })
}

/// Project raw records into validated stays.
///
/// Records with missing, unparsable or inverted dates, with no unit, or
/// with a cancelled/expired status are dropped and counted. A record whose
/// id was already kept is a duplicate; the first copy wins. Records without
/// an id are never treated as duplicates. Output order follows input order
/// but carries no meaning.
pub fn normalize(records: &[Value], rules: &NormalizeRules<'_>) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();
    for record in records {
        match normalize_one(record, rules) {
            Ok(stay) => {
                let repeat = stay.id.as_ref().is_some_and(|id| !seen.insert(id.clone()));
                if repeat {
                    outcome.dropped.duplicate += 1;
                } else {
                    outcome.stays.push(stay);
                }
            }
            Err(Rejection::NotObject) => outcome.dropped.not_object += 1,
            Err(Rejection::InvalidDates) => outcome.dropped.invalid_dates += 1,
            Err(Rejection::InvertedRange) => outcome.dropped.inverted_range += 1,
            Err(Rejection::MissingUnit) => outcome.dropped.missing_unit += 1,
            Err(Rejection::Cancelled) => outcome.dropped.cancelled += 1,
        }
    }
    outcome
}
