//! Calendar-date helpers.
//!
//! Everything here works on `NaiveDate`: stays are nights on a calendar,
//! not instants, so no timezone is ever applied. A `"2025-03-10"` string is
//! March 10 on every host.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Parse the leading `YYYY-MM-DD` of a string as a local calendar date.
///
/// Accepts a bare date, or a date followed by `T` or whitespace and a time
/// (`2025-03-10T14:00:00`, `2025-03-10 14:00:00`); the time part is ignored.
/// Unpadded components (`2025-3-5`) are accepted. Impossible dates
/// (`2025-02-30`) and zero components return `None`.
pub fn parse_local_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    let mut parts = date_part.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || year <= 0 || month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Strict variant for caller input (CLI flags, config): errors instead of
/// dropping.
pub fn parse_date_arg(input: &str) -> Result<NaiveDate, ValidationError> {
    parse_local_date(input).ok_or_else(|| ValidationError::InvalidDate(input.to_string()))
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month_arg(input: &str) -> Result<NaiveDate, ValidationError> {
    let err = || ValidationError::InvalidMonth(input.to_string());
    let (y, m) = input.trim().split_once('-').ok_or_else(err)?;
    let year: i32 = y.parse().map_err(|_| err())?;
    let month: u32 = m.parse().map_err(|_| err())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(err)
}

/// Half-open overlap test: `[start1, end1)` vs `[start2, end2)`.
pub fn ranges_overlap(
    start1: NaiveDate,
    end1: NaiveDate,
    start2: NaiveDate,
    end2: NaiveDate,
) -> bool {
    start1 < end2 && end1 > start2
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` away from the month containing `date`.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let month0 = index.rem_euclid(12) as u32;
    i32::try_from(index.div_euclid(12))
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month0 + 1, 1))
        .unwrap_or_else(|| first_of_month(date))
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    shift_month(date, 1).pred_opt().unwrap_or(date)
}

/// Upper bound on either side of a rolling window (one hundred years).
pub const MAX_ROLLING_MONTHS: u32 = 1200;

/// The visible window: a contiguous, inclusive range of calendar days.
///
/// A window with `end < start` is empty: it has no days and nothing is
/// visible in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Create a window, rejecting `end < start`.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The full calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self::new(first_of_month(date), last_of_month(date))
    }

    /// From the first day of the month `months_back` before `today` to the
    /// last day of the month `months_ahead` after it. Both spans are capped
    /// at [`MAX_ROLLING_MONTHS`].
    pub fn rolling(today: NaiveDate, months_back: u32, months_ahead: u32) -> Self {
        let back = months_back.min(MAX_ROLLING_MONTHS) as i32;
        let ahead = months_ahead.min(MAX_ROLLING_MONTHS) as i32;
        let start = shift_month(today, -back);
        let end = last_of_month(shift_month(today, ahead));
        Self::new(start, end)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of days in the window (0 when empty).
    pub fn len_days(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.end - self.start).num_days() + 1) as usize
        }
    }

    /// Every day in `[start, end]`.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..self.len_days() as i64)
            .map(|i| self.start + Duration::days(i))
            .collect()
    }

    /// Zero-based offset of `date` from the window start (may be negative or
    /// past the end).
    pub fn day_index(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    /// Clamp `date` into `[start, end]`.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.max(self.start).min(self.end)
    }

    /// Visibility test for a stay `[check_in, check_out)`.
    ///
    /// Inclusive on both sides: a stay checking out on the first visible
    /// day is still listed, but grid placement gives it no bar.
    pub fn shows_stay(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        !self.is_empty() && check_in <= self.end && check_out >= self.start
    }
}
