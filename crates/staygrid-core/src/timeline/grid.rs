//! Gantt grid placement.
//!
//! The board is a CSS-style grid: `leading_columns` columns for the unit
//! label, then one band of `sub_columns_per_day` equal columns per visible
//! day. Lines are 1-based. A bar starts on the last sub-column of its
//! check-in day and ends after the first sub-column of its checkout day, so
//! back-to-back stays meet mid-band instead of sharing a whole day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::stay::NormalizedStay;
use crate::dates::DateWindow;

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Sub-columns per day band. Visual granularity only; it does not
    /// encode check-in/check-out times.
    pub sub_columns_per_day: u32,
    /// Columns before the first day band (the unit label column).
    pub leading_columns: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sub_columns_per_day: 3,
            leading_columns: 1,
        }
    }
}

impl GridConfig {
    fn parts(&self) -> i64 {
        i64::from(self.sub_columns_per_day.max(1))
    }

    /// Grid line where the first day band begins.
    pub fn first_band_line(&self) -> i64 {
        i64::from(self.leading_columns) + 1
    }

    /// Grid line closing the last day band of a `days`-long window.
    pub fn last_band_line(&self, days: usize) -> i64 {
        self.first_band_line() + days as i64 * self.parts()
    }

    /// `(start, end)` lines of the band for day `day_index`.
    pub fn day_band(&self, day_index: usize) -> (i64, i64) {
        let start = self.first_band_line() + day_index as i64 * self.parts();
        (start, start + self.parts())
    }
}

/// Where a stay's bar sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub start_col: i64,
    pub end_col: i64,
    /// Day index of the (clamped) check-in within the window.
    pub start_day: i64,
    /// Day index of the (clamped) check-out within the window.
    pub end_day: i64,
    pub nights: i64,
    /// The stay began before the window.
    pub clipped_start: bool,
    /// The stay continues past the window.
    pub clipped_end: bool,
}

impl Placement {
    pub fn span(&self) -> i64 {
        self.end_col - self.start_col
    }
}

/// Place a `[check_in, check_out)` range on the grid.
///
/// Returns `None` when nothing is visible: empty window, checkout on or
/// before the first visible day, or check-in after the last one. Otherwise
/// the bar always has `start_col < end_col`.
pub fn place_range(
    check_in: NaiveDate,
    check_out: NaiveDate,
    window: &DateWindow,
    grid: &GridConfig,
) -> Option<Placement> {
    if window.is_empty() || check_out <= window.start || check_in > window.end {
        return None;
    }

    let parts = grid.parts();
    let first = grid.first_band_line();
    let max_line = grid.last_band_line(window.len_days());

    let start_day = window.day_index(window.clamp(check_in));
    let end_day = window.day_index(window.clamp(check_out));

    let mut start_col = first + start_day * parts + (parts - 1);
    let mut end_col = first + end_day * parts + 1;
    start_col = start_col.clamp(first, max_line);
    end_col = end_col.clamp(first, max_line + 1);
    if end_col < start_col + 1 {
        end_col = start_col + 1;
    }

    Some(Placement {
        start_col,
        end_col,
        start_day,
        end_day,
        nights: (check_out - check_in).num_days().max(1),
        clipped_start: check_in < window.start,
        clipped_end: check_out > window.end,
    })
}

/// Place a stay's bar; see [`place_range`].
pub fn place_on_grid(stay: &NormalizedStay, window: &DateWindow, grid: &GridConfig) -> Option<Placement> {
    place_range(stay.check_in, stay.check_out, window, grid)
}
