//! Free-text filter shared by the board's unit column and its stays.

use std::collections::BTreeSet;

use super::stay::NormalizedStay;
use super::unit::{UnitInfo, UnitKey};

/// Case-insensitive substring filter. An empty needle matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Unit matches on name, city, type or code.
    pub fn matches_unit(&self, unit: &UnitInfo) -> bool {
        self.is_empty() || unit.haystack().contains(&self.needle)
    }

    /// Keep the units matching the filter, preserving order.
    pub fn units(&self, units: &[UnitInfo]) -> Vec<UnitInfo> {
        units
            .iter()
            .filter(|u| self.matches_unit(u))
            .cloned()
            .collect()
    }

    /// Keep stays matching directly on unit, city, guest or reservation
    /// code, or belonging to one of `visible_units`.
    pub fn stays(
        &self,
        stays: &[NormalizedStay],
        visible_units: &BTreeSet<UnitKey>,
    ) -> Vec<NormalizedStay> {
        if self.is_empty() {
            return stays.to_vec();
        }
        stays
            .iter()
            .filter(|s| s.haystack().contains(&self.needle) || visible_units.contains(&s.unit_key))
            .cloned()
            .collect()
    }
}
