//! Status and source vocabularies as data.
//!
//! Deployments word their statuses differently ("Canceled by guest",
//! "Currently hosting"), so every table here is configuration with a
//! default, shared by normalization, triage and availability.

use serde::{Deserialize, Serialize};

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Statuses that remove a record from availability and conflict math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancellationVocabulary {
    /// Case-insensitive prefixes ("cancel" covers cancelled, canceled,
    /// cancelled by guest).
    pub prefixes: Vec<String>,
    /// Case-insensitive exact matches.
    pub exact: Vec<String>,
}

impl Default for CancellationVocabulary {
    fn default() -> Self {
        Self {
            prefixes: vec!["cancel".into()],
            exact: vec!["expired".into()],
        }
    }
}

impl CancellationVocabulary {
    pub fn is_cancelled(&self, status: Option<&str>) -> bool {
        let Some(status) = status else {
            return false;
        };
        let s = norm(status);
        if s.is_empty() {
            return false;
        }
        self.prefixes.iter().any(|p| s.starts_with(&norm(p)))
            || self.exact.iter().any(|e| s == norm(e))
    }
}

/// Words that mark a record as a hold or block, and the source labels that
/// are internal placeholders rather than a booking channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindVocabulary {
    pub hold: String,
    pub block: String,
    pub internal_sources: Vec<String>,
}

impl Default for KindVocabulary {
    fn default() -> Self {
        Self {
            hold: "hold".into(),
            block: "block".into(),
            internal_sources: vec!["owners2".into()],
        }
    }
}

impl KindVocabulary {
    pub fn is_hold(&self, value: &str) -> bool {
        norm(value) == norm(&self.hold)
    }

    pub fn is_block(&self, value: &str) -> bool {
        norm(value) == norm(&self.block)
    }

    /// Empty, or one of the internal placeholder sources.
    pub fn is_placeholder_source(&self, source: &str) -> bool {
        let s = norm(source);
        s.is_empty() || self.internal_sources.iter().any(|i| norm(i) == s)
    }
}

/// Rank for statuses not found in the table.
pub const UNKNOWN_RANK: u8 = 4;

/// One triage rank group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankGroup {
    pub rank: u8,
    pub statuses: Vec<String>,
    /// Sort the group by check-in ascending (true) or check-out descending.
    #[serde(default)]
    pub by_check_in: bool,
}

/// Status → triage rank lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRankTable {
    pub groups: Vec<RankGroup>,
}

impl Default for StatusRankTable {
    fn default() -> Self {
        let group = |rank: u8, statuses: &[&str], by_check_in: bool| RankGroup {
            rank,
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
            by_check_in,
        };
        Self {
            groups: vec![
                group(0, &["ongoing", "inhouse", "in house", "current"], true),
                group(1, &["upcoming", "future", "scheduled", "pending", "active"], true),
                group(2, &["past", "completed", "finished", "done"], false),
                group(3, &["cancelled", "canceled"], false),
            ],
        }
    }
}

impl StatusRankTable {
    /// Rank of a status; missing or unrecognized statuses get [`UNKNOWN_RANK`].
    pub fn rank(&self, status: Option<&str>) -> u8 {
        let Some(status) = status else {
            return UNKNOWN_RANK;
        };
        let s = norm(status);
        self.groups
            .iter()
            .find(|g| g.statuses.iter().any(|v| norm(v) == s))
            .map(|g| g.rank)
            .unwrap_or(UNKNOWN_RANK)
    }

    /// Whether stays of this rank are ordered by check-in ascending.
    ///
    /// Ranks without a configured group (including [`UNKNOWN_RANK`]) order
    /// by check-out descending.
    pub fn orders_by_check_in(&self, rank: u8) -> bool {
        self.groups
            .iter()
            .find(|g| g.rank == rank)
            .is_some_and(|g| g.by_check_in)
    }
}
