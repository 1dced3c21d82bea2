//! Slot accounting types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric committee identifier
pub type CommitteeId = i64;

/// Composite key of a committee slot row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotKey {
    pub committee_id: CommitteeId,
    pub senate_division: String,
}

impl SlotKey {
    pub fn new(committee_id: CommitteeId, senate_division: impl Into<String>) -> Self {
        Self {
            committee_id,
            senate_division: senate_division.into(),
        }
    }

    /// Resource path of this slot under the HTTP surface, with the division
    /// percent-encoded as one path segment
    pub fn resource_path(&self) -> String {
        format!(
            "/committee-slots/{}/{}",
            self.committee_id,
            urlencoding::encode(&self.senate_division)
        )
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.committee_id, self.senate_division)
    }
}

/// One committee slot row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeSlot {
    pub committee_id: CommitteeId,
    pub senate_division: String,
    pub slot_requirements: u32,
}

impl CommitteeSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.committee_id, self.senate_division.clone())
    }
}

/// Result of a committed slot creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutcome {
    #[serde(flatten)]
    pub key: SlotKey,
    pub slot_requirements: u32,
    /// Committee aggregate after commit
    pub total_slots: i64,
}

/// Result of a committed slot update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    #[serde(flatten)]
    pub key: SlotKey,
    /// Rows changed by the slot rewrite
    pub row_count: usize,
    /// Requirement observed by the pre-read
    pub previous: u32,
    pub slot_requirements: u32,
    /// Signed change applied to the aggregate
    pub delta: i64,
    /// Committee aggregate after commit
    pub total_slots: i64,
}

/// Result of a slot deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    #[serde(flatten)]
    pub key: SlotKey,
    /// 0 when no row matched
    pub row_count: usize,
    /// Change applied to the aggregate; 0 unless decrement-on-delete is enabled
    pub aggregate_delta: i64,
}

/// How slot writes propagate into `committee.total_slots`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateMode {
    /// Add the signed difference computed for this write
    #[default]
    Delta,
    /// Rewrite the aggregate as `SUM(slot_requirements)` inside the same transaction
    Recompute,
}

impl AggregateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateMode::Delta => "delta",
            AggregateMode::Recompute => "recompute",
        }
    }
}

/// Business rules applied around the slot transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPolicy {
    #[serde(default)]
    pub aggregate_mode: AggregateMode,

    /// Updates whose projected aggregate falls below this are rejected by the handler
    #[serde(default)]
    pub min_total_slots: Option<i64>,

    /// Subtract a deleted slot's requirement from the aggregate.
    /// Off by default: delete historically left `total_slots` untouched.
    #[serde(default)]
    pub decrement_on_delete: bool,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            aggregate_mode: AggregateMode::Delta,
            min_total_slots: None,
            decrement_on_delete: false,
        }
    }
}
