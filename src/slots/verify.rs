//! Aggregate consistency verification
//!
//! Compares each committee's `total_slots` with the sum of its slot rows.
//! Read-only; drift is reported, never repaired.

use rusqlite::params;
use serde::Serialize;

use super::types::CommitteeId;
use crate::observability::{log_event_with_fields, Event};
use crate::store::{Database, StoreError, StoreResult};

/// One committee whose aggregate disagrees with its slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDrift {
    pub committee_id: CommitteeId,
    pub name: String,
    pub total_slots: i64,
    pub slot_sum: i64,
}

impl AggregateDrift {
    /// `total_slots - slot_sum`; positive after deletes that kept the total
    pub fn difference(&self) -> i64 {
        self.total_slots - self.slot_sum
    }
}

/// Result of a verification pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub committees_checked: usize,
    pub drift: Vec<AggregateDrift>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.drift.is_empty()
    }
}

/// Check every committee's aggregate against its slot rows
pub async fn verify_totals(db: &Database) -> StoreResult<ConsistencyReport> {
    let rows = db
        .read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.committee_id, c.name, c.total_slots, \
                        COALESCE(SUM(s.slot_requirements), 0) \
                 FROM committee c \
                 LEFT JOIN committee_slots s ON s.committee_id = c.committee_id \
                 GROUP BY c.committee_id, c.name, c.total_slots \
                 ORDER BY c.committee_id",
            )?;
            let rows = stmt.query_map(params![], |row| {
                Ok(AggregateDrift {
                    committee_id: row.get(0)?,
                    name: row.get(1)?,
                    total_slots: row.get(2)?,
                    slot_sum: row.get(3)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
        })
        .await?;

    let committees_checked = rows.len();
    let drift: Vec<AggregateDrift> = rows
        .into_iter()
        .filter(|row| row.total_slots != row.slot_sum)
        .collect();

    for entry in &drift {
        let committee_id = entry.committee_id.to_string();
        let total_slots = entry.total_slots.to_string();
        let slot_sum = entry.slot_sum.to_string();
        log_event_with_fields(
            Event::ConsistencyDrift,
            &[
                ("committee_id", committee_id.as_str()),
                ("total_slots", total_slots.as_str()),
                ("slot_sum", slot_sum.as_str()),
            ],
        );
    }

    let checked = committees_checked.to_string();
    let drifting = drift.len().to_string();
    log_event_with_fields(
        Event::ConsistencyVerified,
        &[("committees", checked.as_str()), ("drifting", drifting.as_str())],
    );

    Ok(ConsistencyReport {
        committees_checked,
        drift,
    })
}
