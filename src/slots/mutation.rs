//! Slot mutations as single units of work
//!
//! A `SlotMutation` bundles the child-row write with the matching change to
//! the parent committee's `total_slots`. It is only ever applied inside one
//! store transaction, so both writes commit together or not at all.

use rusqlite::{params, OptionalExtension, Transaction};

use super::types::{AggregateMode, CommitteeId, SlotKey};
use crate::store::{ConstraintKind, StoreError, StoreResult};

/// One slot write plus its aggregate propagation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotMutation {
    /// Insert a slot row; aggregate grows by `requirements`
    Insert { key: SlotKey, requirements: u32 },
    /// Overwrite a slot's requirement; aggregate moves by `delta`
    SetRequirement {
        key: SlotKey,
        requirements: u32,
        delta: i64,
    },
    /// Delete a slot row; the aggregate is adjusted only when asked to
    Remove {
        key: SlotKey,
        decrement_aggregate: bool,
    },
}

/// What a mutation did inside its transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationEffect {
    /// Rows touched by the slot statement
    pub row_count: usize,
    /// Signed change applied to the aggregate
    pub aggregate_delta: i64,
    /// Aggregate as seen at the end of the transaction, when it was written
    pub total_slots: Option<i64>,
}

impl MutationEffect {
    fn untouched(row_count: usize) -> Self {
        Self {
            row_count,
            aggregate_delta: 0,
            total_slots: None,
        }
    }
}

impl SlotMutation {
    pub fn key(&self) -> &SlotKey {
        match self {
            SlotMutation::Insert { key, .. }
            | SlotMutation::SetRequirement { key, .. }
            | SlotMutation::Remove { key, .. } => key,
        }
    }

    /// Apply the mutation within `tx`.
    ///
    /// A slot statement that matches no row writes nothing else. Any error
    /// leaves the caller's transaction to roll back.
    pub fn apply(&self, tx: &Transaction<'_>, mode: AggregateMode) -> StoreResult<MutationEffect> {
        match self {
            SlotMutation::Insert { key, requirements } => {
                let rows = tx.execute(
                    "INSERT INTO committee_slots \
                     (committee_id, senate_division_short_name, slot_requirements) \
                     VALUES (?1, ?2, ?3)",
                    params![key.committee_id, key.senate_division, requirements],
                )?;
                let delta = i64::from(*requirements);
                let total = adjust_aggregate(tx, key.committee_id, delta, mode)?;
                Ok(MutationEffect {
                    row_count: rows,
                    aggregate_delta: delta,
                    total_slots: Some(total),
                })
            }

            SlotMutation::SetRequirement {
                key,
                requirements,
                delta,
            } => {
                let rows = tx.execute(
                    "UPDATE committee_slots SET slot_requirements = ?3 \
                     WHERE committee_id = ?1 AND senate_division_short_name = ?2",
                    params![key.committee_id, key.senate_division, requirements],
                )?;
                if rows == 0 {
                    return Ok(MutationEffect::untouched(0));
                }
                let total = adjust_aggregate(tx, key.committee_id, *delta, mode)?;
                Ok(MutationEffect {
                    row_count: rows,
                    aggregate_delta: *delta,
                    total_slots: Some(total),
                })
            }

            SlotMutation::Remove {
                key,
                decrement_aggregate,
            } => {
                let removed: Option<u32> = if *decrement_aggregate {
                    tx.query_row(
                        "SELECT slot_requirements FROM committee_slots \
                         WHERE committee_id = ?1 AND senate_division_short_name = ?2",
                        params![key.committee_id, key.senate_division],
                        |row| row.get(0),
                    )
                    .optional()?
                } else {
                    None
                };

                let rows = tx.execute(
                    "DELETE FROM committee_slots \
                     WHERE committee_id = ?1 AND senate_division_short_name = ?2",
                    params![key.committee_id, key.senate_division],
                )?;

                // Without decrement_aggregate the committee total is left as is,
                // so it keeps counting the removed seats.
                match removed {
                    Some(requirements) if rows > 0 => {
                        let delta = -i64::from(requirements);
                        let total = adjust_aggregate(tx, key.committee_id, delta, mode)?;
                        Ok(MutationEffect {
                            row_count: rows,
                            aggregate_delta: delta,
                            total_slots: Some(total),
                        })
                    }
                    _ => Ok(MutationEffect::untouched(rows)),
                }
            }
        }
    }
}

/// Propagate a slot change into `committee.total_slots` and return the new total
fn adjust_aggregate(
    tx: &Transaction<'_>,
    committee_id: CommitteeId,
    delta: i64,
    mode: AggregateMode,
) -> StoreResult<i64> {
    let rows = match mode {
        AggregateMode::Delta => tx.execute(
            "UPDATE committee SET total_slots = total_slots + ?2 WHERE committee_id = ?1",
            params![committee_id, delta],
        )?,
        AggregateMode::Recompute => tx.execute(
            "UPDATE committee SET total_slots = \
             (SELECT COALESCE(SUM(slot_requirements), 0) FROM committee_slots \
              WHERE committee_id = ?1) \
             WHERE committee_id = ?1",
            params![committee_id],
        )?,
    };

    if rows == 0 {
        return Err(StoreError::Constraint {
            kind: ConstraintKind::ForeignKey,
            message: format!("committee {} does not exist", committee_id),
        });
    }

    let total = tx.query_row(
        "SELECT total_slots FROM committee WHERE committee_id = ?1",
        params![committee_id],
        |row| row.get(0),
    )?;
    Ok(total)
}
