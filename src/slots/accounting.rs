//! # Slot Accounting
//!
//! Create, update and delete of committee slot requirements, each run as one
//! store transaction that also keeps `committee.total_slots` in step.
//!
//! Concurrency: each operation holds the store's connection mutex for its
//! whole transaction, so operations from this process never interleave.
//! `update_slot` reads the current requirement before its write transaction;
//! two updates racing on the same slot can both read the same old value, and
//! the aggregate then reflects only the delta of the last one to commit.
//! `AggregateMode::Recompute` removes that window by rewriting the total from
//! the slot rows inside the transaction.

use std::sync::Arc;

use rusqlite::{params, OptionalExtension};

use super::errors::{SlotError, SlotResult};
use super::mutation::{MutationEffect, SlotMutation};
use super::types::{
    CommitteeId, CommitteeSlot, CreateOutcome, DeleteOutcome, SlotKey, SlotPolicy, UpdateOutcome,
};
use crate::observability::ObservationScope;
use crate::store::{Database, StoreError};

/// Slot accounting transaction layer
pub struct SlotAccounting {
    db: Arc<Database>,
    policy: SlotPolicy,
}

impl SlotAccounting {
    pub fn new(db: Arc<Database>, policy: SlotPolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Insert a slot row and grow the committee's aggregate by
    /// `slot_requirements`, atomically.
    ///
    /// Fails with `ForeignKeyViolation` for an unknown committee or division
    /// and `UniqueConstraintViolation` when the pair already has a slot; in
    /// both cases nothing is written.
    pub async fn create_slot(
        &self,
        key: SlotKey,
        slot_requirements: u32,
    ) -> SlotResult<CreateOutcome> {
        let committee = key.committee_id.to_string();
        let scope = ObservationScope::with_fields(
            "SLOT_CREATE",
            &[
                ("committee_id", committee.as_str()),
                ("senate_division", key.senate_division.as_str()),
            ],
        );

        let mutation = SlotMutation::Insert {
            key: key.clone(),
            requirements: slot_requirements,
        };
        let effect = match self.run(mutation).await {
            Ok(effect) => effect,
            Err(err) => return Err(finish_with_error(scope, err)),
        };

        let total_slots = effect.total_slots.unwrap_or_default();
        scope.complete_with_fields(&[
            ("slot_requirements", slot_requirements.to_string().as_str()),
            ("total_slots", total_slots.to_string().as_str()),
        ]);

        Ok(CreateOutcome {
            key,
            slot_requirements,
            total_slots,
        })
    }

    /// Overwrite a slot's requirement and move the committee's aggregate by
    /// the difference from the previous value.
    ///
    /// The previous value comes from a separate read issued before the write
    /// transaction. A slot missing at either point is `NotFound`, and nothing
    /// is written.
    pub async fn update_slot(
        &self,
        key: SlotKey,
        slot_requirements: u32,
    ) -> SlotResult<UpdateOutcome> {
        let committee = key.committee_id.to_string();
        let scope = ObservationScope::with_fields(
            "SLOT_UPDATE",
            &[
                ("committee_id", committee.as_str()),
                ("senate_division", key.senate_division.as_str()),
            ],
        );

        let previous = match self.get_slot(&key).await {
            Ok(Some(slot)) => slot.slot_requirements,
            Ok(None) => return Err(finish_with_error(scope, SlotError::NotFound(key))),
            Err(err) => return Err(finish_with_error(scope, err)),
        };
        let delta = i64::from(slot_requirements) - i64::from(previous);

        let mutation = SlotMutation::SetRequirement {
            key: key.clone(),
            requirements: slot_requirements,
            delta,
        };
        let effect = match self.run(mutation).await {
            Ok(effect) => effect,
            Err(err) => return Err(finish_with_error(scope, err)),
        };

        // Deleted between the pre-read and the write.
        if effect.row_count == 0 {
            return Err(finish_with_error(scope, SlotError::NotFound(key)));
        }

        let total_slots = effect.total_slots.unwrap_or_default();
        scope.complete_with_fields(&[
            ("previous", previous.to_string().as_str()),
            ("slot_requirements", slot_requirements.to_string().as_str()),
            ("delta", effect.aggregate_delta.to_string().as_str()),
            ("total_slots", total_slots.to_string().as_str()),
        ]);

        Ok(UpdateOutcome {
            key,
            row_count: effect.row_count,
            previous,
            slot_requirements,
            delta: effect.aggregate_delta,
            total_slots,
        })
    }

    /// Delete a slot row.
    ///
    /// A missing pair is not an error here: the outcome reports a zero row
    /// count and the caller decides what that means.
    ///
    /// NOTE: unlike create and update, delete leaves `total_slots` unchanged
    /// unless `SlotPolicy::decrement_on_delete` is set, so by default the
    /// aggregate drifts above the sum of the remaining slots. This matches
    /// the behavior existing data was produced under.
    pub async fn delete_slot(&self, key: SlotKey) -> SlotResult<DeleteOutcome> {
        let committee = key.committee_id.to_string();
        let scope = ObservationScope::with_fields(
            "SLOT_DELETE",
            &[
                ("committee_id", committee.as_str()),
                ("senate_division", key.senate_division.as_str()),
            ],
        );

        let mutation = SlotMutation::Remove {
            key: key.clone(),
            decrement_aggregate: self.policy.decrement_on_delete,
        };
        let effect = match self.run(mutation).await {
            Ok(effect) => effect,
            Err(err) => return Err(finish_with_error(scope, err)),
        };

        scope.complete_with_fields(&[
            ("row_count", effect.row_count.to_string().as_str()),
            ("aggregate_delta", effect.aggregate_delta.to_string().as_str()),
        ]);

        Ok(DeleteOutcome {
            key,
            row_count: effect.row_count,
            aggregate_delta: effect.aggregate_delta,
        })
    }

    /// Read one slot row
    pub async fn get_slot(&self, key: &SlotKey) -> SlotResult<Option<CommitteeSlot>> {
        let key = key.clone();
        let slot = self
            .db
            .read(move |conn| {
                let slot = conn
                    .query_row(
                        "SELECT committee_id, senate_division_short_name, slot_requirements \
                         FROM committee_slots \
                         WHERE committee_id = ?1 AND senate_division_short_name = ?2",
                        params![key.committee_id, key.senate_division],
                        |row| {
                            Ok(CommitteeSlot {
                                committee_id: row.get(0)?,
                                senate_division: row.get(1)?,
                                slot_requirements: row.get(2)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(slot)
            })
            .await?;
        Ok(slot)
    }

    /// All slot rows of a committee, ordered by division
    pub async fn list_slots(&self, committee_id: CommitteeId) -> SlotResult<Vec<CommitteeSlot>> {
        let slots = self
            .db
            .read(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT committee_id, senate_division_short_name, slot_requirements \
                     FROM committee_slots WHERE committee_id = ?1 \
                     ORDER BY senate_division_short_name",
                )?;
                let rows = stmt.query_map(params![committee_id], |row| {
                    Ok(CommitteeSlot {
                        committee_id: row.get(0)?,
                        senate_division: row.get(1)?,
                        slot_requirements: row.get(2)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
            })
            .await?;
        Ok(slots)
    }

    /// Current aggregate of a committee, `None` if the committee does not exist
    pub async fn committee_total(&self, committee_id: CommitteeId) -> SlotResult<Option<i64>> {
        let total = self
            .db
            .read(move |conn| {
                let total = conn
                    .query_row(
                        "SELECT total_slots FROM committee WHERE committee_id = ?1",
                        params![committee_id],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(total)
            })
            .await?;
        Ok(total)
    }

    async fn run(&self, mutation: SlotMutation) -> SlotResult<MutationEffect> {
        let mode = self.policy.aggregate_mode;
        let effect = self
            .db
            .transaction(move |tx| mutation.apply(tx, mode))
            .await?;
        Ok(effect)
    }
}

/// Close the operation's scope according to the error class and hand the
/// error back.
fn finish_with_error(scope: ObservationScope<'_>, err: SlotError) -> SlotError {
    match &err {
        SlotError::Transaction(reason) => scope.fail(reason),
        other => scope.reject(&other.to_string()),
    }
    err
}
