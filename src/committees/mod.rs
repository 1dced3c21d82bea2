//! # Committees and Senate Divisions
//!
//! Parent rows referenced by committee slots. A committee starts with
//! `total_slots = 0`; only the slot accounting layer changes it afterwards.

use std::sync::Arc;

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::observability::{log_event_with_fields, Event};
use crate::slots::CommitteeId;
use crate::store::{Database, StoreResult};

/// Committee row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    pub committee_id: CommitteeId,
    pub name: String,
    pub description: String,
    pub total_slots: i64,
}

impl Committee {
    pub fn resource_path(&self) -> String {
        format!("/committees/{}", self.committee_id)
    }
}

/// Senate division row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenateDivision {
    pub short_name: String,
    pub name: String,
}

/// Access to committee and senate division rows
pub struct CommitteeCatalog {
    db: Arc<Database>,
}

impl CommitteeCatalog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a committee. A duplicate name surfaces as a unique constraint
    /// violation from the store.
    pub async fn create_committee(
        &self,
        name: String,
        description: String,
    ) -> StoreResult<Committee> {
        let committee = self
            .db
            .transaction(move |tx| {
                tx.execute(
                    "INSERT INTO committee (name, description, total_slots) VALUES (?1, ?2, 0)",
                    params![name, description],
                )?;
                Ok(Committee {
                    committee_id: tx.last_insert_rowid(),
                    name,
                    description,
                    total_slots: 0,
                })
            })
            .await?;

        let committee_id = committee.committee_id.to_string();
        log_event_with_fields(
            Event::CommitteeCreated,
            &[("committee_id", committee_id.as_str()), ("name", committee.name.as_str())],
        );
        Ok(committee)
    }

    pub async fn get_committee(&self, committee_id: CommitteeId) -> StoreResult<Option<Committee>> {
        self.db
            .read(move |conn| {
                let committee = conn
                    .query_row(
                        "SELECT committee_id, name, description, total_slots \
                         FROM committee WHERE committee_id = ?1",
                        params![committee_id],
                        |row| {
                            Ok(Committee {
                                committee_id: row.get(0)?,
                                name: row.get(1)?,
                                description: row.get(2)?,
                                total_slots: row.get(3)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(committee)
            })
            .await
    }

    /// Insert a senate division. A duplicate short name is a unique
    /// constraint violation.
    pub async fn create_senate_division(
        &self,
        short_name: String,
        name: String,
    ) -> StoreResult<SenateDivision> {
        let division = self
            .db
            .transaction(move |tx| {
                tx.execute(
                    "INSERT INTO senate_division (senate_division_short_name, name) \
                     VALUES (?1, ?2)",
                    params![short_name, name],
                )?;
                Ok(SenateDivision { short_name, name })
            })
            .await?;

        log_event_with_fields(
            Event::SenateDivisionCreated,
            &[("short_name", division.short_name.as_str())],
        );
        Ok(division)
    }
}
