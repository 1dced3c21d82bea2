//! Table definitions for the governance store
//!
//! DDL is idempotent and applied on `init` and on server startup.

use rusqlite::Connection;

use super::errors::StoreResult;

/// Pragmas applied to every connection as it is opened
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Committee, senate division and committee slot tables.
///
/// `committee.total_slots` is the derived aggregate maintained by the slot
/// accounting layer; nothing else writes it.
pub const SCHEMA_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS senate_division (
    senate_division_short_name TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS committee (
    committee_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    total_slots INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS committee_slots (
    committee_id INTEGER NOT NULL
        REFERENCES committee (committee_id),
    senate_division_short_name TEXT NOT NULL
        REFERENCES senate_division (senate_division_short_name),
    slot_requirements INTEGER NOT NULL CHECK (slot_requirements >= 0),
    UNIQUE (committee_id, senate_division_short_name)
);
"#;

/// Apply the schema to an open connection
pub fn apply(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA_DDL)?;
    Ok(())
}
