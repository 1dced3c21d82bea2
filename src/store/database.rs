//! # Database Handle
//!
//! Process-wide handle to the relational store. The underlying connection is
//! opened lazily on first use and reused for the life of the handle.
//!
//! All statement work runs on tokio's blocking pool, one closure at a time:
//! reads and transactions queue on the same connection mutex. Callers hand in a
//! closure; `transaction` commits it when it returns `Ok` and rolls back
//! otherwise, so a multi-statement closure is all-or-nothing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tokio::sync::OnceCell;

use super::errors::{StoreError, StoreResult};
use super::schema;
use crate::observability::{log_event_with_fields, Event};

/// Default wait on a locked database before a statement fails
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Where the store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// SQLite file on disk
    File(PathBuf),
    /// Private in-memory database (tests, ephemeral runs)
    Memory,
}

impl DatabaseLocation {
    pub fn describe(&self) -> String {
        match self {
            DatabaseLocation::File(path) => path.display().to_string(),
            DatabaseLocation::Memory => ":memory:".to_string(),
        }
    }
}

type SharedConnection = Arc<Mutex<Connection>>;

/// Lazily opened, shared store connection
pub struct Database {
    location: DatabaseLocation,
    busy_timeout: Duration,
    conn: OnceCell<SharedConnection>,
}

impl Database {
    /// Create a handle for the given location. Nothing is opened yet.
    pub fn new(location: DatabaseLocation, busy_timeout: Duration) -> Self {
        Self {
            location,
            busy_timeout,
            conn: OnceCell::new(),
        }
    }

    /// Handle to a file-backed database with the default busy timeout
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(DatabaseLocation::File(path.into()), DEFAULT_BUSY_TIMEOUT)
    }

    /// Handle to a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(DatabaseLocation::Memory, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Whether the connection has been opened yet
    pub fn is_open(&self) -> bool {
        self.conn.initialized()
    }

    /// Create the tables if they do not exist
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        self.transaction(|tx| schema::apply(tx)).await?;
        let database = self.location.describe();
        log_event_with_fields(Event::SchemaReady, &[("database", database.as_str())]);
        Ok(())
    }

    /// Run read-only work against the connection, outside any explicit
    /// transaction.
    pub async fn read<T, F>(&self, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let handle = self.handle().await?;
        tokio::task::spawn_blocking(move || {
            let guard = lock(&handle)?;
            work(&guard)
        })
        .await?
    }

    /// Run `work` inside one write transaction.
    ///
    /// Writers in this process are serialized by the connection mutex, held
    /// from `BEGIN` to commit or rollback. `BEGIN IMMEDIATE` only matters
    /// when another process opens the same file: it takes SQLite's write
    /// lock up front instead of at the first write. Commits only if `work`
    /// returns `Ok`; any error rolls back every statement `work` issued.
    pub async fn transaction<T, F>(&self, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> StoreResult<T> + Send + 'static,
    {
        let handle = self.handle().await?;
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&handle)?;
            let tx = guard.transaction_with_behavior(TransactionBehavior::Immediate)?;
            match work(&tx) {
                Ok(value) => {
                    tx.commit()?;
                    Ok(value)
                }
                Err(err) => {
                    // Rollback failure is secondary to the error that caused it.
                    let _ = tx.rollback();
                    Err(err)
                }
            }
        })
        .await?
    }

    async fn handle(&self) -> StoreResult<SharedConnection> {
        let handle = self
            .conn
            .get_or_try_init(|| async {
                let location = self.location.clone();
                let busy_timeout = self.busy_timeout;
                let conn = tokio::task::spawn_blocking(move || {
                    open_connection(&location, busy_timeout)
                })
                .await??;
                let database = self.location.describe();
                log_event_with_fields(Event::ConnectionOpened, &[("database", database.as_str())]);
                Ok::<_, StoreError>(Arc::new(Mutex::new(conn)))
            })
            .await?;
        Ok(handle.clone())
    }
}

fn lock(handle: &SharedConnection) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
    handle
        .lock()
        .map_err(|_| StoreError::Connection("connection lock poisoned".to_string()))
}

fn open_connection(location: &DatabaseLocation, busy_timeout: Duration) -> StoreResult<Connection> {
    let conn = match location {
        DatabaseLocation::File(path) => Connection::open(path),
        DatabaseLocation::Memory => Connection::open_in_memory(),
    }
    .map_err(|e| StoreError::Connection(format!("{}: {}", location.describe(), e)))?;

    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
    Ok(conn)
}
