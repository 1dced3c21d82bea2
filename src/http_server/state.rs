//! Shared handler state

use std::sync::Arc;

use crate::committees::CommitteeCatalog;
use crate::observability::MetricsRegistry;
use crate::slots::{SlotAccounting, SlotPolicy};
use crate::store::Database;

use super::errors::ApiResult;

/// State shared by every router
pub struct AppState {
    pub slots: SlotAccounting,
    pub catalog: CommitteeCatalog,
    pub metrics: MetricsRegistry,
}

impl AppState {
    pub fn new(db: Arc<Database>, policy: SlotPolicy) -> Self {
        Self {
            slots: SlotAccounting::new(db.clone(), policy),
            catalog: CommitteeCatalog::new(db),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Count a failed handler result before it is turned into a response
    pub fn observe<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(err) = &result {
            err.record(&self.metrics);
        }
        result
    }
}
