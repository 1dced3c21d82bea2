//! Scoped BEGIN / COMPLETE / FAILED logging around one operation
//!
//! ```ignore
//! let scope = ObservationScope::with_fields("SLOT_UPDATE", &[("committee_id", "1")]);
//! // ... do work ...
//! scope.complete_with_fields(&[("delta", "-2")]);
//! ```
//!
//! `{NAME}_BEGIN` is logged on creation. Completion and failure carry the
//! creation fields plus `elapsed_ms`. A scope dropped without either logs
//! `{NAME}_INCOMPLETE` at WARN, which is what a cancelled request looks like.

use std::time::Instant;

use super::logger::Logger;

pub struct ObservationScope<'a> {
    name: &'a str,
    completed: bool,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Create a new scope and log `{name}_BEGIN`
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new scope carrying fields that repeat on every line it logs
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::trace(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            completed: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Log `{name}_COMPLETE` at INFO
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Log `{name}_COMPLETE` at INFO with additional fields
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.completed = true;
        let elapsed = self.timer.elapsed_ms();
        let mut all_fields = self.field_refs();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed.as_str()));
        Logger::info(&format!("{}_COMPLETE", self.name), &all_fields);
    }

    /// Log `{name}_FAILED` at ERROR
    pub fn fail(mut self, reason: &str) {
        self.completed = true;
        let elapsed = self.timer.elapsed_ms();
        let mut all_fields = self.field_refs();
        all_fields.push(("reason", reason));
        all_fields.push(("elapsed_ms", elapsed.as_str()));
        Logger::error(&format!("{}_FAILED", self.name), &all_fields);
    }

    /// Log `{name}_REJECTED` at WARN; the operation ended without a store failure
    pub fn reject(mut self, reason: &str) {
        self.completed = true;
        let mut all_fields = self.field_refs();
        all_fields.push(("reason", reason));
        Logger::warn(&format!("{}_REJECTED", self.name), &all_fields);
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            let mut fields = self.field_refs();
            fields.push(("reason", "scope dropped without completion"));
            Logger::warn(&format!("{}_INCOMPLETE", self.name), &fields);
        }
    }
}

/// Wall-clock timer for `elapsed_ms` fields
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
