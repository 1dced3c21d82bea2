//! Observability for the committee service
//!
//! - Structured logging (JSON lines, deterministic key order)
//! - Typed events
//! - Operation scopes with elapsed time
//! - Counter metrics
//!
//! ```ignore
//! use committee_api::observability::{Logger, Event, log_event_with_fields};
//!
//! Logger::info("SLOT_CREATE_COMPLETE", &[("committee_id", "1")]);
//! log_event_with_fields(Event::ConfigLoaded, &[("config", "./committee-api.json")]);
//! ```
//!
//! Logging never fails an operation: write errors are swallowed.

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

fn severity_for(event: Event) -> Severity {
    if event.is_error() {
        Severity::Error
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
