//! Observable events for the committee service
//!
//! Events are explicit and typed; each maps to one stable log event name.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Startup aborted (config, store or listener failure)
    BootFailed,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Store
    /// Store connection opened (first use)
    ConnectionOpened,
    /// Schema applied
    SchemaReady,

    // Server
    /// HTTP listener bound
    Serving,

    // Catalog
    /// Committee row created
    CommitteeCreated,
    /// Senate division row created
    SenateDivisionCreated,

    // Verification
    /// Committee aggregate differs from the sum of its slots
    ConsistencyDrift,
    /// Verification pass finished
    ConsistencyVerified,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "COMMITTEE_API_STARTUP_BEGIN",
            Event::BootComplete => "COMMITTEE_API_STARTUP_COMPLETE",
            Event::BootFailed => "COMMITTEE_API_STARTUP_FAILED",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::ConnectionOpened => "STORE_CONNECTION_OPENED",
            Event::SchemaReady => "STORE_SCHEMA_READY",

            Event::Serving => "COMMITTEE_API_SERVING",

            Event::CommitteeCreated => "COMMITTEE_CREATED",
            Event::SenateDivisionCreated => "SENATE_DIVISION_CREATED",

            Event::ConsistencyDrift => "CONSISTENCY_DRIFT",
            Event::ConsistencyVerified => "CONSISTENCY_VERIFIED",
        }
    }

    /// Events that indicate a failed operation are logged at ERROR
    pub fn is_error(&self) -> bool {
        matches!(self, Event::BootFailed)
    }

    /// Events that deserve attention without being failures
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::ConsistencyDrift)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
