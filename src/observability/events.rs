//! Observable pipeline events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Service configuration loaded
    ConfigLoaded,
    /// Entity model loaded and validated
    ModelLoaded,

    // Request pipeline
    /// Parsed request handed to the service
    RequestReceived,
    /// Resource path folded into a composed query
    QueryAssembled,
    /// Filter compiled into a search predicate
    FilterCompiled,
    /// Filter dropped by the lenient policy
    FilterIgnored,
    /// Search call returned
    SearchExecuted,
    /// Search call failed
    SearchFailed,
    /// Response body written
    ResponseSerialized,
    /// Request failed with a protocol status
    RequestRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ModelLoaded => "MODEL_LOADED",
            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::QueryAssembled => "QUERY_ASSEMBLED",
            Event::FilterCompiled => "FILTER_COMPILED",
            Event::FilterIgnored => "FILTER_IGNORED",
            Event::SearchExecuted => "SEARCH_EXECUTED",
            Event::SearchFailed => "SEARCH_FAILED",
            Event::ResponseSerialized => "RESPONSE_SERIALIZED",
            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FilterIgnored | Event::RequestRejected => Severity::Warn,
            Event::SearchFailed => Severity::Error,
            Event::QueryAssembled | Event::FilterCompiled => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
