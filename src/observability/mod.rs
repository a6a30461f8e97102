//! Observability
//!
//! Structured JSON logging, typed events, counters, and begin/complete scopes.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on the pipeline
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use edmquery::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::RequestReceived, &[("entity_set", "Books")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_requests_served();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a pipeline event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
