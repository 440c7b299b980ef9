//! Observability for agridash
//!
//! Structured JSON logging keyed by typed [`Event`]s. Logging never fails
//! the operation being logged.
//!
//! ```ignore
//! use agridash::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SourceFetched, &[("source", "USDA"), ("records", "57")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
