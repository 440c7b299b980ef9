//! Observable events
//!
//! Every log line the service emits is named by one of these.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    BootStart,
    ConfigLoaded,
    ConfigDefaulted,
    StoreOpened,
    StoreOpenFailed,
    Serving,

    // Ingestion
    RefreshStart,
    RefreshComplete,
    RefreshSkipped,
    SourceFetched,
    /// A primary source failed or timed out and its fallback was used
    SourceFallback,
    SourceFailed,
    EmergencyData,
    DuplicatesRemoved,

    // Record CRUD
    RecordCreated,
    RecordUpdated,
    RecordDeleted,
    RecordRejected,
    StoreFailure,

    // Auth
    AuthSignup,
    AuthLogin,
    AuthRejected,
    AccountDeleted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "AGRIDASH_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreOpenFailed => "STORE_OPEN_FAILED",
            Event::Serving => "AGRIDASH_SERVING",

            Event::RefreshStart => "REFRESH_BEGIN",
            Event::RefreshComplete => "REFRESH_COMPLETE",
            Event::RefreshSkipped => "REFRESH_SKIPPED",
            Event::SourceFetched => "SOURCE_FETCHED",
            Event::SourceFallback => "SOURCE_FALLBACK",
            Event::SourceFailed => "SOURCE_FAILED",
            Event::EmergencyData => "EMERGENCY_DATA_GENERATED",
            Event::DuplicatesRemoved => "DUPLICATES_REMOVED",

            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::StoreFailure => "STORE_FAILURE",

            Event::AuthSignup => "AUTH_SIGNUP",
            Event::AuthLogin => "AUTH_LOGIN",
            Event::AuthRejected => "AUTH_REJECTED",
            Event::AccountDeleted => "ACCOUNT_DELETED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreOpenFailed => Severity::Fatal,
            Event::StoreFailure | Event::SourceFailed => Severity::Error,
            Event::SourceFallback
            | Event::EmergencyData
            | Event::DuplicatesRemoved
            | Event::RecordRejected
            | Event::AuthRejected
            | Event::ConfigDefaulted => Severity::Warn,
            _ => Severity::Info,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        let events = [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::RefreshComplete,
            Event::SourceFallback,
            Event::RecordCreated,
            Event::AuthRejected,
        ];
        for event in events {
            assert!(event.as_str().chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_severities() {
        assert!(Event::StoreOpenFailed.is_fatal());
        assert_eq!(Event::SourceFallback.severity(), Severity::Warn);
        assert_eq!(Event::StoreFailure.severity(), Severity::Error);
        assert_eq!(Event::RefreshComplete.severity(), Severity::Info);
    }
}
