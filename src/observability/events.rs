//! Observable events
//!
//! Events are explicit and typed; each maps to one log line.

use std::fmt;

/// Level at which an event is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
}

/// Observable events in query derivation and execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// An entity descriptor was loaded and registered
    SchemaLoaded,
    /// An access path was chosen for a query
    AccessPathSelected,
    /// No key condition could serve the predicate; a scan was chosen
    ScanFallback,
    /// A count is being computed by scanning
    CountViaScan,
    /// A native request was handed to the store
    QueryExecuted,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::AccessPathSelected => "ACCESS_PATH_SELECTED",
            Event::ScanFallback => "SCAN_FALLBACK",
            Event::CountViaScan => "COUNT_VIA_SCAN",
            Event::QueryExecuted => "QUERY_EXECUTED",
        }
    }

    /// Returns the level the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaLoaded => Severity::Info,
            Event::AccessPathSelected => Severity::Debug,
            Event::ScanFallback | Event::CountViaScan => Severity::Warn,
            Event::QueryExecuted => Severity::Trace,
        }
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
    fn test_event_names() {
        assert_eq!(Event::AccessPathSelected.as_str(), "ACCESS_PATH_SELECTED");
        assert_eq!(format!("{}", Event::ScanFallback), "SCAN_FALLBACK");
    }

    #[test]
    fn test_scan_events_warn() {
        assert_eq!(Event::ScanFallback.severity(), Severity::Warn);
        assert_eq!(Event::CountViaScan.severity(), Severity::Warn);
        assert!(Event::SchemaLoaded.severity() > Event::AccessPathSelected.severity());
    }
}
