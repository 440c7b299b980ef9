//! Structured JSON logger
//!
//! One line per event. `event` comes first, then `severity`, then the
//! caller's fields sorted by key so identical events produce identical lines.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    /// Recoverable issues, e.g. a source falling back to fixture data
    Warn = 2,
    /// Operation failures surfaced to a caller
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// ERROR and FATAL go to stderr, everything else to stdout
    pub fn uses_stderr(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateless JSON line logger
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity.uses_stderr() {
            Self::write_line(&mut io::stderr(), severity, event, fields);
        } else {
            Self::write_line(&mut io::stdout(), severity, event, fields);
        }
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }

    fn write_line<W: Write>(
        writer: &mut W,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) {
        let line = format_line(severity, event, fields);
        // A single write per line keeps concurrent handlers from interleaving
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

/// Render one log line, including the trailing newline
pub(crate) fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(128);
    out.push_str("{\"event\":");
    push_json_str(&mut out, event);
    out.push_str(",\"severity\":");
    push_json_str(&mut out, severity.as_str());

    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    for (key, value) in sorted {
        out.push(',');
        push_json_str(&mut out, key);
        out.push(':');
        push_json_str(&mut out, value);
    }

    out.push_str("}\n");
    out
}

fn push_json_str(out: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"\""),
    }
}
