//! The diagnostic log shared by the preprocessor and the normalizer.
//!
//! Entries are kept in the order they were produced: preprocessing failures
//! first, then compiler output in the order the driver printed it. The log is
//! never sorted, merged or deduplicated.

use crate::error::Result;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Path reported when a diagnostic names a handle the registry never issued.
pub const UNKNOWN_FILE: &str = "<unknown>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredEntry {
    pub line: u32,
    pub file: String,
    /// Severity as printed by the compiler, e.g. `error` or `warning`.
    pub severity: String,
    /// Vendor reference code, e.g. `#160` or `C7533`.
    pub reference: String,
    pub message: String,
}

impl StructuredEntry {
    pub fn is_error(&self) -> bool {
        self.severity.eq_ignore_ascii_case("error")
    }

    pub fn is_warning(&self) -> bool {
        self.severity.eq_ignore_ascii_case("warning")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Structured(StructuredEntry),
    /// A line that matched no known diagnostic grammar, kept verbatim.
    Generic { message: String },
}

impl LogEntry {
    pub fn message(&self) -> &str {
        match self {
            LogEntry::Structured(entry) => &entry.message,
            LogEntry::Generic { message } => message,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, LogEntry::Generic { .. })
    }

    pub fn as_structured(&self) -> Option<&StructuredEntry> {
        match self {
            LogEntry::Structured(entry) => Some(entry),
            LogEntry::Generic { .. } => None,
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogEntry::Structured(entry) => write!(
                f,
                "{}:{} {} {}: {}",
                entry.file, entry.line, entry.severity, entry.reference, entry.message
            ),
            LogEntry::Generic { message } => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiagnosticLog {
    entries: Vec<LogEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Append a structured diagnostic.
    pub fn message(
        &mut self,
        line: u32,
        file: impl Into<String>,
        severity: impl Into<String>,
        reference: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(LogEntry::Structured(StructuredEntry {
            line,
            file: file.into(),
            severity: severity.into(),
            reference: reference.into(),
            message: message.into(),
        }));
    }

    /// Append an unclassified message.
    pub fn generic(&mut self, message: impl Into<String>) {
        self.push(LogEntry::Generic {
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &StructuredEntry> {
        self.entries
            .iter()
            .filter_map(LogEntry::as_structured)
            .filter(|entry| entry.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StructuredEntry> {
        self.entries
            .iter()
            .filter_map(LogEntry::as_structured)
            .filter(|entry| entry.is_warning())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for DiagnosticLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
