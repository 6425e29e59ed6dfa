//! Turns raw compiler/linker info logs into structured diagnostics.
//!
//! Drivers print diagnostics as free text in their own layout. Each known
//! layout is a [`VendorGrammar`]: a pattern plus the capture group holding each
//! field. Lines that fit no grammar are kept as generic entries, so nothing the
//! driver printed is ever dropped.

use crate::diagnostics::{DiagnosticLog, LogEntry, StructuredEntry, UNKNOWN_FILE};
use crate::error::{Error, Result};
use crate::lines::lines;
use crate::registry::{PathHandle, PathRegistry};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// `ERROR: <handle>:<line>: <severity>(<ref>) <message>`
    Ati,
    /// `0(<line>) : <severity> <ref>: <message>`
    Nvidia,
    #[default]
    Other,
}

impl Vendor {
    /// Classifies the string reported by `glGetString(GL_VENDOR)`.
    pub fn from_gl_vendor(vendor: &str) -> Self {
        match vendor.trim() {
            "ATI Technologies Inc." => Vendor::Ati,
            "NVIDIA Corporation" => Vendor::Nvidia,
            _ => Vendor::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Vendor::Ati => "ati",
            Vendor::Nvidia => "nvidia",
            Vendor::Other => "other",
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ati" | "amd" | "a" => Ok(Vendor::Ati),
            "nvidia" | "b" => Ok(Vendor::Nvidia),
            "other" | "unknown" => Ok(Vendor::Other),
            other => Err(Error::Parse(format!("unknown vendor '{}'", other))),
        }
    }
}

/// Capture group index of each diagnostic field in a grammar's pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarFields {
    /// `None` when the vendor does not print path handles; the entry file is assumed.
    pub handle: Option<usize>,
    pub line: usize,
    pub severity: usize,
    pub reference: usize,
    pub message: usize,
}

#[derive(Debug, Clone)]
pub struct VendorGrammar {
    pattern: Regex,
    fields: GrammarFields,
}

static ATI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]+: ([0-9]+):([0-9]+): ([a-zA-Z]+)\(([a-zA-Z0-9#]+)\) (.+)$")
        .expect("builtin ATI grammar")
});

static NVIDIA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0\(([0-9]+)\) : ([a-zA-Z]+) ([a-zA-Z0-9]+): (.+)$")
        .expect("builtin NVIDIA grammar")
});

fn group<'t>(caps: &Captures<'t>, idx: usize) -> Option<&'t str> {
    caps.get(idx).map(|m| m.as_str())
}

struct RawFields<'t> {
    handle: Option<&'t str>,
    line: &'t str,
    severity: &'t str,
    reference: &'t str,
    message: &'t str,
}

impl VendorGrammar {
    pub fn new(pattern: &str, fields: GrammarFields) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::Parse(format!("invalid grammar pattern: {}", e)))?;
        Ok(Self { pattern, fields })
    }

    pub fn ati() -> Self {
        Self {
            pattern: ATI_PATTERN.clone(),
            fields: GrammarFields {
                handle: Some(1),
                line: 2,
                severity: 3,
                reference: 4,
                message: 5,
            },
        }
    }

    pub fn nvidia() -> Self {
        Self {
            pattern: NVIDIA_PATTERN.clone(),
            fields: GrammarFields {
                handle: None,
                line: 1,
                severity: 2,
                reference: 3,
                message: 4,
            },
        }
    }

    fn extract<'t>(&self, line: &'t str) -> Option<RawFields<'t>> {
        let caps = self.pattern.captures(line)?;
        let handle = match self.fields.handle {
            Some(idx) => Some(group(&caps, idx)?),
            None => None,
        };
        Some(RawFields {
            handle,
            line: group(&caps, self.fields.line)?,
            severity: group(&caps, self.fields.severity)?,
            reference: group(&caps, self.fields.reference)?,
            message: group(&caps, self.fields.message)?,
        })
    }
}

/// Grammar per vendor. Vendors without an entry only produce generic entries.
#[derive(Debug, Clone, Default)]
pub struct GrammarTable {
    grammars: HashMap<Vendor, VendorGrammar>,
}

impl GrammarTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register(Vendor::Ati, VendorGrammar::ati());
        table.register(Vendor::Nvidia, VendorGrammar::nvidia());
        table
    }

    /// Adds or replaces the grammar used for `vendor`.
    pub fn register(&mut self, vendor: Vendor, grammar: VendorGrammar) -> &mut Self {
        self.grammars.insert(vendor, grammar);
        self
    }

    pub fn get(&self, vendor: Vendor) -> Option<&VendorGrammar> {
        self.grammars.get(&vendor)
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticNormalizer {
    vendor: Vendor,
    grammars: GrammarTable,
}

impl DiagnosticNormalizer {
    pub fn new(vendor: Vendor) -> Self {
        Self::with_grammars(vendor, GrammarTable::builtin())
    }

    pub fn with_grammars(vendor: Vendor, grammars: GrammarTable) -> Self {
        Self { vendor, grammars }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Appends one entry per line of `raw` to `log` and returns how many were added.
    ///
    /// `entry` is the handle reported for vendors whose output carries no handle.
    /// Processing stops at the first blank line.
    pub fn normalize(
        &self,
        raw: &str,
        entry: PathHandle,
        registry: &PathRegistry,
        log: &mut DiagnosticLog,
    ) -> usize {
        let raw = raw.trim_end_matches('\0');
        if raw.is_empty() {
            return 0;
        }

        let grammar = self.grammars.get(self.vendor);
        let mut appended = 0;
        for line in lines(raw) {
            let text = line.content().trim();
            if text.is_empty() {
                break;
            }
            let structured = grammar
                .and_then(|grammar| grammar.extract(text))
                .and_then(|fields| resolve(fields, entry, registry));
            match structured {
                Some(structured) => log.push(LogEntry::Structured(structured)),
                None => log.generic(text),
            }
            appended += 1;
        }

        debug!(
            "normalized {} diagnostic line(s) with the {} grammar",
            appended, self.vendor
        );
        appended
    }
}

fn resolve(
    fields: RawFields<'_>,
    entry: PathHandle,
    registry: &PathRegistry,
) -> Option<StructuredEntry> {
    let line = fields.line.parse::<u32>().ok()?;
    let handle = match fields.handle {
        Some(text) => text.parse::<PathHandle>().ok(),
        None => Some(entry),
    };
    let file = handle
        .and_then(|handle| registry.retrieve(handle).ok())
        .unwrap_or(UNKNOWN_FILE);
    Some(StructuredEntry {
        line,
        file: file.to_string(),
        severity: fields.severity.to_string(),
        reference: fields.reference.to_string(),
        message: fields.message.to_string(),
    })
}
