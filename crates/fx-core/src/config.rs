use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

/// `GLSLFX_TRACE_SOURCES`: log every flattened source at trace level.
fn trace_sources_from_env() -> Option<bool> {
    static TRACE: OnceLock<Option<bool>> = OnceLock::new();
    *TRACE.get_or_init(|| env_true("GLSLFX_TRACE_SOURCES"))
}

/// `GLSLFX_MAX_INCLUDE_DEPTH`: overrides the default include nesting limit.
fn max_include_depth_from_env() -> Option<usize> {
    static DEPTH: OnceLock<Option<usize>> = OnceLock::new();
    *DEPTH.get_or_init(|| {
        std::env::var("GLSLFX_MAX_INCLUDE_DEPTH")
            .ok()
            .and_then(|val| val.trim().parse().ok())
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Maximum nesting of `#include` below the entry file.
    pub max_include_depth: usize,
    /// Emit the flattened source as a trace event once preprocessing succeeds.
    pub trace_sources: bool,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            trace_sources: false,
        }
    }
}

impl PreprocessorConfig {
    /// Overrides fields with the `GLSLFX_*` environment variables that are set.
    pub fn apply_env(mut self) -> Self {
        if let Some(depth) = max_include_depth_from_env() {
            self.max_include_depth = depth;
        }
        if let Some(trace) = trace_sources_from_env() {
            self.trace_sources = trace;
        }
        self
    }
}
