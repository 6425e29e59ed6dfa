//! Command implementations for the `fx` CLI

pub mod normalize;
pub mod preprocess;

pub use normalize::normalize_command;
pub use preprocess::preprocess_command;

use console::style;
use fx_core::DiagnosticLog;
use std::path::Path;

/// Directory includes resolve against when `--base-dir` is not given: the
/// entry file's own directory, or `.` for a bare file name.
pub fn default_base_dir(entry: &Path) -> String {
    match entry.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    }
}

pub(crate) fn base_dir(entry: &Path, base_dir: Option<&Path>) -> String {
    base_dir
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|| default_base_dir(entry))
}

/// Prints a failure headline followed by everything the log collected.
pub(crate) fn report_failure(headline: &str, log: &DiagnosticLog) {
    eprintln!("{} {}", style("error:").for_stderr().red().bold(), headline);
    for entry in log {
        eprintln!("  {}", entry);
    }
}
