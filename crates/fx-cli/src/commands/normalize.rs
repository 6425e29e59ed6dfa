//! Map a captured driver info log back onto shader sources

use super::{base_dir, report_failure};
use crate::cli::{CliConfig, OutputFormat};
use crate::{CliError, Result};
use clap::Args;
use fx_core::vfs::NativeFileSystem;
use fx_core::{DiagnosticLog, DiagnosticNormalizer, PathRegistry, Preprocessor, Vendor};
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the normalize command
#[derive(Debug, Clone, Args)]
pub struct NormalizeArgs {
    /// Entry shader the log was produced for
    pub entry: PathBuf,
    /// Captured compiler or linker info log
    #[arg(long)]
    pub log: PathBuf,
    /// Driver vendor whose log layout to parse (ati, nvidia, other)
    #[arg(long)]
    pub vendor: Option<Vendor>,
    /// Directory `#include` paths are relative to (defaults to the entry's directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Re-runs the preprocessor so handles in the log resolve to the same paths
/// the driver saw, then normalises the log.
pub fn normalize(args: &NormalizeArgs, config: &CliConfig) -> Result<DiagnosticLog> {
    let entry = args.entry.to_string_lossy().into_owned();
    let base_dir = base_dir(&args.entry, args.base_dir.as_deref());
    let vendor = args.vendor.unwrap_or(config.normalize.vendor);

    let fs = NativeFileSystem::new();
    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let annotated = match Preprocessor::new(&fs, base_dir)
        .with_config(config.preprocessor_config())
        .run(&entry, &mut registry, &mut log)
    {
        Ok(annotated) => annotated,
        Err(err) => {
            report_failure(&err.to_string(), &log);
            return Err(err.into());
        }
    };

    let raw = std::fs::read_to_string(&args.log)?;
    let added =
        DiagnosticNormalizer::new(vendor).normalize(&raw, annotated.entry, &registry, &mut log);
    debug!(
        "{} entries from {} using the {} grammar",
        added,
        args.log.display(),
        vendor
    );
    Ok(log)
}

/// Execute the normalize command
pub fn normalize_command(args: NormalizeArgs, config: &CliConfig) -> Result<()> {
    let log = normalize(&args, config)?;

    match args.format.unwrap_or(config.normalize.format) {
        OutputFormat::Plain => print!("{}", log),
        OutputFormat::Json => println!("{}", log.to_json()?),
    }

    let errors = log.errors().count();
    if errors > 0 {
        return Err(CliError::Diagnostics(errors));
    }
    Ok(())
}
