//! Flatten an entry shader and its includes

use super::{base_dir, report_failure};
use crate::{Result, cli::CliConfig};
use clap::Args;
use fx_core::vfs::NativeFileSystem;
use fx_core::{DiagnosticLog, PathRegistry, Preprocessor};
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the preprocess command
#[derive(Debug, Clone, Args)]
pub struct PreprocessArgs {
    /// Entry shader file
    pub entry: PathBuf,
    /// Directory `#include` paths are relative to (defaults to the entry's directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
    /// Write the flattened source here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the preprocess command
pub fn preprocess_command(args: PreprocessArgs, config: &CliConfig) -> Result<()> {
    let entry = args.entry.to_string_lossy().into_owned();
    let base_dir = base_dir(&args.entry, args.base_dir.as_deref());
    debug!("preprocessing {} against {}", entry, base_dir);

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

    match &args.output {
        Some(path) => {
            std::fs::write(path, &annotated.source)?;
            info!(
                "wrote {} ({} files) to {}",
                entry,
                annotated.dependencies.len(),
                path.display()
            );
        }
        None => print!("{}", annotated.source),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preprocess_to_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.frag"), "#include \"b.glsl\"\nvoid main() {}\n").unwrap();
        std::fs::write(dir.path().join("b.glsl"), "out vec4 color;\n").unwrap();
        let output = dir.path().join("a.flat.frag");

        let args = PreprocessArgs {
            entry: dir.path().join("a.frag"),
            base_dir: None,
            output: Some(output.clone()),
        };
        preprocess_command(args, &CliConfig::default()).unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "#line 1 1\nout vec4 color;\n#line 2 0\nvoid main() {}\n"
        );
    }
}
