//! `fx`: GLSL effect preprocessor and driver-log normaliser
//!
//! # Usage
//!
//! ```bash
//! # Flatten a shader and its includes
//! fx preprocess data/fx/simple.frag --output simple.flat.frag
//!
//! # Map an ATI info log back to the original files
//! fx normalize data/fx/simple.frag --log driver.log --vendor ati
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use fx_cli::{
    Result,
    cli::CliConfig,
    commands::{self, normalize::NormalizeArgs, preprocess::PreprocessArgs},
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "fx",
    version = env!("CARGO_PKG_VERSION"),
    about = "GLSL effect preprocessor and compiler diagnostic normaliser",
    long_about = r#"
Flattens #include trees into a single shader source annotated with #line
markers, and turns vendor compiler logs into file:line diagnostics.

EXAMPLES:
    fx preprocess fx/simple.frag                      # Print the flattened source
    fx normalize fx/simple.frag --log out.log --vendor nvidia
    "#
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten an entry shader and its includes
    Preprocess(PreprocessArgs),

    /// Normalise a captured compiler or linker log
    Normalize(NormalizeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log_level, cli.log_format)?;

    match run(&cli) {
        Ok(()) => {
            if cli.verbose > 0 {
                info!("Command completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            if cli.verbose > 0 {
                error!(?e, "detailed error context");
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Preprocess(args) => commands::preprocess_command(args.clone(), &config),
        Commands::Normalize(args) => commands::normalize_command(args.clone(), &config),
    }
}

fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_level: Option<LogLevel>,
    log_format: LogFormat,
) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout carries the flattened source and the normalised log
    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
