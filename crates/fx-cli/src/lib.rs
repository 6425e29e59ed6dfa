//! Command-line front end for the GLSL effect preprocessor.
//!
//! `fx preprocess` flattens an entry shader and its includes; `fx normalize`
//! maps a captured driver info log back onto the files it came from.

pub mod cli;
pub mod commands;

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error(transparent)]
        Core(#[from] fx_core::Error),

        #[error("{0} error(s) reported")]
        Diagnostics(usize),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
