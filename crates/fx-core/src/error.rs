use crate::registry::PathHandle;
use crate::vfs::FsError;
use itertools::Itertools;
use std::result;
use thiserror::Error;

/// Coarse error classification reported at the library boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Token,
    NotFound,
    NotSet,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Malformed include directive in {file} at line {line}: {directive}")]
    MalformedInclude {
        file: String,
        line: u32,
        directive: String,
    },
    #[error("{}", open_failure_message(.path, .source))]
    IncludeNotFound {
        path: String,
        #[source]
        source: FsError,
    },
    #[error("{path} is recursively included ({})", chain.iter().join(" -> "))]
    IncludeCycle { path: String, chain: Vec<String> },
    #[error("Include depth limit of {limit} exceeded while including {path}")]
    IncludeDepthExceeded { path: String, limit: usize },
    #[error("Path handle {0} is not registered")]
    UnknownHandle(PathHandle),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} is not set")]
    NotSet(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Generic error: {0}")]
    Generic(String),
}

/// `<path>: <reason>` for a source file that could not be read.
pub(crate) fn open_failure_message(path: &str, err: &FsError) -> String {
    match err {
        FsError::NotFound(_) => format!("{}: No such file or directory", path),
        FsError::InvalidUtf8 { .. } => format!("{}: not valid UTF-8", path),
        FsError::Io(io) => format!("{}: {}", path, io),
    }
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn not_set(what: impl Into<String>) -> Self {
        Error::NotSet(what.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) | Error::Generic(_) => ErrorKind::Parse,
            Error::MalformedInclude { .. } => ErrorKind::Token,
            Error::IncludeNotFound { .. } | Error::Io(_) => ErrorKind::Io,
            Error::IncludeCycle { .. } | Error::IncludeDepthExceeded { .. } => ErrorKind::Parse,
            Error::UnknownHandle(_) | Error::NotFound(_) => ErrorKind::NotFound,
            Error::NotSet(_) => ErrorKind::NotSet,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
