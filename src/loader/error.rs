//! Loader error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving pages and imports.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Working with external paths is prohibited: `{}`", .0.display())]
    SandboxViolation(PathBuf),

    #[error("{0}")]
    InvalidInput(String),

    #[error("IO error when reading `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error in `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fieldless classification of [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SandboxViolation,
    InvalidInput,
    MissingOrUnreadable,
    ParseError,
}

impl LoadError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SandboxViolation(_) => ErrorKind::SandboxViolation,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Io { .. } => ErrorKind::MissingOrUnreadable,
            Self::Parse { .. } => ErrorKind::ParseError,
        }
    }
}
