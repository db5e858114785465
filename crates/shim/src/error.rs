//! Error kinds for a wrapped invocation
//!
//! Every variant is fatal for the invocation. The `Display` form is the
//! one-line diagnostic the wrapper prints before exiting with status 1.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use vcslog_common::PathError;

pub type Result<T, E = ShimError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("required environment variable ${0} is not set")]
    MissingEnv(&'static str),

    #[error("could not determine the invoked name from argument zero")]
    NoInvokedName,

    #[error("could not find {name} in $PATH")]
    NotFound { name: String },

    #[error("could not open session log {} (did you run 'vcslog setup'?)", path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write to session log {} failed: {source}", path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("waiting for {} failed: {source}", target.display())]
    Wait {
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<PathError> for ShimError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::MissingVar(var) => ShimError::MissingEnv(var),
        }
    }
}

/// Raised when a quoted argument would not fit in the caller's bound
#[derive(Debug, Error, PartialEq, Eq)]
#[error("quoting failed (not enough space in output for {prefix}...)")]
pub struct QuoteError {
    /// Leading bytes of the offending argument, lossily decoded and escaped
    pub prefix: String,
    pub limit: usize,
}
