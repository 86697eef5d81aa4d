//! Error types for castfix-core.
//!
//! Every variant is fatal for the run: there is no per-file recovery, and a file is either
//! written in full or left alone.

use camino::Utf8PathBuf;
use castfix_rewrite::RewriteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The rewrite configuration could not be compiled into rules.
    #[error("invalid rewrite config: {0}")]
    Config(#[from] RewriteError),

    /// A scan root did not form a valid glob pattern.
    #[error("invalid scan root {root:?}: {source}")]
    InvalidRoot {
        root: String,
        #[source]
        source: glob::PatternError,
    },

    /// Reading, writing, or walking a path failed.
    #[error("i/o error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other runtime failure.
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

impl CoreError {
    /// Returns true if the failure happened before any file was read.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, CoreError::Config(_) | CoreError::InvalidRoot { .. })
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CoreError::Config(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
