//! Error types for castfix-rewrite.
//!
//! Rules never fail while rewriting text; a construct that does not match is left as-is.
//! The only failures happen up front, when a [`RewriteConfig`](crate::RewriteConfig) is
//! turned into compiled rules.

use thiserror::Error;

/// Errors raised while building rules from a configuration.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A configured name is not a valid GDScript identifier.
    #[error("invalid {field}: {value:?} is not an identifier")]
    InvalidIdentifier {
        /// Which config field held the bad value.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// The null literal was empty.
    #[error("null literal must not be empty")]
    EmptyNullLiteral,

    /// The holder type is itself a cast target, so a rewritten holder line could match again.
    #[error("holder type {holder:?} must not be one of the known types")]
    HolderIsKnownType { holder: String },

    /// A generated pattern failed to compile.
    #[error("failed to compile pattern for rule {rule}: {source}")]
    Pattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
}

impl RewriteError {
    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type alias using RewriteError.
pub type RewriteResult<T> = Result<T, RewriteError>;
