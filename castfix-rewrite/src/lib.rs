//! Rewrite rules: turn GDScript source text into safer source text.
//!
//! This crate owns *what* gets rewritten and how the replacement reads. It never touches the
//! filesystem; discovery and write-back live in `castfix-core`.
//!
//! Two passes run in order over a file's text:
//! - conversions: `str(d.get("k"))` and friends become `DictUtils.get_string(d, "k", "")`;
//! - casts: `... as <KnownType>` on a declaration, return, or assignment line becomes a holder
//!   declaration plus an `is`-checked conditional.
//!
//! Matching is purely textual. Anything that does not fit a pattern exactly is left alone.

mod cast;
mod config;
mod conversion;
mod engine;
mod error;
mod rule;

pub use cast::{cast_rules, CastRule, CastShape, ASSIGNMENT_TEMP, RETURN_TEMP};
pub use config::{
    RewriteConfig, DEFAULT_HOLDER_TYPE, DEFAULT_KNOWN_TYPES, DEFAULT_NAMESPACE,
    DEFAULT_NULL_LITERAL,
};
pub use conversion::{conversion_rules, ConversionKind, ConversionRule};
pub use engine::{RewriteOutcome, Rewriter};
pub use error::{RewriteError, RewriteResult};
pub use rule::{Rewritten, Rule};
