//! Embeddable core library for castfix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking into editors, build
//! scripts, or other host processes.
//!
//! # Port traits
//!
//! All I/O is abstracted behind [`SourceStore`](ports::SourceStore). The [`adapters`] module
//! provides a filesystem-backed implementation and an in-memory one.
//!
//! # Entry point
//!
//! - [`run`](pipeline::run): discover scripts, rewrite them, write back, report

pub mod adapters;
pub mod discover;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod report;
pub mod settings;

pub use error::{CoreError, CoreResult};

// Re-export the rewrite config so embedders don't need castfix-rewrite directly.
pub use castfix_rewrite::{RewriteConfig, DEFAULT_KNOWN_TYPES};
