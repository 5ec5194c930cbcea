//! Structured logging.
//!
//! Each subsystem gets a small set of `Display`-implementing message
//! structs. A message is both a human-readable string (via `Display`) and a
//! set of `tracing` fields (via [`StructuredLog::log`]), so the same value
//! serves a terminal reader and a log aggregator without being written
//! twice.

pub mod dags;
pub mod mapping;
pub mod opsched;

use tracing::Span;

/// Implemented by every structured-log message type in this module.
pub trait StructuredLog: std::fmt::Display {
    fn log(&self);
    fn span(&self, name: &'static str) -> Span;
}
