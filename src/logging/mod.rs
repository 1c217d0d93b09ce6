//! Structured logging and JSON line output.

mod format;

pub use format::StructuredLogger;
