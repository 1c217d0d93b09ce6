//! Log setup and ndjson output. Diagnostics go to stderr so stdout carries
//! only rendered pages.

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logger for the dashboard binary: load failures and data quality warnings
/// on stderr, pages on stdout through [`StructuredLogger::emit_json`].
pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber from the `log` config section.
    /// `RUST_LOG` takes precedence over `default_level`.
    pub fn init(json: bool, default_level: &str) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        let registry = tracing_subscriber::registry().with(filter);
        if json {
            registry
                .with(layer.json().with_span_events(FmtSpan::NONE))
                .init();
        } else {
            registry.with(layer).init();
        }
    }

    /// Write one page (or any serializable value) as a single JSON line.
    pub fn emit_json(value: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(value)?;
        writeln!(w, "{}", line)
    }
}
