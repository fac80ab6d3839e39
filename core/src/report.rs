//! Error reporting collaborator.

use std::error::Error;

/// Receives configuration problems that cannot be returned to a caller,
/// such as a misconfigured schema discovered halfway through a parse.
pub trait ReportSink: Send + Sync {
    /// Reports an error under a short title.
    fn report(&self, title: &str, error: &dyn Error);
}

/// [`ReportSink`] that logs through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, title: &str, error: &dyn Error) {
        tracing::error!(error = %error, "[REPORT] {title}");
    }
}
