use thiserror::Error;

/// Schema problems that only surface while parsing an invocation.
///
/// These are handed to the [`ReportSink`](command_args_core::ReportSink)
/// rather than returned: the parse itself still produces a best-effort
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseConfigError {
    /// A required argument was declared after an optional one.
    #[error("required argument '{0}' is declared after an optional argument")]
    RequiredAfterOptional(String),
}
