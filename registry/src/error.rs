//! Error types for command registration and config loading.

use command_args_core::SchemaError;
use thiserror::Error;

/// Errors raised while loading definitions or registering commands.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A command declared an invalid argument schema.
    #[error("invalid arguments for command '{command}': {source}")]
    InvalidSchema {
        command: String,
        #[source]
        source: SchemaError,
    },

    /// Two commands share a name.
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    /// A command was registered without a name.
    #[error("command name cannot be empty")]
    EmptyTrigger,

    /// The trigger matches no command or alias.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
