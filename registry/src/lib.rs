//! Command registry and message dispatch.
//!
//! Ties the argument parser to a bot's command set:
//!
//! - [`BotConfig`] / [`CommandDefinition`]: commands declared in YAML or
//!   JSON, loaded with [`BotConfig::load`].
//! - [`CommandRegistry`]: name and alias lookup, built once at startup.
//! - [`extract_command`] and [`CommandRegistry::dispatch`]: split a chat
//!   message into trigger and arguments, then parse the arguments against the
//!   command's schema into a [`Context`].
//!
//! # Example
//!
//! ```
//! use command_args_registry::{BotConfig, CommandRegistry};
//!
//! let config: BotConfig = serde_yaml::from_str(r#"
//! prefix: "?"
//! commands:
//!   - name: remind
//!     aliases: [rm]
//!     arguments:
//!       - { name: when, type: duration, required: true, default: 10m }
//!       - { name: what, kind: content }
//! "#).unwrap();
//! let registry = CommandRegistry::from_config(&config).unwrap();
//!
//! let ctx = registry
//!     .dispatch("?rm feed the cat in 2h", &config.prefix, None)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(ctx.command.name, "remind");
//! assert_eq!(ctx.args.string("when"), "2h");
//! assert_eq!(ctx.args.string("what"), "feed the cat in");
//! ```

mod config;
mod dispatch;
mod error;
mod registry;

pub use config::{ArgumentDefinition, BotConfig, CommandDefinition};
pub use dispatch::{Context, Invocation, extract_command};
pub use error::{RegistryError, Result};
pub use registry::{CommandInfo, CommandRegistry, Handler};
