//! Core argument schema types and typed values for chat command parsing.
//!
//! This crate defines the data model shared by the parser and the command
//! registry:
//!
//! - [`ArgumentSchema`]: ordered, name-keyed list of [`ArgumentSpec`]s built
//!   with [`SchemaBuilder`]; declaration order is consumption order.
//! - [`ArgumentKind`]: positional option, greedy content, or flag.
//! - [`TypeGuard`]: validation ([`TypeGuard::validate`]) and pattern search
//!   ([`TypeGuard::extract`]) for ints, mentions, durations, URLs and more.
//! - [`ParsedArguments`] / [`ParsedValue`]: the per-invocation result, with
//!   zero-value accessors and entity resolution through an injected
//!   [`EntityResolver`].
//!
//! Validation ([`validate_entries`]) catches registration-time mistakes such
//! as duplicate names or a content capture that is not last.
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//!
//! let schema = ArgumentSchema::builder()
//!     .define("user", ArgumentKind::Option, TypeGuard::User, "Member to mute", true, "")
//!     .define("duration", ArgumentKind::Option, TypeGuard::Duration, "How long", true, "1h")
//!     .define("reason", ArgumentKind::Content, TypeGuard::String, "Why", false, "")
//!     .add_flag("silent", TypeGuard::Bool, ArgumentKind::Flag, "Do not DM", false, "false")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.len(), 4);
//! assert!(schema.content().is_some());
//! assert_eq!(schema.flags().count(), 1);
//! ```

mod duration;
mod guard;
mod ids;
mod report;
mod resolve;
mod types;
mod validate;
mod value;

pub use duration::{DurationExpr, parse_duration};
pub use guard::{GuardMatch, parse_bool};
pub use ids::{MIN_ID_DIGITS, clean_id};
pub use report::{ReportSink, TracingSink};
pub use resolve::{Channel, EntityResolver, Member, ResolveError, Role, Unresolved, User};
pub use types::*;
pub use validate::{SchemaError, validate_entries};
pub use value::{ParsedArguments, ParsedValue, Value, ValueSource, untyped_spec};
