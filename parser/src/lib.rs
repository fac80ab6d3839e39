//! Free-text argument parsing for chat commands.
//!
//! An invocation string (everything after the command trigger) is parsed
//! against an [`ArgumentSchema`] in four stages:
//!
//! 1. [`extract_flags`] resolves every `--flag` / `--flag value` anywhere in
//!    the input and removes them.
//! 2. [`tokenize`] splits the rest on whitespace, keeping `"quoted runs"`
//!    together.
//! 3. Required then optional arguments are matched in declaration order.
//!    Free-form guards take the next token; patterned guards (ints,
//!    mentions, durations, URLs) are searched for anywhere in what is left.
//! 4. A content argument, if reached, captures every remaining token.
//!
//! Parsing never fails. Values that do not match fall back to defaults or
//! stay unbound; schema mistakes found mid-parse go to a [`ReportSink`].
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//! use command_args_parser::parse_arguments;
//!
//! let schema = ArgumentSchema::builder()
//!     .define("user", ArgumentKind::Option, TypeGuard::User, "", true, "")
//!     .define("duration", ArgumentKind::Option, TypeGuard::Duration, "", true, "1h")
//!     .define("reason", ArgumentKind::Content, TypeGuard::String, "", false, "")
//!     .add_flag("silent", TypeGuard::Bool, ArgumentKind::Flag, "", false, "")
//!     .build()
//!     .unwrap();
//!
//! let args = parse_arguments("spamming links 2d <@123456789012345678> --silent", &schema);
//! assert_eq!(args.string("user"), "<@123456789012345678>");
//! assert_eq!(args.string("duration"), "2d");
//! assert_eq!(args.string("reason"), "spamming links");
//! assert!(args.bool("silent"));
//! ```

mod content;
mod error;
mod flags;
mod interaction;
mod positional;
mod tokenize;

use command_args_core::{ArgumentSchema, ParsedArguments, ReportSink, TracingSink};
use tracing::debug;

pub use content::capture_content;
pub use error::ParseConfigError;
pub use flags::{FlagExtraction, extract_flags};
pub use interaction::{InteractionOption, parse_interaction_options};
pub use positional::{TokenStream, match_positional};
pub use tokenize::tokenize;

/// Parses invocations against one schema.
pub struct ArgumentParser<'a> {
    schema: &'a ArgumentSchema,
    sink: &'a dyn ReportSink,
}

impl<'a> ArgumentParser<'a> {
    /// Creates a parser that reports through [`TracingSink`].
    pub fn new(schema: &'a ArgumentSchema) -> Self {
        Self {
            schema,
            sink: &TracingSink,
        }
    }

    /// Replaces the report sink.
    pub fn with_sink(mut self, sink: &'a dyn ReportSink) -> Self {
        self.sink = sink;
        self
    }

    /// Parses one invocation string.
    pub fn parse(&self, input: &str) -> ParsedArguments {
        let mut args = ParsedArguments::new();

        let extraction = extract_flags(input, self.schema);
        for value in extraction.values {
            args.insert(value);
        }
        if extraction.remaining.is_empty() {
            return args;
        }

        let mut stream = TokenStream::new(tokenize(&extraction.stripped));
        debug!(tokens = stream.len(), "Tokenized invocation");

        if let Some(content) =
            match_positional(&mut stream, &extraction.remaining, &mut args, self.sink)
        {
            capture_content(content, stream, &mut args);
        }

        args
    }
}

/// Parses `input` against `schema`, reporting through [`TracingSink`].
pub fn parse_arguments(input: &str, schema: &ArgumentSchema) -> ParsedArguments {
    ArgumentParser::new(schema).parse(input)
}

/// Parses `input` against `schema`, reporting through `sink`.
pub fn parse_arguments_with(
    input: &str,
    schema: &ArgumentSchema,
    sink: &dyn ReportSink,
) -> ParsedArguments {
    ArgumentParser::new(schema).with_sink(sink).parse(input)
}
