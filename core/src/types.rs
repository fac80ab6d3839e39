//! Argument schema type definitions.
//!
//! This module defines the data model used to describe the arguments a chat
//! command accepts. A [`ArgumentSchema`] is built once when a command is
//! registered and is then shared read-only by every parse of that command.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validate::{SchemaError, validate_entries};

/// How an argument is pulled out of an invocation string.
///
/// # Examples
///
/// ```
/// use command_args_core::ArgumentKind;
///
/// assert_eq!(ArgumentKind::default(), ArgumentKind::Option);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    /// Positional argument matched in schema order (the default).
    #[default]
    Option,
    /// Greedy trailing capture of every unconsumed token.
    Content,
    /// Boolean switch (`--name`) that may appear anywhere.
    Flag,
}

/// Named validation/extraction rule for a class of values.
///
/// Every guard can [`validate`](TypeGuard::validate) a single token and
/// [`extract`](TypeGuard::extract) the first matching span from a longer
/// piece of text.
///
/// # Examples
///
/// ```
/// use command_args_core::{MatchStrategy, TypeGuard};
///
/// assert_eq!(TypeGuard::String.strategy(), MatchStrategy::Positional);
/// assert_eq!(TypeGuard::Duration.strategy(), MatchStrategy::Search);
/// assert!(TypeGuard::Int.validate("42"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeGuard {
    /// Signed integer.
    Int,
    /// Any single token (the default).
    #[default]
    String,
    /// `true` / `false` style literal.
    #[serde(alias = "boolean")]
    Bool,
    /// Channel mention (`<#id>`) or raw channel id.
    Channel,
    /// User mention (`<@id>`, `<@!id>`) or raw user id.
    User,
    /// Role mention (`<@&id>`) or raw role id.
    Role,
    /// Raw platform identifier (17-20 digit snowflake).
    Id,
    /// Comma-separated list (`a,b,c`).
    ArrString,
    /// Link to a single message.
    MessageUrl,
    /// Duration expression such as `1d12h`.
    Duration,
    /// Sub-command selector.
    SubCommand,
    /// Sub-command group selector.
    SubCommandGroup,
}

/// How the positional matcher consumes text for a [`TypeGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Take the token at the cursor.
    Positional,
    /// Search the remaining text for the guard's pattern.
    Search,
}

/// Compiled `--name` pattern for a flag argument.
///
/// Switch patterns match the bare marker; value patterns additionally
/// capture either a double-quoted phrase or an unquoted token. A match only
/// counts when the marker stands alone, so `--debug` never matches inside
/// `--debugger`.
#[derive(Debug, Clone)]
pub struct FlagPattern {
    regex: Regex,
    takes_value: bool,
}

/// A single occurrence of a flag inside an invocation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagMatch {
    /// Byte offset of the `--` marker.
    pub start: usize,
    /// Byte offset just past the flag (and its value, if any).
    pub end: usize,
    /// Value with surrounding quotes removed; `None` for switches.
    pub value: Option<String>,
}

impl FlagPattern {
    /// Compiles the pattern for the flag `name`.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`regex::Error`] if the pattern cannot compile.
    pub fn compile(name: &str, takes_value: bool) -> Result<Self, regex::Error> {
        let marker = format!("--{}", regex::escape(name));
        let pattern = if takes_value {
            format!(
                r#"{marker}\s+(?:"(?P<quoted>[^"]*)"|(?P<bare>[^\s"-][^\s"]*|-[^\s"-][^\s"]*))"#
            )
        } else {
            marker
        };
        Ok(Self {
            regex: Regex::new(&pattern)?,
            takes_value,
        })
    }

    /// Whether the flag carries a value (`--name value`).
    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns every standalone occurrence of the flag, left to right.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::FlagPattern;
    ///
    /// let pattern = FlagPattern::compile("reason", true).unwrap();
    /// let found = pattern.find_all(r#"kick --reason "being rude" now"#);
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].value.as_deref(), Some("being rude"));
    /// ```
    pub fn find_all(&self, text: &str) -> Vec<FlagMatch> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if !stands_alone(text, whole.start(), whole.end()) {
                    return None;
                }
                let value = caps
                    .name("quoted")
                    .or_else(|| caps.name("bare"))
                    .map(|m| m.as_str().to_string());
                Some(FlagMatch {
                    start: whole.start(),
                    end: whole.end(),
                    value,
                })
            })
            .collect()
    }

    /// Returns the first standalone occurrence of the flag.
    pub fn find(&self, text: &str) -> Option<FlagMatch> {
        self.find_all(text).into_iter().next()
    }
}

impl PartialEq for FlagPattern {
    fn eq(&self, other: &Self) -> bool {
        self.takes_value == other.takes_value && self.as_str() == other.as_str()
    }
}

fn stands_alone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
}

/// Specification for a single command argument.
///
/// Use [`ArgumentSpec::new`] and the `with_*` builder methods, or let
/// [`SchemaBuilder::define`] / [`SchemaBuilder::add_flag`] assemble it.
///
/// # Examples
///
/// ```
/// use command_args_core::{ArgumentKind, ArgumentSpec, TypeGuard};
///
/// let spec = ArgumentSpec::new("count", ArgumentKind::Option, TypeGuard::Int)
///     .with_description("How many messages to remove")
///     .with_default("10")
///     .required();
/// assert!(spec.required);
/// assert_eq!(spec.default_value, "10");
/// assert!(!spec.is_flag());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Unique key within the schema
    pub name: String,
    /// Extraction strategy
    pub kind: ArgumentKind,
    /// Validation/extraction rule
    pub type_guard: TypeGuard,
    /// Human readable description
    pub description: String,
    /// Whether a value (explicit or default) is always produced
    pub required: bool,
    /// Value used when nothing matches
    pub default_value: String,
    /// Allowed literal values, in declaration order
    pub choices: Vec<String>,
    /// Compiled flag pattern; present only for flag arguments
    pub flag: Option<FlagPattern>,
}

impl ArgumentSpec {
    /// Creates an optional argument with no description or default.
    pub fn new(name: &str, kind: ArgumentKind, type_guard: TypeGuard) -> Self {
        Self {
            name: name.to_string(),
            kind,
            type_guard,
            description: String::new(),
            required: false,
            default_value: String::new(),
            choices: Vec::new(),
            flag: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default_value = default.to_string();
        self
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Appends allowed values, skipping ones already present.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_choices(choices);
        self
    }

    fn push_choices<I, S>(&mut self, choices: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for choice in choices {
            let choice = choice.into();
            if !self.choices.contains(&choice) {
                self.choices.push(choice);
            }
        }
    }

    /// Returns `true` if the argument is extracted by the flag extractor.
    pub fn is_flag(&self) -> bool {
        self.flag.is_some()
    }

    /// Returns `true` if the argument is the greedy content capture.
    pub fn is_content(&self) -> bool {
        self.kind == ArgumentKind::Content && self.flag.is_none()
    }

    /// Checks a candidate value against the type guard and, when declared,
    /// the choice list.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::{ArgumentKind, ArgumentSpec, TypeGuard};
    ///
    /// let spec = ArgumentSpec::new("mode", ArgumentKind::Option, TypeGuard::String)
    ///     .with_choices(["fast", "slow"]);
    /// assert!(spec.accepts("fast"));
    /// assert!(!spec.accepts("medium"));
    /// ```
    pub fn accepts(&self, value: &str) -> bool {
        self.type_guard.validate(value)
            && (self.choices.is_empty() || self.choices.iter().any(|c| c == value))
    }

    /// Renders the argument for a usage line (`<name>`, `[name]`,
    /// `[name...]`, `[--name <value>]`).
    pub fn usage(&self) -> String {
        match (&self.flag, self.kind) {
            (Some(flag), _) if flag.takes_value() => format!("[--{} <value>]", self.name),
            (Some(_), _) => format!("[--{}]", self.name),
            (None, ArgumentKind::Content) if self.required => format!("<{}...>", self.name),
            (None, ArgumentKind::Content) => format!("[{}...]", self.name),
            (None, _) if self.required => format!("<{}>", self.name),
            (None, _) => format!("[{}]", self.name),
        }
    }
}

/// Ordered collection of argument specifications for one command.
///
/// Insertion order is the consumption order used by the positional matcher.
/// Lookups by name are O(1). Entries are reference counted so parsed values
/// can point back at their spec without copying it.
///
/// # Examples
///
/// ```
/// use command_args_core::{ArgumentKind, ArgumentSchema, TypeGuard};
///
/// let schema = ArgumentSchema::builder()
///     .define("user", ArgumentKind::Option, TypeGuard::User, "Who to warn", true, "")
///     .define("reason", ArgumentKind::Content, TypeGuard::String, "Why", false, "")
///     .add_flag("silent", TypeGuard::Bool, ArgumentKind::Flag, "Skip the DM", false, "false")
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["user", "reason", "silent"]);
/// assert!(schema.get("silent").unwrap().is_flag());
/// assert_eq!(schema.usage(), "<user> [reason...] [--silent]");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSchema {
    entries: Vec<Arc<ArgumentSpec>>,
    index: HashMap<String, usize>,
}

impl ArgumentSchema {
    /// Starts building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Looks up an argument by name.
    pub fn get(&self, name: &str) -> Option<&Arc<ArgumentSpec>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Argument names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|spec| spec.name.as_str())
    }

    /// Specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ArgumentSpec>> {
        self.entries.iter()
    }

    /// Flag specs in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = &Arc<ArgumentSpec>> {
        self.entries.iter().filter(|spec| spec.is_flag())
    }

    /// The content capture, if the schema declares one.
    pub fn content(&self) -> Option<&Arc<ArgumentSpec>> {
        self.entries.iter().find(|spec| spec.is_content())
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schema declares no arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Usage line built from every argument, in declaration order.
    pub fn usage(&self) -> String {
        self.entries
            .iter()
            .map(|spec| spec.usage())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builder for [`ArgumentSchema`].
///
/// Chaining methods never fail; problems are collected and reported by
/// [`build`](SchemaBuilder::build), which is called at command registration.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entries: Vec<ArgumentSpec>,
    errors: Vec<SchemaError>,
}

impl SchemaBuilder {
    /// Declares an argument. A `Flag` kind gets a switch pattern compiled,
    /// exactly as [`add_flag`](SchemaBuilder::add_flag) would.
    pub fn define(
        self,
        name: &str,
        kind: ArgumentKind,
        type_guard: TypeGuard,
        description: &str,
        required: bool,
        default: &str,
    ) -> Self {
        let mut spec = ArgumentSpec::new(name, kind, type_guard)
            .with_description(description)
            .with_default(default);
        spec.required = required;
        self.argument(spec)
    }

    /// Declares a flag argument that may appear anywhere in the input.
    ///
    /// `kind` selects the flavour: [`ArgumentKind::Option`] for a value flag
    /// (`--name value`), [`ArgumentKind::Flag`] for a switch (`--name`).
    pub fn add_flag(
        mut self,
        name: &str,
        type_guard: TypeGuard,
        kind: ArgumentKind,
        description: &str,
        required: bool,
        default: &str,
    ) -> Self {
        let mut spec = ArgumentSpec::new(name, kind, type_guard)
            .with_description(description)
            .with_default(default);
        spec.required = required;
        match compile_flag(name, kind) {
            Ok(pattern) => spec.flag = Some(pattern),
            Err(err) => {
                self.errors.push(err);
                return self;
            }
        }
        self.entries.push(spec);
        self
    }

    /// Adds allowed values to an already declared argument.
    pub fn add_choices<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.entries.iter_mut().find(|spec| spec.name == name) {
            Some(spec) => spec.push_choices(values),
            None => self
                .errors
                .push(SchemaError::UnknownArgument(name.to_string())),
        }
        self
    }

    /// Appends a prebuilt spec.
    pub fn argument(mut self, mut spec: ArgumentSpec) -> Self {
        if spec.kind == ArgumentKind::Flag && spec.flag.is_none() {
            match compile_flag(&spec.name, ArgumentKind::Flag) {
                Ok(pattern) => spec.flag = Some(pattern),
                Err(err) => {
                    self.errors.push(err);
                    return self;
                }
            }
        }
        self.entries.push(spec);
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] collected while chaining or found by
    /// [`validate_entries`].
    pub fn build(self) -> Result<ArgumentSchema, SchemaError> {
        let mut errors = self.errors;
        errors.extend(validate_entries(&self.entries));
        if let Some(err) = errors.into_iter().next() {
            tracing::error!(error = %err, "Rejected argument schema");
            return Err(err);
        }

        let index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.clone(), i))
            .collect();
        Ok(ArgumentSchema {
            entries: self.entries.into_iter().map(Arc::new).collect(),
            index,
        })
    }
}

fn compile_flag(name: &str, kind: ArgumentKind) -> Result<FlagPattern, SchemaError> {
    let valid_name = name
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'));
    if !valid_name {
        return Err(SchemaError::InvalidFlagName(name.to_string()));
    }
    if kind == ArgumentKind::Content {
        return Err(SchemaError::ContentFlag(name.to_string()));
    }
    FlagPattern::compile(name, kind == ArgumentKind::Option).map_err(|err| {
        SchemaError::FlagPattern {
            name: name.to_string(),
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_preserves_declaration_order() {
        let schema = ArgumentSchema::builder()
            .define("b", ArgumentKind::Option, TypeGuard::String, "", true, "")
            .define("a", ArgumentKind::Option, TypeGuard::Int, "", false, "")
            .build()
            .unwrap();

        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(schema.get("a").unwrap().type_guard, TypeGuard::Int);
        assert!(schema.get("c").is_none());
    }

    #[test]
    fn test_define_flag_kind_compiles_switch() {
        let schema = ArgumentSchema::builder()
            .define("debug", ArgumentKind::Flag, TypeGuard::Bool, "", false, "false")
            .build()
            .unwrap();

        let spec = schema.get("debug").unwrap();
        assert!(spec.is_flag());
        assert!(!spec.flag.as_ref().unwrap().takes_value());
    }

    #[test]
    fn test_switch_pattern_requires_standalone_marker() {
        let pattern = FlagPattern::compile("debug", false).unwrap();

        assert_eq!(pattern.find_all("run --debug now").len(), 1);
        assert!(pattern.find("run --debugger").is_none());
        assert!(pattern.find("run x--debug").is_none());
    }

    #[test]
    fn test_value_pattern_captures_bare_and_quoted() {
        let pattern = FlagPattern::compile("limit", true).unwrap();

        let bare = pattern.find("--limit 5 rest").unwrap();
        assert_eq!(bare.value.as_deref(), Some("5"));
        assert_eq!(bare.start, 0);
        assert_eq!(bare.end, 9);

        let quoted = pattern.find(r#"a --limit "two words""#).unwrap();
        assert_eq!(quoted.value.as_deref(), Some("two words"));

        let negative = pattern.find("--limit -3").unwrap();
        assert_eq!(negative.value.as_deref(), Some("-3"));

        assert!(pattern.find("--limit --other").is_none());
    }

    #[test]
    fn test_add_choices_deduplicates_in_order() {
        let schema = ArgumentSchema::builder()
            .define("mode", ArgumentKind::Option, TypeGuard::String, "", true, "fast")
            .add_choices("mode", ["fast", "slow"])
            .add_choices("mode", ["slow", "off"])
            .build()
            .unwrap();

        assert_eq!(schema.get("mode").unwrap().choices, vec!["fast", "slow", "off"]);
    }

    #[test]
    fn test_add_choices_unknown_argument_fails_build() {
        let err = ArgumentSchema::builder()
            .add_choices("missing", ["a"])
            .build()
            .unwrap_err();

        assert_eq!(err, SchemaError::UnknownArgument("missing".to_string()));
    }

    #[test]
    fn test_invalid_flag_name_fails_build() {
        let err = ArgumentSchema::builder()
            .add_flag("bad name", TypeGuard::Bool, ArgumentKind::Flag, "", false, "")
            .build()
            .unwrap_err();

        assert_eq!(err, SchemaError::InvalidFlagName("bad name".to_string()));
    }

    #[test]
    fn test_content_flag_is_rejected() {
        let err = ArgumentSchema::builder()
            .add_flag("text", TypeGuard::String, ArgumentKind::Content, "", false, "")
            .build()
            .unwrap_err();

        assert_eq!(err, SchemaError::ContentFlag("text".to_string()));
    }

    #[test]
    fn test_usage_line() {
        let schema = ArgumentSchema::builder()
            .define("count", ArgumentKind::Option, TypeGuard::Int, "", true, "1")
            .define("channel", ArgumentKind::Option, TypeGuard::Channel, "", false, "")
            .add_flag("user", TypeGuard::User, ArgumentKind::Option, "", false, "")
            .build()
            .unwrap();

        assert_eq!(schema.usage(), "<count> [channel] [--user <value>]");
    }
}
