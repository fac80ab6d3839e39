//! Parsed argument values and their typed accessors.
//!
//! Values are stored as a [`Value`] tagged union and converted on demand.
//! Every primitive accessor degrades to a zero value (`""`, `0`, `0.0`,
//! `false`) instead of failing, because most arguments are optional.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::duration::parse_duration;
use crate::guard::parse_bool;
use crate::{ArgumentKind, ArgumentSpec, TypeGuard};

/// Raw value of a parsed argument.
///
/// Text invocations always produce [`Value::Str`]; structured sources such as
/// slash-command payloads may carry numbers and booleans directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text, as typed or as declared in a default.
    Str(String),
    /// Whole number from a structured payload.
    Int(i64),
    /// Non-integer number from a structured payload.
    Float(f64),
    /// Boolean from a structured payload.
    Bool(bool),
}

impl Default for Value {
    fn default() -> Self {
        Value::Str(String::new())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Where a parsed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Found in the input.
    Explicit,
    /// Nothing matched; the declared default was used.
    Default,
}

/// A single parsed argument: its spec plus the raw value.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use command_args_core::*;
///
/// let spec = Arc::new(ArgumentSpec::new("n", ArgumentKind::Option, TypeGuard::Int));
/// let value = ParsedValue::explicit(spec, "42");
/// assert_eq!(value.as_int(), 42);
/// assert_eq!(value.as_float(), 42.0);
/// assert!(!value.as_bool());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedValue {
    spec: Arc<ArgumentSpec>,
    raw: Value,
    source: ValueSource,
}

impl ParsedValue {
    /// Wraps a value found in the input.
    pub fn explicit(spec: Arc<ArgumentSpec>, raw: impl Into<Value>) -> Self {
        Self {
            spec,
            raw: raw.into(),
            source: ValueSource::Explicit,
        }
    }

    /// Wraps the spec's declared default.
    pub fn fallback(spec: Arc<ArgumentSpec>) -> Self {
        let raw = Value::Str(spec.default_value.clone());
        Self {
            spec,
            raw,
            source: ValueSource::Default,
        }
    }

    /// Wraps an explicit fallback literal (e.g. `"false"` for an absent
    /// switch).
    pub fn fallback_with(spec: Arc<ArgumentSpec>, raw: impl Into<Value>) -> Self {
        Self {
            spec,
            raw: raw.into(),
            source: ValueSource::Default,
        }
    }

    /// The argument's specification.
    pub fn spec(&self) -> &ArgumentSpec {
        &self.spec
    }

    /// The stored value.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Where the value came from.
    pub fn source(&self) -> ValueSource {
        self.source
    }

    /// Returns `true` if the declared default was used.
    pub fn is_default(&self) -> bool {
        self.source == ValueSource::Default
    }

    /// String form of the value. Floats render with two decimals.
    pub fn as_string(&self) -> String {
        match &self.raw {
            Value::Str(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => format!("{n:.2}"),
            Value::Bool(b) => b.to_string(),
        }
    }

    /// Value as `i32`, or `0`.
    pub fn as_int(&self) -> i32 {
        i32::try_from(self.as_int64()).unwrap_or(0)
    }

    /// Value as `i64`, or `0`.
    pub fn as_int64(&self) -> i64 {
        match &self.raw {
            Value::Int(n) => *n,
            Value::Float(n) if n.is_finite() => *n as i64,
            Value::Str(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Value as `f64`, or `0.0`.
    pub fn as_float(&self) -> f64 {
        match &self.raw {
            Value::Float(n) => *n,
            Value::Int(n) => *n as f64,
            Value::Str(s) => s.trim().parse().unwrap_or(0.0),
            Value::Bool(_) => 0.0,
        }
    }

    /// Value as `bool`, or `false`.
    pub fn as_bool(&self) -> bool {
        match &self.raw {
            Value::Bool(b) => *b,
            Value::Str(s) => parse_bool(s).unwrap_or(false),
            Value::Int(n) => *n == 1,
            Value::Float(_) => false,
        }
    }

    /// Value as a duration expression (`1d12h`), or `None`.
    pub fn as_duration(&self) -> Option<Duration> {
        match &self.raw {
            Value::Str(s) => parse_duration(s).map(|expr| expr.duration),
            Value::Int(n) => u64::try_from(*n).ok().map(Duration::from_secs),
            _ => None,
        }
    }
}

impl Serialize for ParsedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParsedValue", 3)?;
        state.serialize_field("type", &self.spec.type_guard)?;
        state.serialize_field("value", &self.raw)?;
        state.serialize_field("source", &self.source)?;
        state.end()
    }
}

/// Name-keyed bag of parsed values for one invocation.
///
/// Built once per invocation and read by the command handler. Absent
/// arguments read as zero values through the convenience getters; use
/// [`contains`](ParsedArguments::contains) to tell "absent" from "zero".
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use command_args_core::*;
///
/// let spec = Arc::new(ArgumentSpec::new("n", ArgumentKind::Option, TypeGuard::Int));
/// let mut args = ParsedArguments::new();
/// args.insert(ParsedValue::explicit(spec, "0"));
///
/// assert!(args.contains("n"));
/// assert!(!args.contains("missing"));
/// assert_eq!(args.int("n"), args.int("missing"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedArguments {
    values: BTreeMap<String, ParsedValue>,
}

impl ParsedArguments {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under its spec's name, replacing any previous one.
    pub fn insert(&mut self, value: ParsedValue) {
        self.values.insert(value.spec.name.clone(), value);
    }

    /// Looks up a value.
    pub fn get(&self, name: &str) -> Option<&ParsedValue> {
        self.values.get(name)
    }

    /// Returns `true` if a value was bound for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates values ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// String value, or `""` when absent.
    pub fn string(&self, name: &str) -> String {
        self.get(name).map(ParsedValue::as_string).unwrap_or_default()
    }

    /// `i32` value, or `0` when absent.
    pub fn int(&self, name: &str) -> i32 {
        self.get(name).map_or(0, ParsedValue::as_int)
    }

    /// `i64` value, or `0` when absent.
    pub fn int64(&self, name: &str) -> i64 {
        self.get(name).map_or(0, ParsedValue::as_int64)
    }

    /// `f64` value, or `0.0` when absent.
    pub fn float(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, ParsedValue::as_float)
    }

    /// `bool` value, or `false` when absent.
    pub fn bool(&self, name: &str) -> bool {
        self.get(name).is_some_and(ParsedValue::as_bool)
    }

    /// Plain `name -> string` view, handy for logging and comparisons.
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.as_string()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParsedArguments {
    type Item = (&'a String, &'a ParsedValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParsedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Synthesizes an optional string spec for values whose name is not in the
/// schema (structured payloads can carry extra options).
pub fn untyped_spec(name: &str) -> Arc<ArgumentSpec> {
    Arc::new(ArgumentSpec::new(name, ArgumentKind::Option, TypeGuard::String))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, guard: TypeGuard) -> Arc<ArgumentSpec> {
        Arc::new(ArgumentSpec::new(name, ArgumentKind::Option, guard).with_default("7"))
    }

    #[test]
    fn test_string_conversions() {
        let s = spec("x", TypeGuard::String);
        assert_eq!(ParsedValue::explicit(s.clone(), 1.5).as_string(), "1.50");
        assert_eq!(ParsedValue::explicit(s.clone(), true).as_string(), "true");
        assert_eq!(ParsedValue::explicit(s, 12i64).as_string(), "12");
    }

    #[test]
    fn test_numeric_conversions_degrade_to_zero() {
        let s = spec("x", TypeGuard::Int);
        assert_eq!(ParsedValue::explicit(s.clone(), "abc").as_int(), 0);
        assert_eq!(ParsedValue::explicit(s.clone(), "3000000000").as_int(), 0);
        assert_eq!(ParsedValue::explicit(s.clone(), "3000000000").as_int64(), 3_000_000_000);
        assert_eq!(ParsedValue::explicit(s.clone(), 9.9).as_int64(), 9);
        assert_eq!(ParsedValue::explicit(s.clone(), "2.5").as_float(), 2.5);
        assert_eq!(ParsedValue::explicit(s, true).as_int(), 0);
    }

    #[test]
    fn test_bool_conversions() {
        let s = spec("x", TypeGuard::Bool);
        assert!(ParsedValue::explicit(s.clone(), "TRUE").as_bool());
        assert!(!ParsedValue::explicit(s.clone(), "nope").as_bool());
        assert!(ParsedValue::explicit(s, 1i64).as_bool());
    }

    #[test]
    fn test_fallback_uses_declared_default() {
        let value = ParsedValue::fallback(spec("x", TypeGuard::Int));
        assert!(value.is_default());
        assert_eq!(value.as_int(), 7);
    }

    #[test]
    fn test_duration_accessor() {
        let s = spec("x", TypeGuard::Duration);
        let value = ParsedValue::explicit(s.clone(), "1h30m");
        assert_eq!(value.as_duration(), Some(Duration::from_secs(5400)));
        assert_eq!(ParsedValue::explicit(s, "soon").as_duration(), None);
    }

    #[test]
    fn test_absent_values_read_as_zero() {
        let args = ParsedArguments::new();
        assert_eq!(args.string("a"), "");
        assert_eq!(args.int("a"), 0);
        assert_eq!(args.float("a"), 0.0);
        assert!(!args.bool("a"));
        assert!(args.is_empty());
    }

    #[test]
    fn test_serializes_as_name_keyed_map() {
        let mut args = ParsedArguments::new();
        args.insert(ParsedValue::explicit(spec("n", TypeGuard::Int), "5"));
        args.insert(ParsedValue::fallback(spec("m", TypeGuard::Int)));

        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "m": {"type": "int", "value": "7", "source": "default"},
                "n": {"type": "int", "value": "5", "source": "explicit"},
            })
        );
    }
}
