//! Flag extraction.
//!
//! Flags are resolved before anything else: each flag pattern is searched in
//! the untouched input, the value (if any) is validated, and every occurrence
//! is cut out of a working copy so flag syntax never leaks into positional or
//! content parsing.

use std::sync::Arc;

use command_args_core::{ArgumentSchema, ArgumentSpec, FlagPattern, ParsedValue};
use tracing::debug;

/// Output of [`extract_flags`].
#[derive(Debug, Clone)]
pub struct FlagExtraction {
    /// Input with every flag occurrence removed.
    pub stripped: String,
    /// One resolved value per flag in the schema.
    pub values: Vec<ParsedValue>,
    /// Non-flag arguments, in declaration order.
    pub remaining: Vec<Arc<ArgumentSpec>>,
}

/// Resolves every flag of `schema` against `input`.
///
/// - value flag found with a valid value → that value
/// - value flag found with an invalid value, or not found → declared default
/// - switch found → `"true"`, switch absent → `"false"`
///
/// # Examples
///
/// ```
/// use command_args_core::*;
/// use command_args_parser::extract_flags;
///
/// let schema = ArgumentSchema::builder()
///     .define("text", ArgumentKind::Content, TypeGuard::String, "", false, "")
///     .add_flag("limit", TypeGuard::Int, ArgumentKind::Option, "", false, "10")
///     .add_flag("dry-run", TypeGuard::Bool, ArgumentKind::Flag, "", false, "")
///     .build()
///     .unwrap();
///
/// let out = extract_flags("clean up --limit 5 now", &schema);
/// assert_eq!(out.stripped.split_whitespace().collect::<Vec<_>>(), vec!["clean", "up", "now"]);
/// assert_eq!(out.values[0].as_string(), "5");
/// assert_eq!(out.values[1].as_string(), "false");
/// assert_eq!(out.remaining.len(), 1);
/// ```
pub fn extract_flags(input: &str, schema: &ArgumentSchema) -> FlagExtraction {
    let mut stripped = input.to_string();
    let mut values = Vec::new();
    let mut remaining = Vec::new();

    for spec in schema.iter() {
        let Some(pattern) = &spec.flag else {
            remaining.push(Arc::clone(spec));
            continue;
        };

        let value = resolve_flag(spec, pattern, input);
        debug!(
            flag = %spec.name,
            value = %value.as_string(),
            default = value.is_default(),
            "Resolved flag"
        );
        values.push(value);
        stripped = remove_occurrences(pattern, &stripped);
    }

    FlagExtraction {
        stripped,
        values,
        remaining,
    }
}

fn resolve_flag(spec: &Arc<ArgumentSpec>, pattern: &FlagPattern, input: &str) -> ParsedValue {
    let spec = Arc::clone(spec);
    match (pattern.find(input), pattern.takes_value()) {
        (Some(found), true) => match found.value {
            Some(value) if spec.accepts(&value) => ParsedValue::explicit(spec, value),
            _ => ParsedValue::fallback(spec),
        },
        (Some(_), false) => ParsedValue::explicit(spec, "true"),
        (None, true) => ParsedValue::fallback(spec),
        (None, false) => ParsedValue::fallback_with(spec, "false"),
    }
}

// Occurrences are replaced by a single space so the words around them
// never fuse together.
fn remove_occurrences(pattern: &FlagPattern, text: &str) -> String {
    let found = pattern.find_all(text);
    if found.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in found {
        out.push_str(&text[last..m.start]);
        out.push(' ');
        last = m.end;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use command_args_core::{ArgumentKind, TypeGuard, ValueSource};

    use super::*;

    fn schema() -> ArgumentSchema {
        ArgumentSchema::builder()
            .define("target", ArgumentKind::Option, TypeGuard::String, "", true, "")
            .add_flag("count", TypeGuard::Int, ArgumentKind::Option, "", false, "1")
            .add_flag("title", TypeGuard::String, ArgumentKind::Option, "", false, "untitled")
            .add_flag("force", TypeGuard::Bool, ArgumentKind::Flag, "", false, "")
            .build()
            .unwrap()
    }

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_flags_anywhere_in_any_order() {
        let out = extract_flags(r#"--force x --title "a b" --count 3"#, &schema());

        assert_eq!(words(&out.stripped), vec!["x"]);
        let values: Vec<String> = out.values.iter().map(|v| v.as_string()).collect();
        assert_eq!(values, vec!["3", "a b", "true"]);
        assert!(out.values.iter().all(|v| v.source() == ValueSource::Explicit));
    }

    #[test]
    fn test_missing_flags_use_defaults() {
        let out = extract_flags("x", &schema());

        let values: Vec<String> = out.values.iter().map(|v| v.as_string()).collect();
        assert_eq!(values, vec!["1", "untitled", "false"]);
        assert!(out.values.iter().all(|v| v.is_default()));
        assert_eq!(out.stripped, "x");
    }

    #[test]
    fn test_invalid_value_falls_back_but_is_still_removed() {
        let out = extract_flags("x --count many", &schema());

        assert_eq!(out.values[0].as_string(), "1");
        assert!(out.values[0].is_default());
        assert_eq!(words(&out.stripped), vec!["x"]);
    }

    #[test]
    fn test_every_occurrence_is_removed() {
        let out = extract_flags("--force a --force b", &schema());
        assert_eq!(words(&out.stripped), vec!["a", "b"]);
    }

    #[test]
    fn test_removal_does_not_fuse_words() {
        let out = extract_flags("a --force b", &schema());
        assert_eq!(words(&out.stripped), vec!["a", "b"]);
    }

    #[test]
    fn test_choices_apply_to_flag_values() {
        let schema = ArgumentSchema::builder()
            .add_flag("mode", TypeGuard::String, ArgumentKind::Option, "", false, "fast")
            .add_choices("mode", ["fast", "slow"])
            .build()
            .unwrap();

        assert_eq!(extract_flags("--mode slow", &schema).values[0].as_string(), "slow");
        assert_eq!(extract_flags("--mode warp", &schema).values[0].as_string(), "fast");
    }

    #[test]
    fn test_remaining_keeps_declaration_order() {
        let out = extract_flags("", &schema());
        let names: Vec<&str> = out.remaining.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["target"]);
    }
}
