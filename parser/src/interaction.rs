//! Structured options delivered by slash-command interactions.

use command_args_core::{ArgumentSchema, ParsedArguments, ParsedValue, Value, untyped_spec};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One node of an interaction option tree.
///
/// Sub-commands and groups carry no value, only nested `options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionOption {
    /// Option name as registered with the platform.
    pub name: String,
    /// Submitted value; absent for sub-commands and groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Nested options of a sub-command or group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<InteractionOption>,
}

/// Flattens an option tree into name-keyed arguments.
///
/// Options without a value (sub-commands) are stored under their own name
/// with the name as value, then their children are flattened too. Names the
/// schema does not know get an untyped string spec.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
/// use command_args_parser::{InteractionOption, parse_interaction_options};
///
/// let schema = ArgumentSchema::builder()
///     .define("amount", ArgumentKind::Option, TypeGuard::Int, "", true, "1")
///     .build()
///     .unwrap();
/// let options: Vec<InteractionOption> =
///     serde_json::from_str(r#"[{"name": "amount", "value": 25}]"#).unwrap();
///
/// let args = parse_interaction_options(&options, &schema);
/// assert_eq!(args.int("amount"), 25);
/// ```
pub fn parse_interaction_options(
    options: &[InteractionOption],
    schema: &ArgumentSchema,
) -> ParsedArguments {
    let mut args = ParsedArguments::new();
    flatten(options, schema, &mut args);
    args
}

fn flatten(options: &[InteractionOption], schema: &ArgumentSchema, args: &mut ParsedArguments) {
    for option in options {
        let spec = schema
            .get(&option.name)
            .cloned()
            .unwrap_or_else(|| untyped_spec(&option.name));

        let value = match &option.value {
            Some(json) => to_value(json),
            None => Value::Str(option.name.clone()),
        };
        debug!(option = %option.name, value = ?value, "Bound interaction option");
        args.insert(ParsedValue::explicit(spec, value));

        flatten(&option.options, schema, args);
    }
}

fn to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Null => Value::default(),
        other => Value::Str(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use command_args_core::{ArgumentKind, TypeGuard};
    use serde_json::json;

    use super::*;

    fn options(value: serde_json::Value) -> Vec<InteractionOption> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_kinds() {
        let schema = ArgumentSchema::builder()
            .define("ratio", ArgumentKind::Option, TypeGuard::String, "", false, "")
            .build()
            .unwrap();
        let args = parse_interaction_options(
            &options(json!([
                {"name": "count", "value": 3},
                {"name": "ratio", "value": 0.5},
                {"name": "loud", "value": true},
                {"name": "note", "value": "hi"}
            ])),
            &schema,
        );

        assert_eq!(args.get("count").unwrap().raw(), &Value::Int(3));
        assert_eq!(args.get("ratio").unwrap().raw(), &Value::Float(0.5));
        assert_eq!(args.string("ratio"), "0.50");
        assert!(args.bool("loud"));
        assert_eq!(args.string("note"), "hi");
    }

    #[test]
    fn test_sub_command_tree_is_flattened() {
        let schema = ArgumentSchema::builder()
            .define("action", ArgumentKind::Option, TypeGuard::SubCommand, "", true, "")
            .build()
            .unwrap();
        let args = parse_interaction_options(
            &options(json!([
                {"name": "action", "options": [
                    {"name": "user", "value": "123456789012345678"}
                ]}
            ])),
            &schema,
        );

        assert_eq!(args.string("action"), "action");
        assert_eq!(args.string("user"), "123456789012345678");
        assert_eq!(args.get("action").unwrap().spec().type_guard, TypeGuard::SubCommand);
        assert_eq!(args.get("user").unwrap().spec().type_guard, TypeGuard::String);
    }

    #[test]
    fn test_empty_payload() {
        let args = parse_interaction_options(&[], &ArgumentSchema::default());
        assert!(args.is_empty());
    }
}
