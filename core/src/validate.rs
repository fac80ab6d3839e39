//! Argument schema validation.
//!
//! Catches registration-time mistakes (duplicate names, a misplaced content
//! capture, bad flag names) before a command is ever invoked.
//!
//! # Examples
//!
//! ```
//! use command_args_core::*;
//!
//! let ok = [
//!     ArgumentSpec::new("user", ArgumentKind::Option, TypeGuard::User).required(),
//!     ArgumentSpec::new("reason", ArgumentKind::Content, TypeGuard::String),
//! ];
//! assert!(validate_entries(&ok).is_empty());
//!
//! // Content must come last
//! let bad = [
//!     ArgumentSpec::new("reason", ArgumentKind::Content, TypeGuard::String),
//!     ArgumentSpec::new("user", ArgumentKind::Option, TypeGuard::User),
//! ];
//! assert!(!validate_entries(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::ArgumentSpec;

/// Schema construction errors.
///
/// All of these are configuration mistakes in a command definition and are
/// reported when the command is registered, never at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Argument name is empty or whitespace-only.
    #[error("argument name cannot be empty")]
    EmptyName,
    /// Two arguments share a name.
    #[error("duplicate argument in schema: {0}")]
    DuplicateArgument(String),
    /// Flag name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid flag name: {0}")]
    InvalidFlagName(String),
    /// The flag pattern failed to compile.
    #[error("unable to create pattern for flag {name}: {reason}")]
    FlagPattern { name: String, reason: String },
    /// A flag was declared with the content kind.
    #[error("flag cannot capture content: {0}")]
    ContentFlag(String),
    /// More than one content capture was declared.
    #[error("schema declares more than one content argument: {0}")]
    MultipleContent(String),
    /// A positional argument follows the content capture.
    #[error("content argument {content} must be last, found {after} after it")]
    ContentNotLast { content: String, after: String },
    /// Choices were added to an argument that does not exist.
    #[error("cannot add choices to unknown argument: {0}")]
    UnknownArgument(String),
}

/// Validates an ordered list of argument specs.
///
/// Flags are ignored when checking content placement because they are
/// removed from the input before positional matching starts.
pub fn validate_entries(entries: &[ArgumentSpec]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for spec in entries {
        let name = spec.name.trim();
        if name.is_empty() {
            errors.push(SchemaError::EmptyName);
            return errors;
        }
        if !seen.insert(name) {
            errors.push(SchemaError::DuplicateArgument(name.to_string()));
            return errors;
        }
    }

    let mut content: Option<&str> = None;
    for spec in entries.iter().filter(|spec| !spec.is_flag()) {
        if let Some(content) = content {
            let err = if spec.is_content() {
                SchemaError::MultipleContent(spec.name.clone())
            } else {
                SchemaError::ContentNotLast {
                    content: content.to_string(),
                    after: spec.name.clone(),
                }
            };
            errors.push(err);
            return errors;
        }
        if spec.is_content() {
            content = Some(spec.name.as_str());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::{ArgumentKind, ArgumentSchema, TypeGuard};

    use super::*;

    fn option(name: &str) -> ArgumentSpec {
        ArgumentSpec::new(name, ArgumentKind::Option, TypeGuard::String)
    }

    fn content(name: &str) -> ArgumentSpec {
        ArgumentSpec::new(name, ArgumentKind::Content, TypeGuard::String)
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let errors = validate_entries(&[option("a"), option("a")]);
        assert_eq!(errors, vec![SchemaError::DuplicateArgument("a".to_string())]);
    }

    #[test]
    fn test_rejects_empty_name() {
        let errors = validate_entries(&[option("  ")]);
        assert_eq!(errors, vec![SchemaError::EmptyName]);
    }

    #[test]
    fn test_rejects_second_content() {
        let errors = validate_entries(&[content("a"), content("b")]);
        assert_eq!(errors, vec![SchemaError::MultipleContent("b".to_string())]);
    }

    #[test]
    fn test_rejects_option_after_content() {
        let errors = validate_entries(&[content("text"), option("user").required()]);
        assert_eq!(
            errors,
            vec![SchemaError::ContentNotLast {
                content: "text".to_string(),
                after: "user".to_string(),
            }]
        );
    }

    #[test]
    fn test_flags_may_follow_content() {
        let result = ArgumentSchema::builder()
            .define("text", ArgumentKind::Content, TypeGuard::String, "", false, "")
            .add_flag("loud", TypeGuard::Bool, ArgumentKind::Flag, "", false, "false")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_reports_first_error() {
        let err = ArgumentSchema::builder()
            .define("x", ArgumentKind::Option, TypeGuard::Int, "", true, "0")
            .define("x", ArgumentKind::Option, TypeGuard::Int, "", true, "0")
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateArgument("x".to_string()));
    }
}
