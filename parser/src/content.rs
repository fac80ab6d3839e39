use std::sync::Arc;

use command_args_core::{ArgumentSpec, ParsedArguments, ParsedValue};
use tracing::debug;

use crate::positional::TokenStream;

/// Binds every remaining token to the content argument.
///
/// Tokens are re-joined with single spaces and trailing whitespace is
/// trimmed. With nothing left, a required content argument takes its default
/// and an optional one stays unbound.
pub fn capture_content(spec: Arc<ArgumentSpec>, stream: TokenStream, args: &mut ParsedArguments) {
    if stream.is_empty() {
        if spec.required {
            args.insert(ParsedValue::fallback(spec));
        }
        return;
    }

    let text = stream.joined().trim_end().to_string();
    debug!(argument = %spec.name, len = text.len(), "Captured content");
    args.insert(ParsedValue::explicit(spec, text));
}

#[cfg(test)]
mod tests {
    use command_args_core::{ArgumentKind, TypeGuard};

    use super::*;

    fn spec(required: bool) -> Arc<ArgumentSpec> {
        let spec = ArgumentSpec::new("text", ArgumentKind::Content, TypeGuard::String)
            .with_default("nothing");
        Arc::new(if required { spec.required() } else { spec })
    }

    #[test]
    fn test_joins_with_single_spaces() {
        let mut args = ParsedArguments::new();
        let stream = TokenStream::new(vec!["a b".into(), "c".into()]);
        capture_content(spec(false), stream, &mut args);
        assert_eq!(args.string("text"), "a b c");
    }

    #[test]
    fn test_optional_content_left_unbound_when_empty() {
        let mut args = ParsedArguments::new();
        capture_content(spec(false), TokenStream::default(), &mut args);
        assert!(!args.contains("text"));
    }

    #[test]
    fn test_required_content_defaults_when_empty() {
        let mut args = ParsedArguments::new();
        capture_content(spec(true), TokenStream::default(), &mut args);
        assert_eq!(args.string("text"), "nothing");
        assert!(args.get("text").unwrap().is_default());
    }
}
