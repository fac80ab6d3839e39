//! Positional matching of tokens against the non-flag schema entries.
//!
//! Matching runs in two passes over the remaining keys, in declaration
//! order:
//!
//! 1. **Required keys**, until the first optional key. Every required key
//!    gets a value: the matched text, or its declared default.
//! 2. **Optional keys**, only while tokens remain. A key that does not match
//!    is left unbound and the tokens stay available for the next key.
//!
//! Reaching a content key in either pass stops matching and hands the
//! remaining tokens to the content capturer.

use std::collections::VecDeque;
use std::sync::Arc;

use command_args_core::{
    ArgumentSpec, MatchStrategy, ParsedArguments, ParsedValue, ReportSink,
};
use tracing::debug;

use crate::error::ParseConfigError;

/// Remaining tokens of an invocation.
///
/// Positional guards consume from the front; search guards cut the matched
/// span out of the joined text wherever it is. A quoted phrase (a token
/// holding whitespace) is never searched into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: VecDeque<String>,
}

impl TokenStream {
    /// Wraps a token sequence.
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    /// Returns `true` when every token has been consumed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens left.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The token at the cursor.
    pub fn front(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    /// Consumes the token at the cursor.
    pub fn take_front(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Tokens joined by single spaces.
    pub fn joined(&self) -> String {
        self.tokens.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }

    /// Like [`joined`](Self::joined), with every quoted phrase blanked out.
    ///
    /// Byte offsets line up with `joined`, so a match found here can be
    /// passed straight to [`cut`](Self::cut).
    pub fn searchable(&self) -> String {
        let mut text = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            if token.contains(char::is_whitespace) {
                text.extend(std::iter::repeat_n(' ', token.len()));
            } else {
                text.push_str(token);
            }
        }
        text
    }

    /// Removes the byte range `start..end` of [`joined`](Self::joined).
    ///
    /// Tokens fully inside the range disappear. A token only partly covered
    /// keeps the uncovered text on either side as separate tokens.
    pub fn cut(&mut self, start: usize, end: usize) {
        let mut kept = VecDeque::with_capacity(self.tokens.len());
        let mut offset = 0;

        for token in self.tokens.drain(..) {
            let token_start = offset;
            let token_end = offset + token.len();
            offset = token_end + 1;

            if token_end <= start || token_start >= end {
                kept.push_back(token);
                continue;
            }

            let from = start.saturating_sub(token_start);
            let to = end.min(token_end) - token_start;
            for piece in [&token[..from], &token[to..]] {
                let piece = piece.trim();
                if !piece.is_empty() {
                    kept.push_back(piece.to_string());
                }
            }
        }

        self.tokens = kept;
    }

    /// The remaining tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens.into()
    }
}

/// Runs both matching passes.
///
/// Returns the content spec when a content key was reached; the caller then
/// captures whatever is left in `stream`.
pub fn match_positional(
    stream: &mut TokenStream,
    keys: &[Arc<ArgumentSpec>],
    args: &mut ParsedArguments,
    sink: &dyn ReportSink,
) -> Option<Arc<ArgumentSpec>> {
    let mut consumed = 0;

    for spec in keys {
        if spec.is_content() {
            return Some(Arc::clone(spec));
        }
        if !spec.required {
            break;
        }
        consumed += 1;

        let value = match take_value(stream, spec) {
            Some(value) => ParsedValue::explicit(Arc::clone(spec), value),
            None => ParsedValue::fallback(Arc::clone(spec)),
        };
        debug!(
            argument = %spec.name,
            value = %value.as_string(),
            default = value.is_default(),
            "Matched required argument"
        );
        args.insert(value);
    }

    let optional = &keys[consumed..];
    if stream.is_empty() || optional.is_empty() {
        return None;
    }

    for spec in optional {
        if stream.is_empty() {
            break;
        }
        if spec.required {
            sink.report(
                "Argument parsing error",
                &ParseConfigError::RequiredAfterOptional(spec.name.clone()),
            );
            return None;
        }
        if spec.is_content() {
            return Some(Arc::clone(spec));
        }
        if let Some(value) = take_value(stream, spec) {
            debug!(argument = %spec.name, value = %value, "Matched optional argument");
            args.insert(ParsedValue::explicit(Arc::clone(spec), value));
        }
    }

    None
}

/// Consumes the value for `spec`, if one matches.
fn take_value(stream: &mut TokenStream, spec: &ArgumentSpec) -> Option<String> {
    match spec.type_guard.strategy() {
        MatchStrategy::Positional => {
            if !spec.accepts(stream.front()?) {
                return None;
            }
            stream.take_front()
        }
        MatchStrategy::Search => {
            let text = stream.searchable();
            let found = spec.type_guard.extract(&text)?;
            if !spec.choices.is_empty() && !spec.choices.contains(&found.value) {
                return None;
            }
            stream.cut(found.start, punctuation_end(&text, found.end));
            Some(found.value)
        }
    }
}

// Trailing punctuation up to the token edge goes with the match.
fn punctuation_end(text: &str, end: usize) -> usize {
    let rest = &text[end..];
    let word = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if rest[..word]
        .chars()
        .all(|ch| matches!(ch, ',' | ';' | ':' | '!' | '?' | ')'))
    {
        end + word
    } else {
        end
    }
}
