//! Whitespace tokenizer with double-quote grouping.

/// Splits `input` on whitespace, keeping double-quoted spans together.
///
/// - A token that starts with `"` opens a quoted span, closed by a `"`
///   followed by whitespace or the end of input. The quotes are removed and
///   inner whitespace is kept as written.
/// - A `"` in the middle of a word is an ordinary character.
/// - Empty tokens (including `""` and blank quoted spans) are dropped.
/// - An unterminated quote swallows the rest of the input into one token.
///
/// # Examples
///
/// ```
/// use command_args_parser::tokenize;
///
/// assert_eq!(tokenize(r#"ban "spam bot"  now"#), vec!["ban", "spam bot", "now"]);
/// assert_eq!(tokenize(r#"say "never closed here"#), vec!["say", "never closed here"]);
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_quote = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quote {
            let closes = ch == '"' && chars.peek().is_none_or(|next| next.is_whitespace());
            if closes {
                in_quote = false;
                if buf.trim().is_empty() {
                    buf.clear();
                } else {
                    tokens.push(std::mem::take(&mut buf));
                }
            } else {
                buf.push(ch);
            }
        } else if ch.is_whitespace() {
            if !buf.is_empty() {
                tokens.push(std::mem::take(&mut buf));
            }
        } else if ch == '"' && buf.is_empty() {
            in_quote = true;
        } else {
            buf.push(ch);
        }
    }

    let rest = if in_quote { buf.trim() } else { buf.as_str() };
    if !rest.is_empty() {
        tokens.push(rest.to_string());
    }
    tokens
}
