//! Validation and extraction rules for [`TypeGuard`].
//!
//! `validate` answers "is this whole token a valid value", `extract` answers
//! "where is the first valid value inside this text". The positional matcher
//! uses `extract` for every [`MatchStrategy::Search`] guard, so a mention or a
//! duration is found wherever it sits in the remaining input.

use std::sync::LazyLock;

use regex::{Match, Regex};

use crate::{MatchStrategy, TypeGuard};

/// Span of text located by [`TypeGuard::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardMatch {
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset just past the match.
    pub end: usize,
    /// The matched text.
    pub value: String,
}

impl GuardMatch {
    fn from_match(m: Match<'_>) -> Self {
        Self {
            start: m.start(),
            end: m.end(),
            value: m.as_str().to_string(),
        }
    }
}

static PATTERNS: LazyLock<GuardPatterns> = LazyLock::new(GuardPatterns::new);

struct GuardPatterns {
    int: Regex,
    boolean: Regex,

    // Mentions: <@id>, <@!id>, <@&id>, <#id>
    user_mention: Regex,
    role_mention: Regex,
    channel_mention: Regex,
    snowflake: Regex,

    arr_string: Regex,
    message_url: Regex,
    duration: Regex,
}

impl GuardPatterns {
    fn new() -> Self {
        Self {
            int: Regex::new(r"-?\d+").expect("static regex must compile"),
            boolean: Regex::new(r"(?i)\b(?:true|false)\b").expect("static regex must compile"),
            user_mention: Regex::new(r"<@!?\d+>").expect("static regex must compile"),
            role_mention: Regex::new(r"<@&\d+>").expect("static regex must compile"),
            channel_mention: Regex::new(r"<#\d+>").expect("static regex must compile"),
            snowflake: Regex::new(r"\d{17,20}").expect("static regex must compile"),
            arr_string: Regex::new(r"[^\s,]+(?:,[^\s,]+)+").expect("static regex must compile"),
            message_url: Regex::new(
                r"(?i)https://(?:(?:canary|ptb)\.)?discord(?:app)?\.com/channels/(?:\d{17,20}|@me)/\d{17,20}/\d{17,20}",
            )
            .expect("static regex must compile"),
            duration: Regex::new(r"(?i)\b(?:\d+[smhdwy])+\b").expect("static regex must compile"),
        }
    }
}

impl TypeGuard {
    /// How the positional matcher consumes input for this guard.
    pub fn strategy(self) -> MatchStrategy {
        match self {
            TypeGuard::String | TypeGuard::SubCommand | TypeGuard::SubCommandGroup => {
                MatchStrategy::Positional
            }
            _ => MatchStrategy::Search,
        }
    }

    /// Returns `true` if the whole `token` is a valid value for this guard.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::TypeGuard;
    ///
    /// assert!(TypeGuard::User.validate("<@!123456789012345678>"));
    /// assert!(TypeGuard::User.validate("123456789012345678"));
    /// assert!(!TypeGuard::User.validate("<#123456789012345678>"));
    /// assert!(TypeGuard::Duration.validate("1h30m"));
    /// assert!(!TypeGuard::Int.validate("12abc"));
    /// ```
    pub fn validate(self, token: &str) -> bool {
        let p = &*PATTERNS;
        match self {
            TypeGuard::String => true,
            TypeGuard::SubCommand | TypeGuard::SubCommandGroup => !token.trim().is_empty(),
            TypeGuard::Int => token.trim().parse::<i64>().is_ok(),
            TypeGuard::Bool => parse_bool(token).is_some(),
            TypeGuard::Channel => {
                matches_whole(&p.channel_mention, token) || matches_whole(&p.snowflake, token)
            }
            TypeGuard::User => {
                matches_whole(&p.user_mention, token) || matches_whole(&p.snowflake, token)
            }
            TypeGuard::Role => {
                matches_whole(&p.role_mention, token) || matches_whole(&p.snowflake, token)
            }
            TypeGuard::Id => matches_whole(&p.snowflake, token),
            TypeGuard::ArrString => matches_whole(&p.arr_string, token),
            TypeGuard::MessageUrl => matches_whole(&p.message_url, token),
            TypeGuard::Duration => matches_whole(&p.duration, token),
        }
    }

    /// Locates the first value for this guard anywhere in `text`.
    ///
    /// Positional guards have no pattern: they return the first
    /// whitespace-delimited word.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::TypeGuard;
    ///
    /// let text = "please mute <@123456789012345678> for 2h30m";
    /// let user = TypeGuard::User.extract(text).unwrap();
    /// assert_eq!(user.value, "<@123456789012345678>");
    ///
    /// let duration = TypeGuard::Duration.extract(text).unwrap();
    /// assert_eq!(duration.value, "2h30m");
    /// assert_eq!(&text[duration.start..duration.end], "2h30m");
    ///
    /// assert!(TypeGuard::Int.extract(text).is_none());
    /// ```
    pub fn extract(self, text: &str) -> Option<GuardMatch> {
        let p = &*PATTERNS;
        match self {
            TypeGuard::String | TypeGuard::SubCommand | TypeGuard::SubCommandGroup => {
                first_word(text)
            }
            TypeGuard::Int => p
                .int
                .find_iter(text)
                .find(|m| standalone(text, m) && m.as_str().parse::<i64>().is_ok())
                .map(GuardMatch::from_match),
            TypeGuard::Bool => p
                .boolean
                .find_iter(text)
                .find(|m| standalone(text, m))
                .map(GuardMatch::from_match),
            TypeGuard::Channel => mention_or_id(&p.channel_mention, text),
            TypeGuard::User => mention_or_id(&p.user_mention, text),
            TypeGuard::Role => mention_or_id(&p.role_mention, text),
            TypeGuard::Id => find_snowflake(text),
            TypeGuard::ArrString => p.arr_string.find(text).map(GuardMatch::from_match),
            TypeGuard::MessageUrl => p.message_url.find(text).map(GuardMatch::from_match),
            TypeGuard::Duration => p.duration.find(text).map(GuardMatch::from_match),
        }
    }
}

/// Parses a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True`, `0`, `f`, `F`, `FALSE`,
/// `false`, `False`, plus any other capitalisation of `true` / `false`.
///
/// # Examples
///
/// ```
/// use command_args_core::parse_bool;
///
/// assert_eq!(parse_bool("True"), Some(true));
/// assert_eq!(parse_bool("0"), Some(false));
/// assert_eq!(parse_bool("yes"), None);
/// ```
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "t" | "T" => Some(true),
        "0" | "f" | "F" => Some(false),
        other if other.eq_ignore_ascii_case("true") => Some(true),
        other if other.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn matches_whole(re: &Regex, token: &str) -> bool {
    let token = token.trim();
    re.find(token)
        .is_some_and(|m| m.start() == 0 && m.end() == token.len())
}

// A standalone value is a whole word, optionally followed by punctuation.
fn standalone(text: &str, m: &Match<'_>) -> bool {
    let before = text[..m.start()].chars().next_back();
    let after = text[m.end()..].chars().next();
    before.is_none_or(char::is_whitespace)
        && after.is_none_or(|ch| ch.is_whitespace() || matches!(ch, ',' | ';' | ':' | '!' | '?' | ')'))
}

fn find_snowflake(text: &str) -> Option<GuardMatch> {
    PATTERNS
        .snowflake
        .find_iter(text)
        .find(|m| standalone(text, m))
        .map(GuardMatch::from_match)
}

fn mention_or_id(mention: &Regex, text: &str) -> Option<GuardMatch> {
    mention
        .find(text)
        .map(GuardMatch::from_match)
        .or_else(|| find_snowflake(text))
}

fn first_word(text: &str) -> Option<GuardMatch> {
    let start = text.find(|ch: char| !ch.is_whitespace())?;
    let end = text[start..]
        .find(char::is_whitespace)
        .map_or(text.len(), |offset| start + offset);
    Some(GuardMatch {
        start,
        end,
        value: text[start..end].to_string(),
    })
}
