//! Platform identifier helpers.

/// Minimum number of digits in a platform identifier.
pub const MIN_ID_DIGITS: usize = 17;

/// Reduces a mention (`<@!123…>`, `<#123…>`) or raw id to its digits.
///
/// Returns `None` when fewer than [`MIN_ID_DIGITS`] digits remain.
///
/// # Examples
///
/// ```
/// use command_args_core::clean_id;
///
/// assert_eq!(clean_id("<@!123456789012345678>").as_deref(), Some("123456789012345678"));
/// assert_eq!(clean_id("<@42>"), None);
/// assert_eq!(clean_id(""), None);
/// ```
pub fn clean_id(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    (digits.len() >= MIN_ID_DIGITS).then_some(digits)
}
