//! Duration expressions such as `1d12h` or `30m 15s`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static UNIT_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)([smhdwy])").expect("static regex must compile"));

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const YEAR: u64 = 52 * WEEK;

/// A parsed duration expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationExpr {
    /// Sum of every `<n><unit>` group.
    pub duration: Duration,
    /// Human readable rendering, e.g. `1 Day, 2 Hours & 30 Minutes`.
    pub display: String,
}

/// Parses every `<n><unit>` group in `text` (units `s m h d w y`, a year
/// being 52 weeks) and sums them.
///
/// Returns `None` when no group is present.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use command_args_core::parse_duration;
///
/// let expr = parse_duration("1d2h30m").unwrap();
/// assert_eq!(expr.duration, Duration::from_secs(86_400 + 7_200 + 1_800));
/// assert_eq!(expr.display, "1 Day, 2 Hours & 30 Minutes");
///
/// assert!(parse_duration("forever").is_none());
/// ```
pub fn parse_duration(text: &str) -> Option<DurationExpr> {
    let mut total: u64 = 0;
    let mut parts = Vec::new();

    for caps in UNIT_GROUP.captures_iter(text) {
        let Ok(amount) = caps[1].parse::<u64>() else {
            continue;
        };
        let unit = caps[2].to_ascii_lowercase();
        let (seconds, singular) = match unit.as_str() {
            "s" => (1, "Second"),
            "m" => (MINUTE, "Minute"),
            "h" => (HOUR, "Hour"),
            "d" => (DAY, "Day"),
            "w" => (WEEK, "Week"),
            _ => (YEAR, "Year"),
        };
        total = total.saturating_add(amount.saturating_mul(seconds));
        let label = if amount == 1 {
            singular.to_string()
        } else {
            format!("{singular}s")
        };
        parts.push(format!("{amount} {label}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(DurationExpr {
        duration: Duration::from_secs(total),
        display: join_display(&parts),
    })
}

fn join_display(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} & {last}", head.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_unit() {
        let expr = parse_duration("45s").unwrap();
        assert_eq!(expr.duration, Duration::from_secs(45));
        assert_eq!(expr.display, "45 Seconds");
    }

    #[test]
    fn test_groups_may_be_separated() {
        let expr = parse_duration("1w 1H").unwrap();
        assert_eq!(expr.duration, Duration::from_secs(WEEK + HOUR));
        assert_eq!(expr.display, "1 Week & 1 Hour");
    }

    #[test]
    fn test_year_is_52_weeks() {
        let expr = parse_duration("1y").unwrap();
        assert_eq!(expr.duration, Duration::from_secs(52 * 7 * 86_400));
    }

    #[test]
    fn test_no_groups() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("10").is_none());
    }
}
