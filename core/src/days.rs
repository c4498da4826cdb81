//! Extracts the membership-days countdown from free-form UI text.

use once_cell::sync::Lazy;
use regex::Regex;

static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(\d+)\s+days?\s+of\s+membership\s+left\b",
        r"(?i)\bexpires?\s+in\s+(\d+)\s+days?\b",
        r"(?i)\bmembership\b[^\d]*(\d+)\s+days?\s+(?:remaining|left)\b",
        r"(?i)\byou\s+are\s+a\s+member\b[^\d]*(\d+)\s+days?\b",
    ]
    .iter()
    .filter_map(|p| match Regex::new(p) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("days: invalid pattern {p}: {e}");
            None
        }
    })
    .collect()
});

/// Days remaining mentioned in `text`, trying each known phrasing in order.
pub fn parse_days(text: &str) -> Option<i64> {
    let normalized = text.replace('\u{00A0}', " ");
    let t = normalized.trim();
    if t.is_empty() {
        return None;
    }
    PATTERNS.iter().find_map(|re| {
        re.captures(t)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_title_screen_phrase() {
        assert_eq!(parse_days("You have 27 days of membership left."), Some(27));
        assert_eq!(parse_days("1 day of membership left"), Some(1));
    }

    #[test]
    fn matches_expiry_and_remaining_phrases() {
        assert_eq!(parse_days("Your membership expires in 14 days"), Some(14));
        assert_eq!(parse_days("Membership: 3 days remaining"), Some(3));
        assert_eq!(parse_days("You are a member. 200 days"), Some(200));
    }

    #[test]
    fn normalizes_non_breaking_space() {
        assert_eq!(parse_days("45\u{00A0}days of membership left"), Some(45));
    }

    #[test]
    fn ignores_unrelated_text() {
        assert_eq!(parse_days(""), None);
        assert_eq!(parse_days("   "), None);
        assert_eq!(parse_days("Welcome to the game"), None);
        assert_eq!(parse_days("14 days"), None);
    }

    #[test]
    fn overflowing_number_is_skipped() {
        assert_eq!(parse_days("99999999999999999999999 days of membership left"), None);
    }
}
