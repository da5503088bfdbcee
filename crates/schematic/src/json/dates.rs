//! Date recognition inside string literals, used when the reader is
//! configured with `introspect_dates`.
//!
//! Recognised forms: an ISO-8601 date or date-time, `/Date(millisOrIso)/`,
//! and the escaped `\/Date(millisOrIso)\/` variant.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Date;

static WRAPPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\?/Date\(\s*(.*?)\s*\)\\?/$").expect("date wrapper pattern is valid"));

/// Millis or ISO text.
pub fn evaluate(millis_or_iso: &str) -> Option<Date> {
    let text = millis_or_iso.trim();
    match text.parse::<i64>() {
        Ok(millis) => Some(Date::from_millis(millis)),
        Err(_) => Date::parse_iso(text).ok(),
    }
}

pub fn from_literal(literal: &str) -> Option<Date> {
    if literal.len() <= 2 {
        return None;
    }
    if literal.starts_with(|c: char| c.is_ascii_digit()) {
        return Date::parse_iso(literal).ok();
    }
    let caps = WRAPPED.captures(literal)?;
    evaluate(caps.get(1)?.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_literals() {
        assert_eq!(from_literal("/Date(1000)/"), Some(Date::from_millis(1000)));
        assert_eq!(from_literal("\\/Date(1000)\\/"), Some(Date::from_millis(1000)));
        assert_eq!(
            from_literal("/Date(1970-01-01T00:00:02Z)/"),
            Some(Date::from_millis(2000))
        );
        assert_eq!(
            from_literal("1970-01-01T00:00:03Z"),
            Some(Date::from_millis(3000))
        );
    }

    #[test]
    fn leaves_other_strings_alone() {
        for s in ["12", "123 Main St", "Date(5)", "/Date(x)/", "hello"] {
            assert_eq!(from_literal(s), None, "{s}");
        }
    }
}
