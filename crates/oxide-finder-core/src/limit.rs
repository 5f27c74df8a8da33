//! LIMIT/OFFSET extraction from a raw `LIMIT` fragment.

use std::sync::LazyLock;

use regex::Regex;

// MySQL operand order: `LIMIT <offset>, <count>`.
static LIMIT_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*LIMIT\s+([0-9]+)\s*,\s*([0-9]+)").expect("valid LIMIT pattern")
});

static LIMIT_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*LIMIT\s+([0-9]+)\s+OFFSET\s+([0-9]+)").expect("valid LIMIT pattern")
});

static LIMIT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*LIMIT\s+([0-9]+)").expect("valid LIMIT pattern"));

/// Row count and offset parsed out of a `LIMIT` fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitOffset {
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

impl LimitOffset {
    /// Parses the three accepted forms, first match wins:
    ///
    /// 1. `LIMIT <offset>, <count>`
    /// 2. `LIMIT <count> OFFSET <offset>`
    /// 3. `LIMIT <count>`
    ///
    /// Anything else yields no values. A number too large for `u64` is
    /// dropped.
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let number = |caps: &regex::Captures<'_>, i: usize| -> Option<u64> {
            caps.get(i).and_then(|m| m.as_str().parse().ok())
        };

        if let Some(caps) = LIMIT_COMMA.captures(fragment) {
            Self {
                limit: number(&caps, 2),
                offset: number(&caps, 1),
            }
        } else if let Some(caps) = LIMIT_OFFSET.captures(fragment) {
            Self {
                limit: number(&caps, 1),
                offset: number(&caps, 2),
            }
        } else if let Some(caps) = LIMIT_ONLY.captures(fragment) {
            Self {
                limit: number(&caps, 1),
                offset: None,
            }
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_form_is_offset_then_count() {
        let parsed = LimitOffset::parse("LIMIT 5, 10");
        assert_eq!(parsed.offset, Some(5));
        assert_eq!(parsed.limit, Some(10));
    }

    #[test]
    fn test_offset_keyword_form() {
        let parsed = LimitOffset::parse("LIMIT 10 OFFSET 5");
        assert_eq!(parsed.limit, Some(10));
        assert_eq!(parsed.offset, Some(5));
    }

    #[test]
    fn test_limit_only() {
        assert_eq!(
            LimitOffset::parse("LIMIT 7"),
            LimitOffset {
                limit: Some(7),
                offset: None
            }
        );
    }

    #[test]
    fn test_case_and_whitespace() {
        let parsed = LimitOffset::parse("\n  limit 3 offset 9 ");
        assert_eq!(parsed.limit, Some(3));
        assert_eq!(parsed.offset, Some(9));
        assert_eq!(LimitOffset::parse(" LIMIT 1 ,2").offset, Some(1));
    }

    #[test]
    fn test_non_matching_yields_nothing() {
        assert_eq!(LimitOffset::parse("LIMIT ?"), LimitOffset::default());
        assert_eq!(LimitOffset::parse("LIMIT ALL"), LimitOffset::default());
        assert_eq!(LimitOffset::parse("OFFSET 4"), LimitOffset::default());
    }

    #[test]
    fn test_no_upper_bound_below_u64() {
        let parsed = LimitOffset::parse("LIMIT 18446744073709551615");
        assert_eq!(parsed.limit, Some(u64::MAX));
        let overflow = LimitOffset::parse("LIMIT 99999999999999999999");
        assert_eq!(overflow.limit, None);
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(LimitOffset::parse("LIMIT \u{0665}, 10"), LimitOffset::default());
        assert_eq!(LimitOffset::parse("LIMIT \u{0967}"), LimitOffset::default());
    }
}
