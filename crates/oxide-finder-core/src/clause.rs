//! Canonical SELECT clauses.

use std::fmt;

use serde::{Deserialize, Serialize};

static CANONICAL: [ClauseKey; 7] = ClauseKey::ALL;

/// One of the top-level clauses a raw SELECT is split into.
///
/// The derived ordering is the canonical clause order the splitter assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKey {
    /// `SELECT ...`
    Select,
    /// `FROM ...`, including any joins written in the raw SQL.
    From,
    /// `WHERE ...`
    Where,
    /// `GROUP BY ...`
    GroupBy,
    /// `HAVING ...`
    Having,
    /// `ORDER BY ...`
    OrderBy,
    /// `LIMIT ...`, with an optional `OFFSET`.
    LimitOffset,
}

impl ClauseKey {
    /// All clauses in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Select,
        Self::From,
        Self::Where,
        Self::GroupBy,
        Self::Having,
        Self::OrderBy,
        Self::LimitOffset,
    ];

    /// Returns the keyword that opens the clause.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::OrderBy => "ORDER BY",
            Self::LimitOffset => "LIMIT",
        }
    }

    /// Returns the clauses that come after this one.
    #[must_use]
    pub fn following(self) -> &'static [Self] {
        &CANONICAL[self as usize + 1..]
    }
}

impl fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![
            ClauseKey::OrderBy,
            ClauseKey::Select,
            ClauseKey::LimitOffset,
            ClauseKey::Where,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                ClauseKey::Select,
                ClauseKey::Where,
                ClauseKey::OrderBy,
                ClauseKey::LimitOffset
            ]
        );
    }

    #[test]
    fn test_following() {
        assert_eq!(
            ClauseKey::Having.following(),
            &[ClauseKey::OrderBy, ClauseKey::LimitOffset]
        );
        assert!(ClauseKey::LimitOffset.following().is_empty());
        assert_eq!(ClauseKey::Select.following().len(), 6);
    }

    #[test]
    fn test_display() {
        assert_eq!(ClauseKey::GroupBy.to_string(), "GROUP BY");
    }
}
