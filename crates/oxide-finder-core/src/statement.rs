//! Splitting raw SQL into clause fragments.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::clause::ClauseKey;
use crate::fields::extract_fields;
use crate::limit::LimitOffset;
use crate::scanner::{Scanner, Terminal};

/// A raw SQL statement split into its top-level clauses.
///
/// Fragments keep the text exactly as written, leading whitespace and
/// keyword included; they are trimmed only when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    fragments: BTreeMap<ClauseKey, String>,
    fields: Option<Vec<String>>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl ParsedStatement {
    /// Splits `raw` into clause fragments in one left-to-right pass.
    ///
    /// Clauses are only recognised in canonical order. A clause written out
    /// of order, or a second occurrence of one, is swallowed by whichever
    /// fragment precedes it. Text before the first recognised keyword is
    /// dropped.
    #[must_use]
    pub fn split(raw: &str) -> Self {
        let mut scanner = Scanner::new(raw);
        let mut fragments = BTreeMap::new();

        for key in ClauseKey::ALL {
            if !scanner.at_keyword(key.keyword()) {
                continue;
            }

            let start = scanner.position();
            scanner.skip_whitespace();
            scanner.eat(Terminal::Keyword(key.keyword()));

            let terminals: Vec<Terminal<'static>> = key
                .following()
                .iter()
                .map(|next| Terminal::Keyword(next.keyword()))
                .collect();
            scanner.scan_until(&terminals);

            let fragment = &raw[start..scanner.position()];
            trace!(clause = %key, fragment, "captured clause");
            fragments.insert(key, fragment.to_string());
        }

        let fields = fragments
            .get(&ClauseKey::Select)
            .and_then(|select| extract_fields(select));
        let LimitOffset { limit, offset } = fragments
            .get(&ClauseKey::LimitOffset)
            .map(|fragment| LimitOffset::parse(fragment))
            .unwrap_or_default();

        Self {
            fragments,
            fields,
            limit,
            offset,
        }
    }

    /// Returns the fragment for `key`, if the raw SQL had one.
    #[must_use]
    pub fn get(&self, key: ClauseKey) -> Option<&str> {
        self.fragments.get(&key).map(String::as_str)
    }

    /// Returns true if the raw SQL had a fragment for `key`.
    #[must_use]
    pub fn contains(&self, key: ClauseKey) -> bool {
        self.fragments.contains_key(&key)
    }

    /// Iterates over the present fragments in canonical order.
    pub fn fragments(&self) -> impl Iterator<Item = (ClauseKey, &str)> + '_ {
        self.fragments.iter().map(|(key, text)| (*key, text.as_str()))
    }

    /// Returns true if no clause was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Output names of the SELECT list, one per expression.
    #[must_use]
    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Row count parsed from the LIMIT fragment.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Offset parsed from the LIMIT fragment.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Concatenates the present fragments in canonical order.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.fragments.values().map(String::as_str).collect()
    }
}
