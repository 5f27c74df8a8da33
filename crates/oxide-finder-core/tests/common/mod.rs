#![allow(dead_code)]

use oxide_finder_core::{ClauseKey, ParsedStatement};
use oxide_finder_derive::Model;

#[derive(Debug, Clone, Model)]
#[model(table = "users")]
pub struct User {
    #[property(key)]
    pub id: i64,
    pub username: String,
    pub role: String,
    #[property(computed)]
    pub post_count: i64,
}

#[derive(Debug, Clone, Model)]
#[model(table = "posts")]
pub struct Post {
    #[property(key)]
    pub id: i64,
    pub title: String,
    #[property(field = "user_id")]
    pub author: i64,
}

/// Returns the trimmed fragment for `key`.
pub fn clause(sql: &str, key: ClauseKey) -> Option<String> {
    ParsedStatement::split(sql)
        .get(key)
        .map(|fragment| fragment.trim().to_string())
}

/// Verifies that splitting the concatenated fragments of `sql` yields the
/// same fragments again.
pub fn assert_split_idempotent(sql: &str) {
    let first = ParsedStatement::split(sql);
    let second = ParsedStatement::split(&first.to_sql());
    assert_eq!(
        first, second,
        "Split is not idempotent.\n  Input:    {sql}\n  Rejoined: {}",
        first.to_sql()
    );
}
