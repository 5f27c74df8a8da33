//! Output names of a raw SELECT list.
//!
//! The last top-level token of every expression is taken as its name,
//! whether or not `AS` was written: `"t"."a"` names `a`,
//! `COUNT(*) AS total` names `total`.

use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::{split_top_level, Terminal};

static SELECT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*SELECT(?:\s+DISTINCT)?\s+(.*)").expect("valid SELECT pattern")
});

static BACKSLASH_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\(.)").expect("valid escape pattern"));

/// Returns the output name of every expression in a `SELECT` fragment, or
/// `None` if the fragment does not start with `SELECT`.
#[must_use]
pub fn extract_fields(select: &str) -> Option<Vec<String>> {
    let list = SELECT_LIST.captures(select)?.get(1)?.as_str();
    Some(
        select_expressions(list)
            .into_iter()
            .map(field_alias)
            .collect(),
    )
}

/// Splits a select list on top-level commas, trimming each expression.
#[must_use]
pub fn select_expressions(list: &str) -> Vec<&str> {
    split_top_level(list, Terminal::Punct(","))
        .into_iter()
        .map(str::trim)
        .collect()
}

/// Derives the output name of a single select expression.
#[must_use]
pub fn field_alias(expression: &str) -> String {
    let last_token = split_top_level(expression.trim(), Terminal::Whitespace)
        .pop()
        .unwrap_or_default();
    let name = split_top_level(last_token, Terminal::Punct("."))
        .pop()
        .unwrap_or_default();
    unquote(name)
}

fn unquote(name: &str) -> String {
    let Some(quote) = name.chars().next().filter(|c| matches!(*c, '"' | '`')) else {
        return name.to_string();
    };
    let inner = &name[quote.len_utf8()..];
    let inner = inner.strip_suffix(quote).unwrap_or(inner);
    BACKSLASH_ESCAPE.replace_all(inner, "$1").into_owned()
}
