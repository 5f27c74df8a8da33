//! Tests for the `#[derive(Model)]` macro output.

mod common;
use common::*;

use oxide_finder_core::{Model, Property};
use oxide_finder_derive::Model;

#[allow(dead_code)]
#[derive(Model)]
struct AuditEntry {
    #[property(key)]
    entry_id: i64,
    #[property(key)]
    source: String,
    message: String,
}

#[test]
fn test_explicit_table_name() {
    assert_eq!(User::STORAGE_NAME, "users");
    assert_eq!(Post::STORAGE_NAME, "posts");
}

#[test]
fn test_default_table_name_is_snake_case() {
    assert_eq!(AuditEntry::STORAGE_NAME, "audit_entry");
}

#[test]
fn test_properties_in_declaration_order() {
    let names: Vec<&str> = User::PROPERTIES.iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["id", "username", "role"]);
}

#[test]
fn test_renamed_column() {
    assert_eq!(
        Post::schema().property("author"),
        Some(&Property {
            name: "author",
            field: "user_id",
            key: false,
        })
    );
}

#[test]
fn test_computed_attributes() {
    assert_eq!(User::COMPUTED, &["post_count"]);
    assert!(User::schema().is_computed("post_count"));
    assert!(User::schema().property("post_count").is_none());
    assert!(Post::COMPUTED.is_empty());
}

#[test]
fn test_composite_key() {
    let keys: Vec<&str> = AuditEntry::schema().key().map(|p| p.name).collect();
    assert_eq!(keys, vec!["entry_id", "source"]);
}
