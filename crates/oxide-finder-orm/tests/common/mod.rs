#![allow(dead_code)]

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
    pub user_id: i64,
}
