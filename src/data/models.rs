//! Data models
//!
//! Rust structs representing database rows. Identifiers are surrogate keys
//! assigned by the store (`INTEGER PRIMARY KEY AUTOINCREMENT`); they carry no
//! meaning beyond row identity.

use serde::{Deserialize, Serialize};

/// A registered user; root of all ownership relationships.
///
/// `password_hash` is stored opaque: the model never hashes or verifies
/// passwords, and projections never expose the field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// false after a soft delete (`deactivate_user`); the row still exists
    /// and still satisfies foreign keys, unlike a hard delete.
    pub is_active: bool,
}

/// A published image post, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub owner_id: i64,
    pub caption: Option<String>,
    pub image_url: String,
}

/// A comment by one user on one post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
}

/// A like edge; at most one per (user, post) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
}

/// A directed follow edge between two users.
///
/// `follower_id` follows `followed_id`; the pair is unique and the two ids
/// are never equal.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
}
