//! SQLite database operations
//!
//! All database access goes through this module. The [`Database`] struct is
//! the explicit persistence context: callers open it, pass it to every
//! operation, and close it when the request scope ends. There is no global
//! store handle.
//!
//! Constraint enforcement lives in the schema (UNIQUE, CHECK, foreign keys
//! with `ON DELETE CASCADE`); this module classifies the violations into the
//! typed errors callers match on. Because the store serializes each
//! check-then-insert, two concurrent writers racing on the same uniqueness
//! key cannot both commit.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use super::projection::{self, PostProjection};
use crate::error::AppError;

/// Classify a write error from a constrained table.
///
/// Unique violations map per table: the `user` table's message names the
/// failing index (`user.username` / `user.email`), the engagement tables
/// report duplicates. Foreign-key violations mean a referenced row does not
/// exist or was hard-deleted. Check violations are length/emptiness bounds
/// that slipped past caller-side validation.
fn classify_write_error(table: &'static str, err: sqlx::Error) -> AppError {
    let mapped = match &err {
        sqlx::Error::Database(db_err) => {
            let msg = db_err.message();
            if db_err.is_unique_violation() {
                match table {
                    "user" if msg.contains("user.email") => {
                        Some(AppError::Uniqueness("email is already registered".to_string()))
                    }
                    "user" => Some(AppError::Uniqueness("username is already taken".to_string())),
                    "like" => Some(AppError::Duplicate(
                        "post is already liked by this user".to_string(),
                    )),
                    "follow" => Some(AppError::Duplicate("follow edge already exists".to_string())),
                    _ => None,
                }
            } else if db_err.is_foreign_key_violation() {
                Some(AppError::ForeignKey(format!(
                    "{table} references a row that does not exist"
                )))
            } else if db_err.is_check_violation() {
                Some(AppError::Validation(msg.to_string()))
            } else {
                None
            }
        }
        _ => None,
    };
    mapped.unwrap_or(AppError::Database(err))
}

/// Reject empty or oversized text fields before they reach the store.
///
/// Bounds are measured in characters, matching the schema's `length()`
/// checks.
fn require_bounded(field: &'static str, value: &str, max: usize) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Database connection pool wrapper.
///
/// Cloning is cheap: clones share the underlying pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the SQLite database at `path`.
    ///
    /// Creates the database file if it doesn't exist and runs pending
    /// migrations automatically. Foreign-key enforcement is switched on for
    /// every pooled connection.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!(
                    "failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    /// Close the pool. Pending operations finish first.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database closed");
    }

    // =========================================================================
    // User
    // =========================================================================

    /// Create a new user.
    ///
    /// The password hash is stored opaque; hashing and verification belong to
    /// the caller.
    ///
    /// # Errors
    /// `Validation` on empty/oversized fields, `Uniqueness` when the username
    /// or email is already taken.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        require_bounded("username", username, 30)?;
        require_bounded("email", email, 120)?;
        if password_hash.is_empty() {
            return Err(AppError::Validation(
                "password_hash must not be empty".to_string(),
            ));
        }

        let result = sqlx::query("INSERT INTO user (username, email, password_hash) VALUES (?, ?, ?)")
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error("user", e))?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
        })
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Soft-delete a user: sets `is_active = false` but keeps the row.
    ///
    /// The user's posts, comments, likes, and follow edges survive, and the
    /// row remains a valid foreign-key target. Distinct from
    /// [`Database::delete_user`].
    pub async fn deactivate_user(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE user SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Hard-delete a user and everything they own.
    ///
    /// Cascades to the user's posts (and those posts' comments and likes),
    /// their comments and likes on other posts, and every follow edge where
    /// they are either endpoint. The cascade rides on the schema's
    /// `ON DELETE CASCADE` edges, so the single DELETE is the atomic unit.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        tracing::debug!(user_id = id, "user hard-deleted with cascade");
        Ok(())
    }

    // =========================================================================
    // Post
    // =========================================================================

    /// Create a post owned by `owner_id`.
    ///
    /// # Errors
    /// `Validation` when `image_url` is empty or over 255 characters,
    /// `ForeignKey` when the owner does not exist.
    pub async fn create_post(
        &self,
        owner_id: i64,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<Post, AppError> {
        require_bounded("image_url", image_url, 255)?;

        let result = sqlx::query("INSERT INTO post (owner_id, caption, image_url) VALUES (?, ?, ?)")
            .bind(owner_id)
            .bind(caption)
            .bind(image_url)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error("post", e))?;

        Ok(Post {
            id: result.last_insert_rowid(),
            owner_id,
            caption: caption.map(str::to_string),
            image_url: image_url.to_string(),
        })
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// All posts owned by a user, newest first.
    pub async fn posts_by_owner(&self, owner_id: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>("SELECT * FROM post WHERE owner_id = ? ORDER BY id DESC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Explicit field update; passing `None` clears the caption.
    pub async fn update_post_caption(
        &self,
        id: i64,
        caption: Option<&str>,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE post SET caption = ? WHERE id = ?")
            .bind(caption)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Hard-delete a post; cascades to its comments and likes atomically.
    pub async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM post WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        tracing::debug!(post_id = id, "post deleted with engagement cascade");
        Ok(())
    }

    // =========================================================================
    // Comment
    // =========================================================================

    /// Add a comment by `author_id` on `post_id`.
    ///
    /// # Errors
    /// `Validation` on empty content, `ForeignKey` when either reference is
    /// dead.
    pub async fn add_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, AppError> {
        if content.is_empty() {
            return Err(AppError::Validation("content must not be empty".to_string()));
        }

        let result = sqlx::query("INSERT INTO comment (author_id, post_id, content) VALUES (?, ?, ?)")
            .bind(author_id)
            .bind(post_id)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error("comment", e))?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            author_id,
            post_id,
            content: content.to_string(),
        })
    }

    /// Comments on a post, oldest first.
    pub async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let comments =
            sqlx::query_as::<_, Comment>("SELECT * FROM comment WHERE post_id = ? ORDER BY id")
                .bind(post_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(comments)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comment WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn count_comments(&self, post_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comment WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Like
    // =========================================================================

    /// Record a like by `user_id` on `post_id`.
    ///
    /// The (user, post) pair is unique in the store, so a racing second like
    /// fails there even if both writers passed any caller-side check.
    ///
    /// # Errors
    /// `Duplicate` when the pair already exists, `ForeignKey` when either
    /// reference is dead.
    pub async fn add_like(&self, user_id: i64, post_id: i64) -> Result<Like, AppError> {
        let result = sqlx::query(r#"INSERT INTO "like" (user_id, post_id) VALUES (?, ?)"#)
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error("like", e))?;

        Ok(Like {
            id: result.last_insert_rowid(),
            user_id,
            post_id,
        })
    }

    /// Remove a like if present; returns whether a row was deleted.
    /// Idempotent: removing an absent like is a no-op.
    pub async fn remove_like(&self, user_id: i64, post_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(r#"DELETE FROM "like" WHERE user_id = ? AND post_id = ?"#)
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool, AppError> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM "like" WHERE user_id = ? AND post_id = ?"#)
                .bind(user_id)
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn count_likes(&self, post_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "like" WHERE post_id = ?"#)
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Follow
    // =========================================================================

    /// Create a directed follow edge from `follower_id` to `followed_id`.
    ///
    /// Self-follow is rejected before the insert; the schema's CHECK backs
    /// the same rule. The edge is unique per (follower, followed) pair.
    ///
    /// # Errors
    /// `SelfFollow` when the ids are equal, `Duplicate` when the edge exists,
    /// `ForeignKey` when either user is dead.
    pub async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<Follow, AppError> {
        if follower_id == followed_id {
            return Err(AppError::SelfFollow);
        }

        let result = sqlx::query("INSERT INTO follow (follower_id, followed_id) VALUES (?, ?)")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error("follow", e))?;

        Ok(Follow {
            id: result.last_insert_rowid(),
            follower_id,
            followed_id,
        })
    }

    /// Remove a follow edge if present; returns whether a row was deleted.
    /// Idempotent like [`Database::remove_like`].
    pub async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follow WHERE follower_id = ? AND followed_id = ?")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Users who follow `user_id`.
    ///
    /// Joins through `user`, so an edge whose endpoint was hard-deleted (and
    /// therefore cascaded away) can never surface here.
    pub async fn followers_of(&self, user_id: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.* FROM user u \
             INNER JOIN follow f ON f.follower_id = u.id \
             WHERE f.followed_id = ? ORDER BY f.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Users that `user_id` follows.
    pub async fn following_of(&self, user_id: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.* FROM user u \
             INNER JOIN follow f ON f.followed_id = u.id \
             WHERE f.follower_id = ? ORDER BY f.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn count_followers(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follow WHERE followed_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn count_following(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follow WHERE follower_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Project a post with its live engagement counts.
    ///
    /// Both counts come from one statement (two correlated subqueries), so
    /// the pair is a single snapshot of the store. Counts are never cached
    /// or stored.
    pub async fn project_post(&self, post: &Post) -> Result<PostProjection, AppError> {
        let (comments_count, likes_count): (i64, i64) = sqlx::query_as(
            r#"SELECT
                 (SELECT COUNT(*) FROM comment WHERE post_id = ?1),
                 (SELECT COUNT(*) FROM "like" WHERE post_id = ?1)"#,
        )
        .bind(post.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(projection::project_post(post, comments_count, likes_count))
    }
}
