//! Read-only projections of stored entities
//!
//! Pure model-to-mapping conversions for external collaborators (an HTTP
//! layer would serialize these straight to JSON). The user projection never
//! carries `password_hash`; the post projection carries derived engagement
//! counts supplied by the caller, see [`crate::data::Database::project_post`].

use serde::Serialize;

use super::models::{Comment, Follow, Like, Post, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProjection {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostProjection {
    pub id: i64,
    pub owner_id: i64,
    pub caption: Option<String>,
    pub image_url: String,
    pub comments_count: i64,
    pub likes_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentProjection {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeProjection {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowProjection {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
}

/// Project a user, dropping the password hash.
pub fn project_user(user: &User) -> UserProjection {
    UserProjection {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        is_active: user.is_active,
    }
}

/// Project a post with its engagement counts.
///
/// The counts are the live cardinality of the related comment/like sets at
/// the moment the caller read them.
pub fn project_post(post: &Post, comments_count: i64, likes_count: i64) -> PostProjection {
    PostProjection {
        id: post.id,
        owner_id: post.owner_id,
        caption: post.caption.clone(),
        image_url: post.image_url.clone(),
        comments_count,
        likes_count,
    }
}

pub fn project_comment(comment: &Comment) -> CommentProjection {
    CommentProjection {
        id: comment.id,
        author_id: comment.author_id,
        post_id: comment.post_id,
        content: comment.content.clone(),
    }
}

pub fn project_like(like: &Like) -> LikeProjection {
    LikeProjection {
        id: like.id,
        user_id: like.user_id,
        post_id: like.post_id,
    }
}

pub fn project_follow(follow: &Follow) -> FollowProjection {
    FollowProjection {
        id: follow.id,
        follower_id: follow.follower_id,
        followed_id: follow.followed_id,
    }
}
