use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Stored as "salt,hash" (see auth::credentials).
    pub password_hash: String,
    pub email: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub creator_name: String,
    pub subject: String,
    pub content: String,
    /// Mirrors the number of rows in post_likes for this post.
    pub num_likes: i64,
    /// Mirrors the number of live comments referencing this post.
    pub num_comments: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub username: String,
    pub content: String,
    pub created_at: String,
}
