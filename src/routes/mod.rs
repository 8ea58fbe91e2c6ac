pub mod assets;
pub mod auth;
pub mod comments;
pub mod home;
pub mod posts;

use axum::routing::get;
use axum::Router;
use rusqlite::Connection;

use crate::db::models::Post;
use crate::db::store;
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::front_page))
        .route("/assets/{*path}", get(assets::serve))
        .merge(auth::router())
        .merge(posts::router())
        .merge(comments::router())
}

/// A post decorated with viewer-specific flags for rendering.
pub struct PostView {
    pub id: String,
    pub creator_name: String,
    pub subject: String,
    pub content: String,
    pub created_at: String,
    pub num_likes: i64,
    pub num_comments: i64,
    /// Viewer is the creator; show edit/delete controls.
    pub owned: bool,
    /// Viewer has liked this post; show "Unlike".
    pub liked: bool,
}

impl PostView {
    pub fn build(
        conn: &Connection,
        post: Post,
        viewer: Option<&CurrentUser>,
    ) -> Result<Self, rusqlite::Error> {
        let owned = viewer.is_some_and(|u| u.username == post.creator_name);
        let liked = match viewer {
            Some(u) if !owned => store::has_liked(conn, &post.id, &u.id)?,
            _ => false,
        };
        Ok(PostView {
            id: post.id,
            creator_name: post.creator_name,
            subject: post.subject,
            content: post.content,
            created_at: display_date(&post.created_at),
            num_likes: post.num_likes,
            num_comments: post.num_comments,
            owned,
            liked,
        })
    }
}

/// Date portion of an RFC 3339 timestamp for display.
fn display_date(timestamp: &str) -> String {
    timestamp.get(..10).unwrap_or(timestamp).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_takes_date_portion() {
        assert_eq!(display_date("2026-08-27T10:00:00.000Z"), "2026-08-27");
    }

    #[test]
    fn display_date_passes_short_strings_through() {
        assert_eq!(display_date("now"), "now");
    }
}
