use askama::Template;
use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::db::models::Comment;
use crate::db::store;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::routes::home::Html;
use crate::routes::PostView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(comments_page))
        .route("/newcomment", post(new_comment))
        .route("/editcomment", get(edit_comment_page).post(edit_comment_submit))
        .route("/deletecomment", get(delete_comment))
}

// -- Templates --

#[derive(Template)]
#[template(path = "pages/comments.html")]
struct CommentsTemplate {
    username: Option<String>,
    post: PostView,
    comments: Vec<CommentView>,
}

#[derive(Template)]
#[template(path = "pages/edit_comment.html")]
struct EditCommentTemplate {
    username: Option<String>,
    comment_id: String,
    post_id: String,
    content: String,
}

struct CommentView {
    id: String,
    post_id: String,
    username: String,
    content: String,
    created_at: String,
    /// Viewer wrote this comment; show edit/delete controls.
    mine: bool,
}

impl CommentView {
    fn build(comment: Comment, viewer: Option<&CurrentUser>) -> Self {
        let mine = viewer.is_some_and(|u| u.username == comment.username);
        CommentView {
            id: comment.id,
            post_id: comment.post_id,
            username: comment.username,
            content: comment.content,
            created_at: super::display_date(&comment.created_at),
            mine,
        }
    }
}

// -- Forms and queries --

#[derive(Deserialize)]
pub struct PostIdQuery {
    pub post_id: String,
}

#[derive(Deserialize)]
pub struct NewCommentForm {
    pub post_id: String,
    pub comment: String,
}

#[derive(Deserialize)]
pub struct CommentIdQuery {
    pub comment_id: String,
    pub post_id: String,
}

#[derive(Deserialize)]
pub struct EditCommentForm {
    pub comment_id: String,
    pub post_id: String,
    pub new_comment: String,
}

fn comments_url(post_id: &str) -> String {
    format!("/comments?post_id={}", post_id)
}

// -- Handlers --

/// GET /comments?post_id=... — the post with its comments, newest first.
async fn comments_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = store::find_post_by_id(&conn, &query.post_id)?.ok_or(AppError::NotFound)?;

    let comments = store::list_comments_for_post(&conn, &post.id)?
        .into_iter()
        .map(|c| CommentView::build(c, user.as_ref()))
        .collect();
    let post = PostView::build(&conn, post, user.as_ref())?;

    Ok(Html(CommentsTemplate {
        username: user.map(|u| u.username),
        post,
        comments,
    })
    .into_response())
}

/// POST /newcomment — add a comment and bump the post's counter.
async fn new_comment(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<NewCommentForm>,
) -> AppResult<Response> {
    let user = match user {
        Some(u) => u,
        None => return Ok(Redirect::to("/login").into_response()),
    };

    let conn = state.db.get()?;
    let post = store::find_post_by_id(&conn, &form.post_id)?.ok_or(AppError::NotFound)?;

    store::create_comment(&conn, &post.id, &user.username, &form.comment)?;
    Ok(Redirect::to(&comments_url(&post.id)).into_response())
}

/// GET /editcomment?comment_id=...&post_id=... — edit form, author only.
async fn edit_comment_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<CommentIdQuery>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let comment =
        store::find_comment_by_id(&conn, &query.comment_id)?.ok_or(AppError::NotFound)?;

    let user = match user {
        Some(u) if u.username == comment.username => u,
        _ => return Ok(Redirect::to("/login").into_response()),
    };

    Ok(Html(EditCommentTemplate {
        username: Some(user.username),
        comment_id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
    })
    .into_response())
}

/// POST /editcomment — apply the edit, author only. Non-authors are
/// redirected to login without the edit being applied.
async fn edit_comment_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<EditCommentForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let comment =
        store::find_comment_by_id(&conn, &form.comment_id)?.ok_or(AppError::NotFound)?;

    let is_author = user.is_some_and(|u| u.username == comment.username);
    if !is_author {
        return Ok(Redirect::to("/login").into_response());
    }

    store::update_comment(&conn, &comment.id, &form.new_comment)?;
    Ok(Redirect::to(&comments_url(&comment.post_id)).into_response())
}

/// GET /deletecomment?comment_id=...&post_id=... — delete and decrement the
/// post's counter, author only. Non-authors silently no-op back to the list.
async fn delete_comment(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<CommentIdQuery>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let comment =
        store::find_comment_by_id(&conn, &query.comment_id)?.ok_or(AppError::NotFound)?;

    let is_author = user.is_some_and(|u| u.username == comment.username);
    if is_author {
        store::delete_comment(&conn, &comment.id)?;
    }

    Ok(Redirect::to(&comments_url(&comment.post_id)).into_response())
}
