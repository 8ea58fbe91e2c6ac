use askama::Template;
use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::db::store;
use crate::error::{AppError, AppResult};
use crate::extractors::MaybeUser;
use crate::routes::auth::{LoginTemplate, SignupTemplate};
use crate::routes::home::Html;
use crate::routes::PostView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/newpost", get(new_post_page).post(new_post_submit))
        .route("/myposts", get(my_posts))
        .route("/edit", get(edit_post_page).post(edit_post_submit))
        .route("/delete", get(delete_post))
        .route("/like", get(like_post))
}

// -- Templates --

#[derive(Template)]
#[template(path = "pages/new_post.html")]
struct NewPostTemplate {
    username: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/my_posts.html")]
struct MyPostsTemplate {
    username: Option<String>,
    posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "pages/edit_post.html")]
struct EditPostTemplate {
    username: Option<String>,
    post_id: String,
    subject: String,
    content: String,
}

// -- Forms and queries --

#[derive(Deserialize)]
pub struct NewPostForm {
    pub subject: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct EditPostForm {
    pub post_id: String,
    pub subject: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct PostIdQuery {
    pub post_id: String,
}

// -- Handlers --

/// GET /newpost — the form, or a signup prompt for visitors.
async fn new_post_page(MaybeUser(user): MaybeUser) -> AppResult<Response> {
    match user {
        Some(u) => Ok(Html(NewPostTemplate {
            username: Some(u.username),
        })
        .into_response()),
        None => Ok(Html(SignupTemplate::with_error("You need an account to post!")).into_response()),
    }
}

/// POST /newpost — create a post with zero likes and comments. The creator
/// comes from the session, not the form.
async fn new_post_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<NewPostForm>,
) -> AppResult<Response> {
    let user = match user {
        Some(u) => u,
        None => return Ok(Redirect::to("/login").into_response()),
    };

    let conn = state.db.get()?;
    let post = store::create_post(&conn, &user.username, &form.subject, &form.content)?;
    tracing::info!("New post {} by {}", post.id, user.username);

    Ok(Redirect::to("/").into_response())
}

/// GET /myposts — the current user's posts, newest first.
async fn my_posts(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Response> {
    let user = match user {
        Some(u) => u,
        None => {
            return Ok(Html(LoginTemplate::with_error("Sign in to view your posts!"))
                .into_response())
        }
    };

    let conn = state.db.get()?;
    let posts = store::list_posts_by_creator(&conn, &user.username)?
        .into_iter()
        .map(|p| PostView::build(&conn, p, Some(&user)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Html(MyPostsTemplate {
        username: Some(user.username),
        posts,
    })
    .into_response())
}

/// GET /edit?post_id=... — edit form, creator only.
async fn edit_post_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = store::find_post_by_id(&conn, &query.post_id)?.ok_or(AppError::NotFound)?;

    let user = match user {
        Some(u) if u.username == post.creator_name => u,
        _ => return Ok(Redirect::to("/").into_response()),
    };

    Ok(Html(EditPostTemplate {
        username: Some(user.username),
        post_id: post.id,
        subject: post.subject,
        content: post.content,
    })
    .into_response())
}

/// POST /edit — apply the edit, creator only. Non-creators are redirected
/// home without the edit being applied.
async fn edit_post_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<EditPostForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = store::find_post_by_id(&conn, &form.post_id)?.ok_or(AppError::NotFound)?;

    let is_creator = user.is_some_and(|u| u.username == post.creator_name);
    if !is_creator {
        return Ok(Redirect::to("/").into_response());
    }

    store::update_post(&conn, &post.id, &form.subject, &form.content)?;
    Ok(Redirect::to("/myposts").into_response())
}

/// GET /delete?post_id=... — delete, creator only. Missing or unowned posts
/// get a login/ownership prompt and nothing is deleted.
async fn delete_post(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = store::find_post_by_id(&conn, &query.post_id)?;

    let owned = match (&post, &user) {
        (Some(p), Some(u)) => p.creator_name == u.username,
        _ => false,
    };
    if !owned {
        return Ok(Html(LoginTemplate::with_error("Sign in to delete your posts!"))
            .into_response());
    }

    store::delete_post(&conn, &query.post_id)?;
    Ok(Redirect::to("/myposts").into_response())
}

/// GET /like?post_id=... — toggle the viewer's like. Creators liking their
/// own post is a no-op redirect home.
async fn like_post(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Response> {
    let user = match user {
        Some(u) => u,
        None => return Ok(Redirect::to("/login").into_response()),
    };

    let conn = state.db.get()?;
    let post = store::find_post_by_id(&conn, &query.post_id)?.ok_or(AppError::NotFound)?;

    if post.creator_name == user.username {
        return Ok(Redirect::to("/").into_response());
    }

    store::toggle_like(&conn, &post.id, &user.id)?;
    Ok(Redirect::to("/").into_response())
}
