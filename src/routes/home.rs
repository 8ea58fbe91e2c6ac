use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::store;
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::routes::PostView;
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "pages/front_page.html")]
pub struct FrontPageTemplate {
    pub username: Option<String>,
    pub posts: Vec<PostView>,
}

/// GET / — all posts, newest first. Owner controls only for the owner,
/// like controls only for logged-in non-owners.
pub async fn front_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let posts = store::list_posts(&conn)?
        .into_iter()
        .map(|p| PostView::build(&conn, p, user.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Html(FrontPageTemplate {
        username: user.map(|u| u.username),
        posts,
    })
    .into_response())
}
