use askama::Template;
use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::{credentials, session};
use crate::db::store;
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::routes::home::Html;
use crate::state::AppState;

pub fn router() -> axum::Router<AppState> {
    use axum::routing::get;
    axum::Router::new()
        .route("/signup", get(signup_page).post(signup_submit))
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
}

// -- Templates --

#[derive(Template)]
#[template(path = "pages/signup.html")]
pub struct SignupTemplate {
    pub username: Option<String>,
    pub form_username: String,
    pub error: String,
}

impl SignupTemplate {
    pub fn with_error(error: &str) -> Self {
        Self {
            username: None,
            form_username: String::new(),
            error: error.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub username: Option<String>,
    pub form_username: String,
    pub error: String,
}

impl LoginTemplate {
    pub fn with_error(error: &str) -> Self {
        Self {
            username: None,
            form_username: String::new(),
            error: error.to_string(),
        }
    }
}

// -- Forms --

#[derive(Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    #[serde(rename = "verify-password")]
    pub verify_password: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// -- Response helpers --

fn redirect_with_session(state: &AppState, user_id: &str, location: &str) -> Response {
    let cookie = session::session_cookie(
        &state.config.auth.cookie_name,
        &state.config.auth.secret,
        user_id,
    );
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
        "",
    )
        .into_response()
}

fn signup_error(error: &str, echo_username: &str) -> Response {
    Html(SignupTemplate {
        username: None,
        form_username: echo_username.to_string(),
        error: error.to_string(),
    })
    .into_response()
}

// -- Signup --

/// GET /signup
pub async fn signup_page(MaybeUser(user): MaybeUser) -> AppResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/myposts").into_response());
    }
    Ok(Html(SignupTemplate {
        username: None,
        form_username: String::new(),
        error: String::new(),
    })
    .into_response())
}

/// POST /signup — validate, create the user with a salted hash, and start
/// a session. Every failure re-renders the form with a specific message and
/// echoes the username.
pub async fn signup_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/myposts").into_response());
    }

    if form.username.is_empty() && form.password.is_empty() {
        return Ok(signup_error("No username or password provided", ""));
    }
    if form.username.is_empty() {
        return Ok(signup_error("No username provided", ""));
    }
    if form.password.is_empty() {
        return Ok(signup_error("No password provided", &form.username));
    }

    let conn = state.db.get()?;
    if store::find_user_by_name(&conn, &form.username)?.is_some() {
        return Ok(signup_error("Username already exists", &form.username));
    }
    if form.password.chars().count() < 6 {
        return Ok(signup_error(
            "Password must be 6 characters or longer",
            &form.username,
        ));
    }
    if form.password != form.verify_password {
        return Ok(signup_error(
            "Passwords don't match, try again",
            &form.username,
        ));
    }

    let hash = credentials::hash_password(&form.username, &form.password, None);
    let email = form.email.as_deref().filter(|e| !e.is_empty());
    let new_user = store::create_user(&conn, &form.username, &hash, email)?;
    tracing::info!("New user signed up: {}", new_user.username);

    Ok(redirect_with_session(&state, &new_user.id, "/"))
}

// -- Login / logout --

/// GET /login
pub async fn login_page() -> Html<LoginTemplate> {
    Html(LoginTemplate {
        username: None,
        form_username: String::new(),
        error: String::new(),
    })
}

/// POST /login — a generic message on failure, echoing the username.
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let user = store::find_user_by_name(&conn, &form.username)?;

    match user {
        Some(u) if credentials::verify_password(&form.username, &form.password, &u.password_hash) => {
            tracing::info!("User logged in: {}", u.username);
            Ok(redirect_with_session(&state, &u.id, "/"))
        }
        _ => Ok(Html(LoginTemplate {
            username: None,
            form_username: form.username,
            error: "Invalid login".to_string(),
        })
        .into_response()),
    }
}

/// GET /logout — clear the session cookie and go home.
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                session::clear_session_cookie(&state.config.auth.cookie_name),
            ),
        ],
        "",
    )
        .into_response()
}
