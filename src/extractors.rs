use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::session;
use crate::db::store;
use crate::error::AppError;
use crate::state::AppState;

/// The user resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

/// Optional user extractor. Resolves the session cookie before handler logic
/// runs; yields None when the cookie is absent, tampered, or the referenced
/// user no longer exists. Handlers that require login check the Option and
/// redirect themselves.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = match session::read_user_id(
            parts,
            &state.config.auth.cookie_name,
            &state.config.auth.secret,
        ) {
            Some(id) => id,
            None => return Ok(MaybeUser(None)),
        };

        let conn = state.db.get()?;
        let user = store::find_user_by_id(&conn, &user_id)?;
        Ok(MaybeUser(user.map(|u| CurrentUser {
            id: u.id,
            username: u.username,
        })))
    }
}
