//! Session cookie helpers. The session is a single cookie whose value is the
//! signed user id ("<user-id>|<mac>"); nothing is persisted server-side.

use axum::http::header;
use axum::http::request::Parts;

use crate::auth::credentials;

/// Set-Cookie value that starts a session for a user, path-scoped to the
/// whole site.
pub fn session_cookie(cookie_name: &str, secret: &str, user_id: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        cookie_name,
        credentials::sign(secret, user_id)
    )
}

/// Set-Cookie value that ends the session.
pub fn clear_session_cookie(cookie_name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", cookie_name)
}

/// Read and verify the session cookie from request parts. Absent, malformed,
/// or tampered cookies yield None.
pub fn read_user_id(parts: &Parts, cookie_name: &str, secret: &str) -> Option<String> {
    let token = get_cookie_value(parts, cookie_name)?;
    credentials::verify_signed(secret, token)
}

pub fn get_cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "test-secret";

    fn parts_with_cookie(cookie: &str) -> Parts {
        let (parts, _) = Request::builder()
            .uri("/")
            .header(header::COOKIE, cookie)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn cookie_round_trip() {
        let header_value = session_cookie("user_id", SECRET, "u-1");
        let cookie = header_value.split(';').next().unwrap();
        let parts = parts_with_cookie(cookie);
        assert_eq!(
            read_user_id(&parts, "user_id", SECRET).as_deref(),
            Some("u-1")
        );
    }

    #[test]
    fn tampered_cookie_yields_no_user() {
        let parts = parts_with_cookie("user_id=u-1|deadbeef");
        assert_eq!(read_user_id(&parts, "user_id", SECRET), None);
    }

    #[test]
    fn missing_cookie_yields_no_user() {
        let (parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        assert_eq!(read_user_id(&parts, "user_id", SECRET), None);
    }

    #[test]
    fn other_cookies_are_ignored() {
        let parts = parts_with_cookie("theme=dark; lang=en");
        assert_eq!(read_user_id(&parts, "user_id", SECRET), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cleared = clear_session_cookie("user_id");
        assert!(cleared.contains("Max-Age=0"));
        assert!(cleared.starts_with("user_id=;"));
    }
}
