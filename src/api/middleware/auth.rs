//! Admin token authentication middleware for the JSON API.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Name of the cookie set by the admin login page.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Authenticates API requests against the configured admin token.
///
/// The token is read from `Authorization: Bearer <token>` first and from the
/// `admin_token` cookie otherwise, so the admin page can call the API with
/// plain `fetch` after logging in. When no admin token is configured every
/// request passes.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the token is
/// missing or wrong.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !st.auth_service.is_enabled() {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => Some(token),
        Err(_) => cookie_value(&parts.headers, ADMIN_COOKIE),
    };

    st.auth_service.authenticate(token.as_deref())?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Extracts a cookie by name from the `Cookie` header.
///
/// Handles multiple cookies in one header and ignores malformed pairs. Names
/// and values are trimmed.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value_among_many() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; admin_token=abc=123 ; other=1"),
        );

        assert_eq!(cookie_value(&headers, "admin_token").as_deref(), Some("abc=123"));
        assert_eq!(cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert!(cookie_value(&headers, "missing").is_none());
    }

    #[test]
    fn test_cookie_value_trims_around_equals() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("admin_token = secret-token ;x=1"));

        assert_eq!(cookie_value(&headers, ADMIN_COOKIE).as_deref(), Some("secret-token"));
    }

    #[test]
    fn test_cookie_value_without_header() {
        assert!(cookie_value(&HeaderMap::new(), ADMIN_COOKIE).is_none());
    }
}
