//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::api::middleware::auth::ADMIN_COOKIE;
use crate::state::AppState;

/// Lifetime of the login cookie: 30 days.
const COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub brand: String,
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub token: String,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /admin/login`
///
/// Redirects straight to `/admin` when no admin token is configured.
pub async fn login_page_handler(State(state): State<AppState>) -> Response {
    if !state.auth_service.is_enabled() {
        return Redirect::to("/admin").into_response();
    }

    LoginTemplate {
        brand: state.site.brand.clone(),
        error: String::new(),
    }
    .into_response()
}

/// Checks the submitted token and stores it in the `admin_token` cookie.
///
/// # Endpoint
///
/// `POST /admin/login` (form field `token`)
///
/// On success redirects to `/admin` with `303 See Other`; on failure renders
/// the form again with `401 Unauthorized`.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = form.token.trim();

    if state.auth_service.authenticate(Some(token)).is_err() {
        tracing::warn!("Admin login failed");
        let template = LoginTemplate {
            brand: state.site.brand.clone(),
            error: "Invalid admin token".to_string(),
        };
        return (StatusCode::UNAUTHORIZED, template).into_response();
    }

    tracing::info!("Admin login succeeded");

    let cookie = session_cookie(token, COOKIE_MAX_AGE_SECS, is_https(&state.site.base_url));

    (
        StatusCode::SEE_OTHER,
        [(header::SET_COOKIE, cookie), (header::LOCATION, "/admin".to_string())],
    )
        .into_response()
}

/// Clears the login cookie.
///
/// # Endpoint
///
/// `POST /admin/logout`
pub async fn logout_handler(State(state): State<AppState>) -> Response {
    let cookie = session_cookie("", 0, is_https(&state.site.base_url));

    (
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, "/admin/login".to_string()),
        ],
    )
        .into_response()
}

/// `Set-Cookie` value for the admin session. `Secure` is added when the
/// service is published over https.
fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{ADMIN_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Strict"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn is_https(base_url: &str) -> bool {
    base_url
        .get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}
