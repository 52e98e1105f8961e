//! Cookie-based authentication middleware for the admin pages.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::api::middleware::auth::{ADMIN_COOKIE, cookie_value};
use crate::state::AppState;

/// Authenticates admin page requests using the `admin_token` cookie.
///
/// Unlike the API auth middleware, which returns `401 Unauthorized`, this
/// middleware redirects to `/admin/login` so browsers land on the form.
/// When no admin token is configured every request passes.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    if !st.auth_service.is_enabled() {
        return Ok(next.run(req).await);
    }

    let token = cookie_value(req.headers(), ADMIN_COOKIE);

    match st.auth_service.authenticate(token.as_deref()) {
        Ok(()) => Ok(next.run(req).await),
        Err(_) => Err(Redirect::to("/admin/login")),
    }
}
