//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub brand: String,
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /` (`GET /home` redirects here)
pub async fn home_handler(State(state): State<crate::state::AppState>) -> impl IntoResponse {
    HomeTemplate {
        brand: state.site.brand.clone(),
    }
}
