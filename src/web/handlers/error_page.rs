//! HTML rendering of [`AppError`] for browser-facing routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    reason: String,
    message: String,
}

/// Error returned by page handlers.
///
/// Same status mapping as [`AppError`], but rendered as a page instead of a
/// JSON body. Internal details are not shown.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Page request failed");
        }

        let message = if status.is_server_error() {
            "Something went wrong on our side. Please try again in a moment.".to_string()
        } else {
            self.0.to_string()
        };

        let template = ErrorTemplate {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        };

        (status, template).into_response()
    }
}
