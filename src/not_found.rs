//! The 404 page.

use axum::{http::StatusCode, response::Response};

use crate::html::{error_view, render};

/// Route handler for unmatched paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Build the 404 response directly, for handlers that discover a missing
/// resource themselves.
pub fn get_404_not_found_response() -> Response {
    render(
        StatusCode::NOT_FOUND,
        error_view(
            "Page Not Found",
            "404",
            "Page not found",
            "The page you are looking for does not exist. It may have been \
            deleted in a previous reload.",
        ),
    )
}
