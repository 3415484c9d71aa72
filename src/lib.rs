//! Carteira is a web front-end for managing personal transfers.
//!
//! This library serves HTML pages for signing up, logging in, and listing,
//! filtering, creating, editing, and deleting transfers. It holds no durable
//! state of its own: users, transfers, and tags live behind a remote REST
//! API, and the only thing persisted on the client is the session cookie
//! pair.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod auth;
mod endpoints;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod register_user;
mod routing;
mod transaction;

pub use api::ApiClient;
pub use app_state::AppState;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{
    alert::AlertTemplate, html::render, internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The token or user cookie is missing from the cookie jar in the
    /// request.
    #[error("no session cookies in the cookie jar")]
    CookieMissing,

    /// The user cookie exists but does not contain a valid user record.
    ///
    /// The stored record must be a JSON object with at least an integer
    /// `id` field.
    #[error("the stored user record could not be parsed: {0}")]
    InvalidUserRecord(String),

    /// The remote transfers API could not be reached at the transport level.
    #[error("could not reach the transfers API: {0}")]
    ApiUnreachable(String),

    /// The remote transfers API answered with a non-success status code.
    ///
    /// An expired session token is not distinguished from any other
    /// rejection; it surfaces here like any other server error.
    #[error("the transfers API returned HTTP {0}")]
    ApiStatus(u16),

    /// The remote transfers API answered with a body that could not be
    /// parsed into the expected shape.
    #[error("could not parse the transfers API response: {0}")]
    MalformedResponse(String),

    /// An amount string did not parse to a finite, non-negative number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A transaction date string was not an ISO-8601 date.
    #[error("\"{0}\" is not a valid transaction date")]
    InvalidDate(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., ID) are correct and that the transfer still exists
    /// after the latest reload.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::MalformedResponse(value.to_string())
        } else {
            Error::ApiUnreachable(value.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    /// A short, generic explanation suitable for showing to the user.
    ///
    /// The original error detail is logged and then discarded; the client
    /// only ever sees one of these.
    fn user_details(&self) -> &'static str {
        match self {
            Error::ApiUnreachable(_) => {
                "The transfers service could not be reached. Check your connection and try again."
            }
            Error::ApiStatus(_) => {
                "The transfers service rejected the request. Try again in a moment."
            }
            _ => "An unexpected error occurred. Try again later.",
        }
    }

    /// Turn the error into a transient alert fragment titled `message`.
    ///
    /// The response is 200 with an out-of-band swap so that htmx delivers
    /// the alert into the page's alert container without touching the
    /// element that triggered the request.
    fn into_alert_response(self, message: &str) -> Response {
        tracing::error!("{message}: {self}");

        render(
            StatusCode::OK,
            alert::alert_swap(AlertTemplate::error(message, self.user_details())),
        )
    }
}
