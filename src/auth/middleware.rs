//! The session gate: middleware that redirects logged-out clients to the
//! log-in page.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;

use crate::{AppState, auth::session_from_cookies, endpoints};

/// The state needed for the session gate.
#[derive(Clone)]
pub struct SessionGateState {
    /// The key to be used for decrypting and verifying private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for SessionGateState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionGateState> for Key {
    fn from_ref(state: &SessionGateState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that reconstructs the session from the cookie pair.
/// The session is placed into the request and the request executed normally
/// when the cookies are present, otherwise a redirect to the log-in page is
/// returned using `get_redirect` and the handler never runs, so no remote
/// call is ever made on behalf of a logged-out client.
#[inline]
async fn session_guard_internal(
    state: SessionGateState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect(endpoints::LOG_IN_VIEW);
        }
    };

    let session = match session_from_cookies(&jar) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("No usable session ({error}). Redirecting to log in page.");
            return get_redirect(endpoints::LOG_IN_VIEW);
        }
    };

    parts.extensions.insert(session);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// Middleware function that checks for the session cookies.
/// The [crate::auth::Session] is placed into the request and the request
/// executed normally if they are present, otherwise a redirect to the
/// log-in page is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the session.
pub async fn session_guard(
    State(state): State<SessionGateState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for the session cookies.
/// The [crate::auth::Session] is placed into the request and the request
/// executed normally if they are present, otherwise a HTMX redirect to the
/// log-in page is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(session): Extension<Session>` to receive the session.
pub async fn session_guard_hx(
    State(state): State<SessionGateState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
