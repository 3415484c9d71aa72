//! Log-out route handler that clears the session cookies and redirects users.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    auth::{invalidate_session_cookies, session_from_cookies},
    endpoints,
    transaction::ListingStore,
};

/// The state needed to log out.
#[derive(Debug, Clone)]
pub struct LogOutState {
    /// The key to be used for decrypting and verifying private cookies.
    pub cookie_key: Key,
    /// The per-user snapshot of fetched transfers, dropped on log-out.
    pub listing: ListingStore,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            listing: state.listing.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Clear both persisted session values and redirect the client to the
/// log-in page.
///
/// The cached listing snapshot for the user is dropped too, so a later
/// log-in starts from a fresh fetch.
pub async fn get_log_out(State(state): State<LogOutState>, jar: PrivateCookieJar) -> Response {
    if let Ok(session) = session_from_cookies(&jar) {
        state.listing.clear(session.user_id());
    }

    let jar = invalidate_session_cookies(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
