//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{Error, api::ApiClient, transaction::ListingStore};

/// The state of the web server.
///
/// There is deliberately little here: the remote API owns all durable
/// state, so the server carries only the cookie key, the API client, and
/// the in-memory listing snapshots.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The client for the remote transfers API.
    pub api: ApiClient,

    /// The per-user snapshot of fetched transfers.
    pub listing: ListingStore,
}

impl AppState {
    /// Create a new [AppState] for the remote API at `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(cookie_secret: &str, api_base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            api: ApiClient::new(api_base_url)?,
            listing: ListingStore::new(),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
