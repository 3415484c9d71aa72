//! The read-only session context handed to protected route handlers.

use serde::{Deserialize, Serialize};

/// Identifier for a user, assigned by the remote API.
pub type UserId = i64;

/// The logged-in user's identity for the duration of one request.
///
/// Constructed once per request by the session guard middleware from the
/// persisted cookie pair and inserted as a request extension. Handlers only
/// ever read it; the only way to change session state is to log in or out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    token: String,
}

impl Session {
    /// Assemble a session from its parts.
    pub(crate) fn new(user_id: UserId, token: String) -> Self {
        Self { user_id, token }
    }

    /// The id of the logged-in user, used to scope transfer fetches.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The opaque bearer token attached to every authenticated API call.
    ///
    /// No validity or expiry check is ever performed on it; a stale token
    /// is only discovered when the remote API rejects a call.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// The user record persisted in the user cookie.
///
/// The remote API may include more fields; only the integer `id` is
/// required, the rest is carried along opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    /// The user's id.
    pub id: UserId,
}
