//! Session handling for the web front-end.
//!
//! The application performs no authentication of its own: logging in
//! exchanges credentials with the remote API for an opaque bearer token and
//! a user record, and this module is responsible for persisting that pair
//! in private cookies, reconstructing a [Session] from them on every
//! protected request, and redirecting to the log-in page when they are
//! absent.

mod cookie;
mod middleware;
mod session;

pub use cookie::{invalidate_session_cookies, session_from_cookies, set_session_cookies};
pub use middleware::{SessionGateState, session_guard, session_guard_hx};
pub use session::{Session, StoredUser, UserId};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, COOKIE_USER};
