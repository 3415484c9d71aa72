//! Persisting the session token and user record in private cookies.
//!
//! The cookies are the analog of the browser storage the session lives in:
//! two string values, `token` and `user`, written at log-in, read by every
//! protected request, and cleared at log-out. They are encrypted and signed
//! by the [PrivateCookieJar], so the client cannot read or forge them.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::Error;

use super::session::{Session, StoredUser};

/// The cookie holding the opaque bearer token.
pub(crate) const COOKIE_TOKEN: &str = "token";
/// The cookie holding the serialized user record.
pub(crate) const COOKIE_USER: &str = "user";

/// How long the session cookies last.
///
/// There is no renewal and no server-side expiry check; the cookies simply
/// age out, mirroring a token sitting in browser storage until it is
/// cleared.
pub(crate) const SESSION_COOKIE_DURATION: Duration = Duration::days(30);

fn build_session_cookie(name: &'static str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name, value))
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build()
}

/// Store the session token and user record, indicating that a user is
/// logged in.
///
/// Returns the cookie jar with both cookies added.
pub fn set_session_cookies(
    jar: PrivateCookieJar,
    token: &str,
    user_json: &str,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + SESSION_COOKIE_DURATION;

    jar.add(build_session_cookie(COOKIE_TOKEN, token.to_string(), expiry))
        .add(build_session_cookie(COOKIE_USER, user_json.to_string(), expiry))
}

/// Set both session cookies to an invalid value and set their max age to
/// zero, which should delete them on the client side.
pub fn invalidate_session_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    let expired = |name: &'static str| {
        Cookie::build((name, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/")
            .build()
    };

    jar.add(expired(COOKIE_TOKEN)).add(expired(COOKIE_USER))
}

/// Reconstruct the [Session] from the cookie jar.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if either cookie is absent,
/// - [Error::InvalidUserRecord] if the user cookie does not hold a JSON
///   object with an integer `id`.
pub fn session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let token_cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let user_cookie = jar.get(COOKIE_USER).ok_or(Error::CookieMissing)?;

    let user: StoredUser = serde_json::from_str(user_cookie.value_trimmed())
        .map_err(|error| Error::InvalidUserRecord(error.to_string()))?;

    Ok(Session::new(user.id, token_cookie.value().to_string()))
}
