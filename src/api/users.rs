//! Account registration and log-in against the remote API.

use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, auth::UserId};

use super::client::ApiClient;

/// The remote path for creating user accounts.
const USERS_PATH: &str = "/api/users";

/// The remote path for exchanging credentials for a session token.
const AUTH_PATH: &str = "/api/auth";

/// Register a new user account.
///
/// The API expects a multipart form with `name`, `email`, and `password`
/// fields and answers exactly HTTP 201 on success; any other status is
/// treated as a failure with no body contract.
pub async fn sign_up(
    api: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Error> {
    let form = multipart::Form::new()
        .text("name", name.to_string())
        .text("email", email.to_string())
        .text("password", password.to_string());

    let response = api
        .http()
        .post(api.url(USERS_PATH))
        .multipart(form)
        .send()
        .await?;

    if response.status().as_u16() != 201 {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    Ok(())
}

/// A successful credential exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSuccess {
    /// The opaque bearer token proving the user's identity to the API.
    pub token: String,
    /// The user's id, extracted from the returned user record.
    pub user_id: UserId,
    /// The returned user record serialized back to JSON, stored verbatim
    /// in the user cookie.
    pub user_json: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: Value,
}

/// Exchange credentials for a session token and user record.
///
/// # Errors
///
/// Any transport failure, non-success status, or malformed body is an
/// error; the caller treats them all as invalid credentials from the
/// user's point of view.
pub async fn log_in(api: &ApiClient, email: &str, password: &str) -> Result<AuthSuccess, Error> {
    let response = api
        .http()
        .post(api.url(AUTH_PATH))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    let body: AuthResponse = response.json().await?;

    let user_id = body
        .user
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::MalformedResponse("user record has no integer id".to_string()))?;

    Ok(AuthSuccess {
        token: body.token,
        user_id,
        user_json: body.user.to_string(),
    })
}
