//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g., '/transfers/{transaction_id}/edit', use [format_endpoint].
//!
//! These are the routes served by this application. The paths of the remote
//! REST API live next to the client functions in the [crate::api] module.

/// The root route which redirects to the transfers or log in page.
pub const ROOT: &str = "/";
/// The page for displaying a user's transfers.
pub const TRANSFERS_VIEW: &str = "/transfers";
/// The page for creating a new transfer.
pub const NEW_TRANSFER_VIEW: &str = "/transfers/new";
/// The page for editing an existing transfer.
pub const EDIT_TRANSFER_VIEW: &str = "/transfers/{transaction_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering a new user.
pub const USERS: &str = "/api/users";
/// The route to create a transfer.
pub const TRANSFERS_API: &str = "/api/transfers";
/// The route to update or delete a single transfer.
pub const TRANSFER: &str = "/api/transfers/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transfers/{transaction_id}/edit',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
