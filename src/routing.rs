//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{session_guard, session_guard_hx},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register_user::{get_register_page, register_user},
    transaction::{
        create_transfer_endpoint, delete_transfer_endpoint, get_edit_transfer_page,
        get_new_transfer_page, get_transfers_page, update_transfer_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSFERS_VIEW, get(get_transfers_page))
        .route(endpoints::NEW_TRANSFER_VIEW, get(get_new_transfer_page))
        .route(endpoints::EDIT_TRANSFER_VIEW, get(get_edit_transfer_page))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    // These POST/PUT/DELETE routes need to use the HX-Redirect header for
    // auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::TRANSFERS_API, post(create_transfer_endpoint))
            .route(
                endpoints::TRANSFER,
                put(update_transfer_endpoint).delete(delete_transfer_endpoint),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                session_guard_hx,
            )),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transfers page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSFERS_VIEW)
}
