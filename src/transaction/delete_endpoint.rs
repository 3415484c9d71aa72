//! Defines the endpoint for deleting a transfer.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{AppState, api::{ApiClient, delete_transaction}, auth::Session, endpoints};

use super::model::TransactionId;

/// The state needed to delete a transfer.
#[derive(Debug, Clone)]
pub struct DeleteTransferState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
}

impl FromRef<AppState> for DeleteTransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// A route handler for deleting a transfer, redirects to the transfers view
/// on success.
///
/// The interactive confirmation happens client side before the request is
/// made. There is no undo: once confirmed and accepted by the remote API,
/// the row is gone on the next reload, and with it the delete affordance
/// for that id.
pub async fn delete_transfer_endpoint(
    State(state): State<DeleteTransferState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match delete_transaction(&state.api, &session, transaction_id).await {
        Ok(()) => (
            HxRedirect(endpoints::TRANSFERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response("Could not delete the transfer"),
    }
}
