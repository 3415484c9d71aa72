//! Defines the route handler for the page that creates a new transfer.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use time::OffsetDateTime;

use crate::{AppState, api::ApiClient, endpoints, html::render};

use super::form::{
    FormMethod, TransactionFormConfig, TransactionFormData, TransactionFormErrors,
    load_tag_catalog, transaction_form, transfer_form_page,
};

/// The state needed for the new transfer page.
#[derive(Debug, Clone)]
pub struct NewTransferPageState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
}

impl FromRef<AppState> for NewTransferPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// Render the page for creating a transfer.
///
/// Opening the page starts a fresh draft dated today and loads the tag
/// catalog for the picker.
pub async fn get_new_transfer_page(State(state): State<NewTransferPageState>) -> Response {
    let catalog = load_tag_catalog(&state.api).await;
    let today = OffsetDateTime::now_utc().date();
    let values = TransactionFormData::empty(today);

    let form = transaction_form(&TransactionFormConfig {
        method: FormMethod::Post,
        action: endpoints::TRANSFERS_API,
        submit_label: "Create Transfer",
        cancel_url: endpoints::TRANSFERS_VIEW,
        values: &values,
        errors: &TransactionFormErrors::default(),
        available_tags: &catalog.tags,
        tags_unavailable: catalog.unavailable,
    });

    render(
        StatusCode::OK,
        transfer_form_page("Create Transfer", endpoints::NEW_TRANSFER_VIEW, form),
    )
}
