//! Defines the route handler for the page that edits an existing transfer.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    AppState, Error,
    api::ApiClient,
    auth::Session,
    endpoints::{self, format_endpoint},
    html::render,
};

use super::{
    form::{
        FormMethod, TransactionFormConfig, TransactionFormData, TransactionFormErrors,
        load_tag_catalog, transaction_form, transfer_form_page,
    },
    listing::{FetchOutcome, ListingStore, refresh},
    model::{Transaction, TransactionId},
};

/// The state needed for the edit transfer page.
#[derive(Debug, Clone)]
pub struct EditTransferPageState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
    /// The per-user snapshot of fetched transfers.
    pub listing: ListingStore,
}

impl FromRef<AppState> for EditTransferPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            listing: state.listing.clone(),
        }
    }
}

/// Find `transaction_id` in the snapshot, refreshing once for deep links
/// that arrive before any listing fetch has run.
async fn find_transaction(
    state: &EditTransferPageState,
    session: &Session,
    transaction_id: TransactionId,
) -> Option<Transaction> {
    if let Some(snapshot) = state.listing.snapshot(session.user_id())
        && let Some(transaction) = snapshot.iter().find(|t| t.id == transaction_id)
    {
        return Some(transaction.clone());
    }

    match refresh(&state.api, &state.listing, session).await {
        FetchOutcome::Loaded(transactions) => transactions
            .into_iter()
            .find(|transaction| transaction.id == transaction_id),
        _ => None,
    }
}

/// Render the page for editing a transfer.
///
/// The form is prefilled from the fetched transfer, with its tags
/// preselected in the picker.
///
/// # Errors
///
/// Returns [Error::NotFound] for a transfer that no longer exists after
/// the latest reload.
pub async fn get_edit_transfer_page(
    State(state): State<EditTransferPageState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = find_transaction(&state, &session, transaction_id)
        .await
        .ok_or(Error::NotFound)?;

    let catalog = load_tag_catalog(&state.api).await;

    let values = TransactionFormData {
        description: transaction.description,
        kind: Some(transaction.kind),
        amount: transaction.amount.text().to_string(),
        date: Some(transaction.date),
        tag_ids: transaction.tags.iter().map(|tag| tag.id).collect(),
    };

    let form = transaction_form(&TransactionFormConfig {
        method: FormMethod::Put,
        action: &format_endpoint(endpoints::TRANSFER, transaction_id),
        submit_label: "Save Changes",
        cancel_url: endpoints::TRANSFERS_VIEW,
        values: &values,
        errors: &TransactionFormErrors::default(),
        available_tags: &catalog.tags,
        tags_unavailable: catalog.unavailable,
    });

    Ok(render(
        StatusCode::OK,
        transfer_form_page("Edit Transfer", endpoints::TRANSFERS_VIEW, form),
    ))
}

#[cfg(test)]
mod edit_transfer_page_tests {
    use axum::{
        Extension, Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::{api::ApiClient, auth::Session, transaction::listing::ListingStore};

    use super::{EditTransferPageState, get_edit_transfer_page};

    async fn spawn_stub_api(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("could not bind stub API listener");
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(&format!("http://{address}")).unwrap()
    }

    fn stub_api() -> Router {
        Router::new()
            .route(
                "/api/transacoes",
                get(|| async {
                    Json(json!({
                        "data": [{
                            "id": 5,
                            "descricao": "Groceries",
                            "valor": "89.90",
                            "tipo": "DESPESA",
                            "data": "2025-07-01",
                            "tags": [{ "id": 2, "nome": "food" }]
                        }]
                    }))
                }),
            )
            .route(
                "/api/tags",
                get(|| async {
                    Json(json!({
                        "data": [
                            { "id": 1, "nome": "salary" },
                            { "id": 2, "nome": "food" }
                        ]
                    }))
                }),
            )
    }

    async fn get_page(state: EditTransferPageState, transaction_id: i64) -> Response {
        get_edit_transfer_page(
            State(state),
            Extension(Session::new(1, "token".to_string())),
            Path(transaction_id),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn form_is_prefilled_with_transaction_and_selected_tags() {
        let state = EditTransferPageState {
            api: spawn_stub_api(stub_api()).await,
            listing: ListingStore::new(),
        };

        let response = get_page(state, 5).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document = Html::parse_document(&String::from_utf8_lossy(&body));

        let form_selector = Selector::parse("form").unwrap();
        let form = document.select(&form_selector).next().unwrap();
        assert_eq!(form.value().attr("hx-put"), Some("/api/transfers/5"));

        let amount_selector = Selector::parse("input[name=amount]").unwrap();
        let amount = document.select(&amount_selector).next().unwrap();
        assert_eq!(amount.value().attr("value"), Some("89.90"));

        let checked_selector = Selector::parse("input[name=tag_ids][checked]").unwrap();
        let checked: Vec<&str> = document
            .select(&checked_selector)
            .filter_map(|input| input.value().attr("value"))
            .collect();
        assert_eq!(checked, vec!["2"]);
    }

    #[tokio::test]
    async fn missing_transaction_is_a_404() {
        let state = EditTransferPageState {
            api: spawn_stub_api(stub_api()).await,
            listing: ListingStore::new(),
        };

        let response = get_page(state, 999).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
