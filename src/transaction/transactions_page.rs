//! Defines the route handler for the page that displays transfers as a table.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    AppState,
    api::ApiClient,
    auth::Session,
    html::{format_brl, render},
};

use super::{
    filter::{ListSummary, TagFilter, distinct_tag_names, filter_transactions, signed_total},
    listing::{FetchOutcome, ListingStore, refresh},
    model::Transaction,
    view::{TransferRow, TransfersViewModel, transfers_view},
};

/// The state needed for the transfers page.
#[derive(Debug, Clone)]
pub struct TransfersPageState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
    /// The per-user snapshot of fetched transfers.
    pub listing: ListingStore,
}

impl FromRef<AppState> for TransfersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            listing: state.listing.clone(),
        }
    }
}

/// The query parameters accepted by the transfers page.
#[derive(Debug, Deserialize)]
pub struct TransfersQuery {
    /// The selected tag name, or the sentinel meaning "show all".
    pub tag: Option<String>,
}

/// Render an overview of the user's transfers.
///
/// Every visit performs a full reload of the list: this page is the refresh
/// step that every confirmed mutation redirects back to. A failed reload
/// falls back to the previous snapshot, if any, plus an error banner with a
/// retry affordance.
pub async fn get_transfers_page(
    State(state): State<TransfersPageState>,
    Extension(session): Extension<Session>,
    Query(query): Query<TransfersQuery>,
) -> Response {
    let outcome = refresh(&state.api, &state.listing, &session).await;

    let (transactions, fetch_failed) = match outcome {
        FetchOutcome::Loaded(transactions) => (transactions, false),
        FetchOutcome::Empty => (Vec::new(), false),
        FetchOutcome::Failed { .. } => (
            state.listing.snapshot(session.user_id()).unwrap_or_default(),
            true,
        ),
    };

    let filter = TagFilter::from_query(query.tag.as_deref());
    let model = build_view_model(&transactions, filter, fetch_failed);

    render(StatusCode::OK, transfers_view(&model))
}

fn build_view_model(
    transactions: &[Transaction],
    filter: TagFilter,
    fetch_failed: bool,
) -> TransfersViewModel {
    let filtered = filter_transactions(transactions, &filter);
    let summary = ListSummary::new(&filtered, transactions);
    let total_display = format_brl(signed_total(filtered.iter().copied()));
    let rows = filtered
        .iter()
        .map(|transaction| TransferRow::new_from_transaction(transaction))
        .collect();

    TransfersViewModel {
        rows,
        tag_names: distinct_tag_names(transactions),
        filter,
        summary,
        total_display,
        fetch_failed,
    }
}

#[cfg(test)]
mod transfers_page_tests {
    use axum::{
        Extension, Json, Router,
        extract::{Query, State},
        http::StatusCode,
        response::Response,
        routing::get,
    };
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::{
        api::ApiClient,
        auth::Session,
        transaction::listing::ListingStore,
    };

    use super::{TransfersPageState, TransfersQuery, get_transfers_page};

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

    fn stub_transactions() -> Router {
        Router::new().route(
            "/api/transacoes",
            get(|| async {
                Json(json!({
                    "data": [
                        {
                            "id": 1,
                            "descricao": "Salary",
                            "valor": "50.00",
                            "tipo": "RECEITA",
                            "data": "2025-07-01",
                            "tags": [{ "id": 1, "nome": "salary" }]
                        },
                        {
                            "id": 2,
                            "descricao": "Groceries",
                            "valor": "20.00",
                            "tipo": "DESPESA",
                            "data": "2025-07-02",
                            "tags": [{ "id": 2, "nome": "food" }]
                        }
                    ]
                }))
            }),
        )
    }

    async fn get_page(state: TransfersPageState, tag: Option<&str>) -> Response {
        get_transfers_page(
            State(state),
            Extension(Session::new(1, "token".to_string())),
            Query(TransfersQuery {
                tag: tag.map(str::to_string),
            }),
        )
        .await
    }

    async fn parse_body(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let document = Html::parse_document(&text);
        assert!(
            document.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            document.errors
        );
        document
    }

    #[tokio::test]
    async fn page_shows_all_transfers_and_signed_total() {
        let state = TransfersPageState {
            api: spawn_stub_api(stub_transactions()).await,
            listing: ListingStore::new(),
        };

        let response = get_page(state, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_body(response).await;

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(document.select(&row_selector).count(), 2);

        let summary_selector = Selector::parse("#transfer-summary").unwrap();
        let summary = document.select(&summary_selector).next().unwrap();
        let text = summary.text().collect::<String>();
        assert!(text.contains("Showing 2 of 2 transfers"), "got: {text}");
        assert!(text.contains("R$30.00"), "got: {text}");
    }

    #[tokio::test]
    async fn tag_query_filters_the_table() {
        let state = TransfersPageState {
            api: spawn_stub_api(stub_transactions()).await,
            listing: ListingStore::new(),
        };

        let document = parse_body(get_page(state, Some("food")).await).await;

        let cell_selector = Selector::parse("tbody td").unwrap();
        let body_text: String = document
            .select(&cell_selector)
            .flat_map(|cell| cell.text())
            .collect();
        assert!(body_text.contains("Groceries"));
        assert!(!body_text.contains("Salary"));

        let summary_selector = Selector::parse("#transfer-summary").unwrap();
        let summary = document.select(&summary_selector).next().unwrap();
        let text = summary.text().collect::<String>();
        assert!(text.contains("Showing 1 of 2 transfers"), "got: {text}");
        assert!(text.contains("-R$20.00"), "got: {text}");
    }

    #[tokio::test]
    async fn empty_list_renders_empty_state() {
        let stub = Router::new().route(
            "/api/transacoes",
            get(|| async { Json(json!({ "data": [] })) }),
        );
        let state = TransfersPageState {
            api: spawn_stub_api(stub).await,
            listing: ListingStore::new(),
        };

        let document = parse_body(get_page(state, None).await).await;

        let empty_selector = Selector::parse("[data-empty-state]").unwrap();
        assert_eq!(document.select(&empty_selector).count(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_renders_banner_and_stale_snapshot() {
        let api = spawn_stub_api(stub_transactions()).await;
        let listing = ListingStore::new();
        let state = TransfersPageState {
            api,
            listing: listing.clone(),
        };

        // First visit succeeds and seeds the snapshot.
        let document = parse_body(get_page(state, None).await).await;
        let banner_selector = Selector::parse("[data-fetch-failed]").unwrap();
        assert_eq!(document.select(&banner_selector).count(), 0);

        // Second visit hits a dead API and falls back to the snapshot.
        let broken_state = TransfersPageState {
            api: ApiClient::new("http://127.0.0.1:1").unwrap(),
            listing,
        };
        let document = parse_body(get_page(broken_state, None).await).await;

        assert_eq!(document.select(&banner_selector).count(), 1);
        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(
            document.select(&row_selector).count(),
            2,
            "the previous snapshot should still be shown"
        );
    }
}
