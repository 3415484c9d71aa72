//! Defines the endpoint for updating an existing transfer.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::html;
use time::OffsetDateTime;

use crate::{
    AppState,
    alert::{AlertTemplate, alert_swap},
    api::{ApiClient, update_transaction},
    auth::Session,
    endpoints::{self, format_endpoint},
    html::render,
};

use super::{
    form::{
        FormMethod, TransactionFormConfig, TransactionFormData, TransactionFormErrors,
        load_tag_catalog, transaction_form,
    },
    model::TransactionId,
};

/// The state needed to update a transfer.
#[derive(Debug, Clone)]
pub struct UpdateTransferState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
}

impl FromRef<AppState> for UpdateTransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// A route handler for updating a transfer.
///
/// Edits are validated exactly like creations: a transfer cannot be saved
/// with an empty description, no kind, or a non-positive amount. On success
/// the edit state is cleared by redirecting to the transfers view, whose
/// reload shows the updated row.
pub async fn update_transfer_endpoint(
    State(state): State<UpdateTransferState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let today = OffsetDateTime::now_utc().date();

    let draft = match form.validate(today) {
        Ok(draft) => draft,
        Err(errors) => {
            return render_edit_form(&state.api, transaction_id, &form, &errors, None).await;
        }
    };

    match update_transaction(&state.api, &session, transaction_id, &draft).await {
        Ok(()) => (
            HxRedirect(endpoints::TRANSFERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update transfer {transaction_id}: {error}");
            let alert =
                AlertTemplate::error("Could not save the changes", error.user_details());
            render_edit_form(
                &state.api,
                transaction_id,
                &form,
                &TransactionFormErrors::default(),
                Some(alert),
            )
            .await
        }
    }
}

/// Re-render the edit form, preserving the submitted draft, optionally with
/// an out-of-band alert.
async fn render_edit_form(
    api: &ApiClient,
    transaction_id: TransactionId,
    values: &TransactionFormData,
    errors: &TransactionFormErrors,
    alert: Option<AlertTemplate<'_>>,
) -> Response {
    let catalog = load_tag_catalog(api).await;

    let form = transaction_form(&TransactionFormConfig {
        method: FormMethod::Put,
        action: &format_endpoint(endpoints::TRANSFER, transaction_id),
        submit_label: "Save Changes",
        cancel_url: endpoints::TRANSFERS_VIEW,
        values,
        errors,
        available_tags: &catalog.tags,
        tags_unavailable: catalog.unavailable,
    });

    render(
        StatusCode::OK,
        html! {
            (form)

            @if let Some(alert) = alert {
                (alert_swap(alert))
            }
        },
    )
}

#[cfg(test)]
mod update_transfer_tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Extension, Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::Response,
        routing::{get, put},
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use scraper::{Html, Selector};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        api::ApiClient,
        auth::Session,
        endpoints,
        transaction::{form::TransactionFormData, model::TransactionKind},
    };

    use super::{UpdateTransferState, update_transfer_endpoint};

    async fn spawn_counting_api(updated: Arc<AtomicUsize>, status: StatusCode) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("could not bind stub API listener");
        let address = listener.local_addr().unwrap();

        let router = Router::new()
            .route(
                "/api/transacoes/{id}",
                put(move || {
                    let updated = updated.clone();
                    async move {
                        updated.fetch_add(1, Ordering::SeqCst);
                        status
                    }
                }),
            )
            .route("/api/tags", get(|| async { Json(json!({ "data": [] })) }));

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(&format!("http://{address}")).unwrap()
    }

    fn valid_form() -> TransactionFormData {
        TransactionFormData {
            description: "Rent".to_string(),
            kind: Some(TransactionKind::Expense),
            amount: "1200.00".to_string(),
            date: Some(date!(2025 - 07 - 01)),
            tag_ids: vec![3],
        }
    }

    async fn put_form(state: UpdateTransferState, form: TransactionFormData) -> Response {
        update_transfer_endpoint(
            State(state),
            Extension(Session::new(1, "token".to_string())),
            Path(42),
            Form(form),
        )
        .await
    }

    #[tokio::test]
    async fn valid_edit_updates_and_redirects_to_transfers() {
        let updated = Arc::new(AtomicUsize::new(0));
        let state = UpdateTransferState {
            api: spawn_counting_api(updated.clone(), StatusCode::OK).await,
        };

        let response = put_form(state, valid_form()).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::TRANSFERS_VIEW
        );
        assert_eq!(updated.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn edit_cannot_zero_out_the_amount() {
        let updated = Arc::new(AtomicUsize::new(0));
        let state = UpdateTransferState {
            api: spawn_counting_api(updated.clone(), StatusCode::OK).await,
        };
        let form = TransactionFormData {
            amount: "0".to_string(),
            ..valid_form()
        };

        let response = put_form(state, form).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            updated.load(Ordering::SeqCst),
            0,
            "an edit failing validation must never reach the server"
        );
    }

    #[tokio::test]
    async fn edit_cannot_clear_the_description() {
        let updated = Arc::new(AtomicUsize::new(0));
        let state = UpdateTransferState {
            api: spawn_counting_api(updated.clone(), StatusCode::OK).await,
        };
        let form = TransactionFormData {
            description: " ".to_string(),
            ..valid_form()
        };

        let response = put_form(state, form).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(updated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_update_raises_alert() {
        let updated = Arc::new(AtomicUsize::new(0));
        let state = UpdateTransferState {
            api: spawn_counting_api(updated.clone(), StatusCode::UNPROCESSABLE_ENTITY).await,
        };

        let response = put_form(state, valid_form()).await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document = Html::parse_fragment(&String::from_utf8_lossy(&body));

        let alert_selector = Selector::parse("[hx-swap-oob]").unwrap();
        let alert = document.select(&alert_selector).next().unwrap();
        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not save the changes"));
    }
}
