//! Defines the endpoint for creating a new transfer.

use axum::{
    Extension,
    extract::{FromRef, State},
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
    api::{ApiClient, create_transaction},
    auth::Session,
    endpoints,
    html::render,
};

use super::form::{
    FormMethod, TransactionFormConfig, TransactionFormData, TransactionFormErrors,
    load_tag_catalog, transaction_form,
};

/// The state needed to create a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
}

impl FromRef<AppState> for CreateTransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// A route handler for creating a new transfer.
///
/// Validation failures re-render the form with field errors and never touch
/// the network. A confirmed creation redirects to the transfers view, whose
/// reload is what makes the new transfer visible. A rejected or failed
/// creation keeps the form as submitted and raises a generic alert.
pub async fn create_transfer_endpoint(
    State(state): State<CreateTransferState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let today = OffsetDateTime::now_utc().date();

    let draft = match form.validate(today) {
        Ok(draft) => draft,
        Err(errors) => {
            return render_create_form(&state.api, &form, &errors, None).await;
        }
    };

    match create_transaction(&state.api, &session, &draft).await {
        Ok(()) => (
            HxRedirect(endpoints::TRANSFERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create transfer: {error}");
            let alert =
                AlertTemplate::error("Could not create the transfer", error.user_details());
            render_create_form(&state.api, &form, &TransactionFormErrors::default(), Some(alert))
                .await
        }
    }
}

/// Re-render the create form, preserving the submitted draft, optionally
/// with an out-of-band alert.
async fn render_create_form(
    api: &ApiClient,
    values: &TransactionFormData,
    errors: &TransactionFormErrors,
    alert: Option<AlertTemplate<'_>>,
) -> Response {
    let catalog = load_tag_catalog(api).await;

    let form = transaction_form(&TransactionFormConfig {
        method: FormMethod::Post,
        action: endpoints::TRANSFERS_API,
        submit_label: "Create Transfer",
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
mod create_transfer_tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Extension, Json, Router,
        extract::State,
        http::StatusCode,
        response::Response,
        routing::{get, post},
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

    use super::{CreateTransferState, create_transfer_endpoint};

    /// A stub remote API that counts creation calls.
    async fn spawn_counting_api(created: Arc<AtomicUsize>, status: StatusCode) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("could not bind stub API listener");
        let address = listener.local_addr().unwrap();

        let router = Router::new()
            .route(
                "/api/transacoes",
                post(move || {
                    let created = created.clone();
                    async move {
                        created.fetch_add(1, Ordering::SeqCst);
                        status
                    }
                }),
            )
            .route(
                "/api/tags",
                get(|| async { Json(json!({ "data": [] })) }),
            );

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(&format!("http://{address}")).unwrap()
    }

    fn valid_form() -> TransactionFormData {
        TransactionFormData {
            description: "Salary".to_string(),
            kind: Some(TransactionKind::Income),
            amount: "100.50".to_string(),
            date: Some(date!(2025 - 07 - 14)),
            tag_ids: Vec::new(),
        }
    }

    async fn post_form(state: CreateTransferState, form: TransactionFormData) -> Response {
        create_transfer_endpoint(
            State(state),
            Extension(Session::new(1, "token".to_string())),
            Form(form),
        )
        .await
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn valid_submission_creates_and_redirects_to_transfers() {
        let created = Arc::new(AtomicUsize::new(0));
        let state = CreateTransferState {
            api: spawn_counting_api(created.clone(), StatusCode::CREATED).await,
        };

        let response = post_form(state, valid_form()).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::TRANSFERS_VIEW
        );
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_description_makes_no_network_call() {
        let created = Arc::new(AtomicUsize::new(0));
        let state = CreateTransferState {
            api: spawn_counting_api(created.clone(), StatusCode::CREATED).await,
        };
        let form = TransactionFormData {
            description: String::new(),
            ..valid_form()
        };

        let response = post_form(state, form).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            created.load(Ordering::SeqCst),
            0,
            "a draft failing validation must never reach the server"
        );

        let document = Html::parse_fragment(&body_text(response).await);
        let error_selector = Selector::parse("p.text-red-500").unwrap();
        assert_eq!(document.select(&error_selector).count(), 1);

        // The rest of the draft is preserved for another attempt.
        let amount_selector = Selector::parse("input[name=amount]").unwrap();
        let amount = document.select(&amount_selector).next().unwrap();
        assert_eq!(amount.value().attr("value"), Some("100.50"));
    }

    #[tokio::test]
    async fn rejected_creation_raises_alert_and_keeps_draft() {
        let created = Arc::new(AtomicUsize::new(0));
        let state = CreateTransferState {
            api: spawn_counting_api(created.clone(), StatusCode::INTERNAL_SERVER_ERROR).await,
        };

        let response = post_form(state, valid_form()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(created.load(Ordering::SeqCst), 1);

        let document = Html::parse_fragment(&body_text(response).await);

        let alert_selector = Selector::parse("[hx-swap-oob]").unwrap();
        let alert = document.select(&alert_selector).next().unwrap();
        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not create the transfer"));

        let form_selector = Selector::parse("form").unwrap();
        assert_eq!(document.select(&form_selector).count(), 1);
    }
}
