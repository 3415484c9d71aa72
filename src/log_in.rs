//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level session and cookie logic.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    api::{ApiClient, log_in},
    auth::set_session_cookies,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        link, loading_spinner, log_in_register, render,
    },
};

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The client for the remote transfers API.
    pub api: ApiClient,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
///
/// The email and password are stored as plain strings. There is no need for
/// validation here since the remote API verifies them.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    #[serde(default)]
    pub email: String,
    /// Password entered during log-in.
    #[serde(default)]
    pub password: String,
}

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-disabled-elt="find button[type=submit]"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    name="email"
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    value=(email)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    name="password"
                    id="password"
                    type="password"
                    placeholder="••••••••"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error_message) = error_message {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                (loading_spinner())
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? "
                (link(endpoints::REGISTER_VIEW, "Sign up"))
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    render(
        StatusCode::OK,
        base(
            "Log In",
            &log_in_register("Log in to your account", &log_in_form("", None)),
        ),
    )
}

/// Handler for log-in requests via the POST method.
///
/// On success the remote API returns the session token and user record,
/// both of which are persisted in the private cookie pair, and the client
/// is redirected to the transfers page. On any failure the form is returned
/// with a generic invalid-credentials message; the detail is only logged.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let auth = match log_in(&state.api, &user_data.email, &user_data.password).await {
        Ok(auth) => auth,
        Err(error) => {
            tracing::debug!("log-in failed: {error}");
            return render(
                StatusCode::OK,
                log_in_form(&user_data.email, Some(INVALID_CREDENTIALS_ERROR_MSG)),
            );
        }
    };

    let jar = set_session_cookies(jar, &auth.token, &auth.user_json);

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::TRANSFERS_VIEW.to_owned()),
        jar,
    )
        .into_response()
}

#[cfg(test)]
mod log_in_tests {
    use axum::{Router, http::StatusCode, response::IntoResponse, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use scraper::{Html, Selector};
    use serde_json::json;
    use sha2::{Digest, Sha512};

    use crate::{
        api::ApiClient,
        auth::{COOKIE_TOKEN, COOKIE_USER},
        endpoints,
    };

    use super::{INVALID_CREDENTIALS_ERROR_MSG, LogInState, get_log_in_page, post_log_in};

    async fn spawn_auth_stub(succeed: bool) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("could not bind stub API listener");
        let address = listener.local_addr().unwrap();

        let router = Router::new().route(
            "/api/auth",
            post(move || async move {
                if succeed {
                    axum::Json(json!({
                        "token": "opaque-token",
                        "user": { "id": 7, "name": "Ana" }
                    }))
                    .into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(&format!("http://{address}")).unwrap()
    }

    async fn log_in_server(succeed: bool) -> TestServer {
        let state = LogInState {
            cookie_key: Key::from(&Sha512::digest("nafstenoas")),
            api: spawn_auth_stub(succeed).await,
        };
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document = Html::parse_document(&String::from_utf8_lossy(&body));

        let form_selector = Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());
        let form = forms.first().unwrap();
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::LOG_IN_API),
        );

        for selector in ["input[type=email]", "input[type=password]", "button[type=submit]"] {
            let selector = Selector::parse(selector).unwrap();
            assert_eq!(form.select(&selector).count(), 1);
        }
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = log_in_server(true).await;

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "ana@example.com"), ("password", "hunter2")])
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::TRANSFERS_VIEW);

        let jar = response.cookies();
        assert!(
            jar.get(COOKIE_TOKEN).is_some(),
            "expected the token cookie to be set by a successful log-in"
        );
        assert!(
            jar.get(COOKIE_USER).is_some(),
            "expected the user cookie to be set by a successful log-in"
        );
    }

    #[tokio::test]
    async fn rejected_credentials_render_generic_error() {
        let server = log_in_server(false).await;

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "ana@example.com"), ("password", "wrong")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let document = Html::parse_fragment(&response.text());

        let error_selector = Selector::parse("p.text-red-500").unwrap();
        let error = document.select(&error_selector).next().unwrap();
        assert_eq!(
            error.text().collect::<String>(),
            INVALID_CREDENTIALS_ERROR_MSG
        );

        // The typed email survives the round trip.
        let email_selector = Selector::parse("input[name=email]").unwrap();
        let email = document.select(&email_selector).next().unwrap();
        assert_eq!(email.value().attr("value"), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn unreachable_auth_service_renders_generic_error() {
        let state = LogInState {
            cookie_key: Key::from(&Sha512::digest("nafstenoas")),
            api: ApiClient::new("http://127.0.0.1:1").unwrap(),
        };
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", "ana@example.com"), ("password", "hunter2")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains(INVALID_CREDENTIALS_ERROR_MSG));
    }
}
