//! The registration page and the endpoint that creates accounts on the
//! remote API.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    api::{ApiClient, sign_up},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        link, loading_spinner, log_in_register, render,
    },
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The client for the remote transfers API.
    pub api: ApiClient,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterFormData {
    /// The name entered during registration.
    #[serde(default)]
    pub name: String,
    /// The email entered during registration.
    #[serde(default)]
    pub email: String,
    /// The password entered during registration.
    #[serde(default)]
    pub password: String,
}

fn register_form(form: &RegisterFormData, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-target="this"
            hx-swap="outerHTML"
            hx-disabled-elt="find button[type=submit]"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    name="name"
                    id="name"
                    type="text"
                    placeholder="Your name"
                    value=(form.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    name="email"
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    value=(form.email)
                    required
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
            }

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                (loading_spinner())
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = register_form(
        &RegisterFormData {
            name: String::new(),
            email: String::new(),
            password: String::new(),
        },
        None,
    );

    render(
        StatusCode::OK,
        base("Register", &log_in_register("Create your account", &form)),
    )
}

const REGISTRATION_FAILED_ERROR_MSG: &str =
    "Registration failed. Check the details and try again.";

/// Handler for registration requests via the POST method.
///
/// Presence of all three fields is the only client-side check. The account
/// is created by the remote API, which answers 201 on success; the client
/// is then redirected to the log-in page. Any other outcome re-renders the
/// form with a generic failure message, keeping the name and email.
pub async fn register_user(
    State(state): State<RegisterState>,
    Form(form): Form<RegisterFormData>,
) -> Response {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
        return render(
            StatusCode::OK,
            register_form(&form, Some("Fill in your name, email, and password.")),
        );
    }

    match sign_up(&state.api, form.name.trim(), form.email.trim(), &form.password).await {
        Ok(()) => (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not register user: {error}");
            render(
                StatusCode::OK,
                register_form(&form, Some(REGISTRATION_FAILED_ERROR_MSG)),
            )
        }
    }
}
