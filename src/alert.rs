//! Alert fragments for displaying success and error messages to users.
//!
//! The base layout renders an empty, fixed [alert container](alert_container);
//! mutation endpoints answer failures with an [out-of-band swap](alert_swap)
//! of that container, so the alert appears without disturbing whatever
//! element triggered the request.

use maud::{Markup, html};

/// The id of the fixed container alerts are swapped into.
pub const ALERT_CONTAINER_ID: &str = "alert-container";

const ALERT_CONTAINER_STYLE: &str = "w-full max-w-md px-4";
const ALERT_CONTAINER_POSITION: &str =
    "position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;";

/// The fixed alert container rendered (empty) by the base layout.
pub fn alert_container() -> Markup {
    html! {
        div
            id=(ALERT_CONTAINER_ID)
            class=(ALERT_CONTAINER_STYLE)
            style=(ALERT_CONTAINER_POSITION)
        {}
    }
}

/// An out-of-band replacement of the alert container holding `alert`.
///
/// Include this in any 2xx htmx response; elements that do not want their
/// own content swapped should use `hx-swap="none"`, which still processes
/// out-of-band content.
pub fn alert_swap(alert: AlertTemplate) -> Markup {
    html! {
        div
            id=(ALERT_CONTAINER_ID)
            hx-swap-oob="true"
            class=(ALERT_CONTAINER_STYLE)
            style=(ALERT_CONTAINER_POSITION)
        {
            (alert.into_markup())
        }
    }
}

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
#[derive(Debug, Clone)]
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    /// Render the alert as a dismissible card.
    pub fn into_markup(self) -> Markup {
        let (container_style, icon) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 p-4 rounded border border-green-300 \
                bg-green-50 text-green-800 dark:bg-gray-800 \
                dark:border-green-800 dark:text-green-300",
                "✓",
            ),
            AlertType::Error => (
                "flex items-start gap-3 p-4 rounded border border-red-300 \
                bg-red-50 text-red-800 dark:bg-gray-800 dark:border-red-800 \
                dark:text-red-300",
                "!",
            ),
        };

        html! {
            div class=(container_style) role="alert"
            {
                span aria-hidden="true" class="font-bold" { (icon) }

                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold cursor-pointer"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::AlertTemplate;

    #[test]
    fn error_alert_renders_message_and_details() {
        let markup = AlertTemplate::error("Could not delete the transfer", "Try again.")
            .into_markup()
            .into_string();
        let document = Html::parse_fragment(&markup);

        let alert_selector = Selector::parse("[role=alert]").unwrap();
        let alert = document.select(&alert_selector).next().unwrap();
        let text = alert.text().collect::<String>();

        assert!(text.contains("Could not delete the transfer"));
        assert!(text.contains("Try again."));
    }

    #[test]
    fn details_paragraph_is_omitted_when_empty() {
        let markup = AlertTemplate::success("Saved", "").into_markup().into_string();
        let document = Html::parse_fragment(&markup);

        let p_selector = Selector::parse("p").unwrap();
        assert_eq!(document.select(&p_selector).count(), 1);
    }
}
