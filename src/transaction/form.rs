//! The shared transfer form: raw form data, validation, and rendering.
//!
//! The create and edit pages render the same form and the same tag picker;
//! only the action URL, verb, and prefilled values differ. Validation is
//! applied on both paths: a transfer can no more be edited into an empty
//! description or a non-positive amount than it can be created with one.

use std::collections::HashSet;

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    api::{ApiClient, fetch_tags},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    transaction::model::{Amount, Tag, TagId, TransactionDraft, TransactionKind},
};

/// The raw transfer form data, exactly as submitted.
///
/// This is the transient draft state: it exists while a form is open and is
/// discarded when the submission settles or the user cancels. Failed
/// validation re-renders the form from this value so nothing the user typed
/// is lost.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionFormData {
    /// Text detailing the transfer.
    #[serde(default)]
    pub description: String,
    /// The selected kind, if any.
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    /// The amount as typed, still unparsed.
    #[serde(default)]
    pub amount: String,
    /// The date the transfer happened.
    #[serde(default)]
    pub date: Option<Date>,
    /// The ids of the checked tags.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

impl TransactionFormData {
    /// An empty draft dated `today`, for the create page.
    pub fn empty(today: Date) -> Self {
        Self {
            description: String::new(),
            kind: None,
            amount: String::new(),
            date: Some(today),
            tag_ids: Vec::new(),
        }
    }

    /// The set of checked tag ids, for the tag picker.
    pub fn selected_tag_ids(&self) -> HashSet<TagId> {
        self.tag_ids.iter().copied().collect()
    }

    /// Validate the draft into a submittable [TransactionDraft].
    ///
    /// The checks mirror what the remote API ultimately requires: a
    /// non-empty description, a selected kind, and an amount that parses
    /// to a strictly positive number. A missing date falls back to
    /// `today`.
    ///
    /// # Errors
    ///
    /// Returns field-level error messages for re-rendering the form. No
    /// network call may be made when this fails.
    pub fn validate(&self, today: Date) -> Result<TransactionDraft, TransactionFormErrors> {
        let mut errors = TransactionFormErrors::default();

        let description = self.description.trim();
        if description.is_empty() {
            errors.description = Some("A description is required.");
        }

        if self.kind.is_none() {
            errors.kind = Some("Select a type.");
        }

        let amount = match Amount::parse(&self.amount) {
            Ok(amount) if amount.is_positive() => Some(amount),
            _ => {
                errors.amount = Some("The amount must be a number greater than zero.");
                None
            }
        };

        let (Some(kind), Some(amount)) = (self.kind, amount) else {
            return Err(errors);
        };
        if errors.is_any() {
            return Err(errors);
        }

        let mut seen = HashSet::new();
        let tag_ids = self
            .tag_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        Ok(TransactionDraft {
            description: description.to_string(),
            kind,
            amount,
            date: self.date.unwrap_or(today),
            tag_ids,
        })
    }
}

/// Field-level validation error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionFormErrors {
    /// The problem with the description, if any.
    pub description: Option<&'static str>,
    /// The problem with the kind, if any.
    pub kind: Option<&'static str>,
    /// The problem with the amount, if any.
    pub amount: Option<&'static str>,
}

impl TransactionFormErrors {
    /// Whether any field failed validation.
    pub fn is_any(&self) -> bool {
        self.description.is_some() || self.kind.is_some() || self.amount.is_some()
    }
}

/// Which verb the form submits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    /// `hx-post`, for creation.
    Post,
    /// `hx-put`, for editing.
    Put,
}

/// Everything needed to render the transfer form.
pub struct TransactionFormConfig<'a> {
    /// Whether the form creates or updates.
    pub method: FormMethod,
    /// The endpoint the form submits to.
    pub action: &'a str,
    /// The label on the submit button.
    pub submit_label: &'a str,
    /// Where the cancel link goes.
    pub cancel_url: &'a str,
    /// The values to prefill.
    pub values: &'a TransactionFormData,
    /// Field errors from a failed validation, if any.
    pub errors: &'a TransactionFormErrors,
    /// The tag catalog for the picker.
    pub available_tags: &'a [Tag],
    /// Whether the tag catalog fetch failed.
    pub tags_unavailable: bool,
}

fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class=(FORM_ERROR_STYLE) { (message) }
        }
    }
}

/// Render the transfer form.
///
/// The form swaps itself with whatever the endpoint answers: itself with
/// field errors after a failed validation, or itself plus an out-of-band
/// alert after a remote failure. The submit button is disabled while the
/// request is in flight; that convention is the only double-submit
/// protection.
pub fn transaction_form(config: &TransactionFormConfig) -> Markup {
    let values = config.values;
    let errors = config.errors;
    let selected_tags = values.selected_tag_ids();
    let kind_options = [TransactionKind::Expense, TransactionKind::Income];

    html! {
        form
            hx-post=[matches!(config.method, FormMethod::Post).then_some(config.action)]
            hx-put=[matches!(config.method, FormMethod::Put).then_some(config.action)]
            hx-target="this"
            hx-swap="outerHTML"
            hx-disabled-elt="find button[type=submit]"
            class="space-y-4 md:space-y-6 w-full max-w-md"
        {
            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="What was this transfer for?"
                    value=(values.description)
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.description))
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.kind.is_none()] { "Select the type" }

                    @for kind in kind_options {
                        option
                            value=(kind.wire_value())
                            selected[values.kind == Some(kind)]
                        {
                            (kind)
                        }
                    }
                }

                (field_error(errors.kind))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    value=(values.amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.amount))
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=[values.date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (tag_picker(config.available_tags, &selected_tags, config.tags_unavailable))

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    (loading_spinner())
                    (config.submit_label)
                }

                a href=(config.cancel_url) class=(LINK_STYLE) { "Cancel" }
            }
        }
    }
}

/// The tag catalog as the form pages see it.
pub struct TagCatalog {
    /// The fetched tags, empty when the fetch failed.
    pub tags: Vec<Tag>,
    /// Whether the catalog fetch failed.
    pub unavailable: bool,
}

/// Fetch the tag catalog for a form page.
///
/// A failed fetch is not fatal: the form renders a notice and stays
/// submittable without tags, so the error is logged and absorbed here.
pub async fn load_tag_catalog(api: &ApiClient) -> TagCatalog {
    match fetch_tags(api).await {
        Ok(tags) => TagCatalog {
            tags,
            unavailable: false,
        },
        Err(error) => {
            tracing::warn!("could not load the tag catalog: {error}");
            TagCatalog {
                tags: Vec::new(),
                unavailable: true,
            }
        }
    }
}

/// The page skeleton shared by the create and edit views: navigation bar,
/// heading, and the form itself.
pub fn transfer_form_page(title: &str, active_endpoint: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-md"
            {
                h1 class="text-xl font-bold" { (title) }

                (form)
            }
        }
    };

    base(title, &content)
}

/// The tag selection sub-component shared by the create and edit forms.
///
/// Renders one checkbox per catalog tag, checked for ids in `selected`.
/// Tags are optional: with an empty or unavailable catalog the form is
/// still submittable.
pub fn tag_picker(available_tags: &[Tag], selected: &HashSet<TagId>, unavailable: bool) -> Markup {
    html! {
        div
        {
            span class=(FORM_LABEL_STYLE) { "Tags (optional)" }

            @if unavailable {
                p
                    data-tags-unavailable="true"
                    class="text-sm text-gray-500 p-2 border rounded-md border-gray-300 dark:border-gray-600"
                {
                    "Tags could not be loaded. You can still save the transfer and tag it later."
                }
            } @else if available_tags.is_empty() {
                p class="text-sm text-gray-500 p-2 border rounded-md border-gray-300 dark:border-gray-600"
                {
                    "No tags available"
                }
            } @else {
                div class="max-h-32 overflow-y-auto border rounded-md p-2 border-gray-300 dark:border-gray-600"
                {
                    @for tag in available_tags {
                        div class="flex items-center gap-2 py-1"
                        {
                            input
                                type="checkbox"
                                name="tag_ids"
                                id=(format!("tag-{}", tag.id))
                                value=(tag.id)
                                checked[selected.contains(&tag.id)];

                            label for=(format!("tag-{}", tag.id)) class="text-sm" { (tag.name) }
                        }
                    }
                }
            }
        }
    }
}
