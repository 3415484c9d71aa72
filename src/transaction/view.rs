//! HTML rendering for the transfers page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TAG_BADGE_STYLE, base, format_brl, format_date,
    },
    navigation::NavBar,
    transaction::{
        filter::{FILTER_ALL, ListSummary, TagFilter},
        model::{Transaction, TransactionKind},
    },
};

/// The max number of graphemes to display in the transfer table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// One rendered table row.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct TransferRow {
    /// The description, truncated for display.
    pub(crate) description: String,
    /// The untruncated description, used in the delete confirmation.
    pub(crate) full_description: String,
    /// Whether the transfer is an expense or income.
    pub(crate) kind: TransactionKind,
    /// The amount formatted as currency.
    pub(crate) amount_display: String,
    /// The date formatted day first.
    pub(crate) date_display: String,
    /// The names of the attached tags.
    pub(crate) tag_names: Vec<String>,
    /// The path to the edit page for this transfer.
    pub(crate) edit_url: String,
    /// The API path to delete this transfer.
    pub(crate) delete_url: String,
}

impl TransferRow {
    pub(crate) fn new_from_transaction(transaction: &Transaction) -> Self {
        let description = truncate_description(&transaction.description);

        Self {
            description,
            full_description: transaction.description.clone(),
            kind: transaction.kind,
            amount_display: format_brl(transaction.amount.value()),
            date_display: format_date(transaction.date),
            tag_names: transaction.tags.iter().map(|tag| tag.name.clone()).collect(),
            edit_url: format_endpoint(endpoints::EDIT_TRANSFER_VIEW, transaction.id),
            delete_url: format_endpoint(endpoints::TRANSFER, transaction.id),
        }
    }
}

fn truncate_description(description: &str) -> String {
    let graphemes: Vec<&str> = description.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_string()
    } else {
        let mut truncated: String = graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat();
        truncated.push('…');
        truncated
    }
}

/// Everything the transfers page needs to render.
pub(crate) struct TransfersViewModel {
    /// The rows passing the current filter, in fetch order.
    pub(crate) rows: Vec<TransferRow>,
    /// The distinct tag names for the filter control.
    pub(crate) tag_names: Vec<String>,
    /// The currently selected filter.
    pub(crate) filter: TagFilter,
    /// Shown and total counts.
    pub(crate) summary: ListSummary,
    /// The signed total over the filtered rows, formatted as currency.
    pub(crate) total_display: String,
    /// Whether the latest fetch failed and stale data (or nothing) is
    /// being shown.
    pub(crate) fetch_failed: bool,
}

fn kind_badge(kind: TransactionKind) -> Markup {
    let style = match kind {
        TransactionKind::Expense => {
            "inline-flex items-center px-2.5 py-0.5 rounded-full text-xs \
            font-medium bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300"
        }
        TransactionKind::Income => {
            "inline-flex items-center px-2.5 py-0.5 rounded-full text-xs \
            font-medium bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300"
        }
    };

    html!( span class=(style) { (kind) } )
}

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "font-semibold text-red-700 dark:text-red-300",
        TransactionKind::Income => "font-semibold text-green-700 dark:text-green-300",
    }
}

fn filter_control(tag_names: &[String], filter: &TagFilter) -> Markup {
    html! {
        form method="get" action=(endpoints::TRANSFERS_VIEW) class="flex items-center gap-2"
        {
            label for="tag" class="text-sm" { "Filter by tag" }

            select
                name="tag"
                id="tag"
                onchange="this.form.submit()"
                class="p-2 rounded text-sm bg-gray-50 dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
            {
                option value=(FILTER_ALL) selected[*filter == TagFilter::All] { "All tags" }

                @for name in tag_names {
                    option
                        value=(name)
                        selected[*filter == TagFilter::Tag(name.clone())]
                    {
                        (name)
                    }
                }
            }
        }
    }
}

fn transfer_row_view(row: &TransferRow) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (row.description) }

            td class=(TABLE_CELL_STYLE) { (kind_badge(row.kind)) }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(amount_class(row.kind)) { (row.amount_display) }
            }

            td class=(TABLE_CELL_STYLE) { (row.date_display) }

            td class=(TABLE_CELL_STYLE)
            {
                @if row.tag_names.is_empty() {
                    span class="text-gray-400" { "No tags" }
                } @else {
                    div class="flex flex-wrap gap-1"
                    {
                        @for name in &row.tag_names {
                            span class=(TAG_BADGE_STYLE) { (name) }
                        }
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(row.edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(row.delete_url)
                        hx-confirm=(format!(
                            "Delete the transfer \"{}\"? This cannot be undone.",
                            row.full_description
                        ))
                        hx-swap="none"
                        hx-disabled-elt="this"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn fetch_error_banner(filter: &TagFilter) -> Markup {
    let retry_url = format!(
        "{}?tag={}",
        endpoints::TRANSFERS_VIEW,
        filter.as_query_value()
    );

    html! {
        div
            data-fetch-failed="true"
            role="alert"
            class="flex items-center justify-between gap-4 p-4 mb-4 rounded border \
                border-red-300 bg-red-50 text-red-800 dark:bg-gray-800 \
                dark:border-red-800 dark:text-red-300"
        {
            span { "Your transfers could not be loaded. The list below may be out of date." }

            a href=(retry_url) class=(LINK_STYLE) { "Retry" }
        }
    }
}

/// Render the full transfers page.
pub(crate) fn transfers_view(model: &TransfersViewModel) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSFERS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl" id="transfers-content"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Transfers" }

                    @if !model.tag_names.is_empty() {
                        (filter_control(&model.tag_names, &model.filter))
                    }

                    a href=(endpoints::NEW_TRANSFER_VIEW) class=(LINK_STYLE)
                    {
                        "Create Transfer"
                    }
                }

                @if model.fetch_failed {
                    (fetch_error_banner(&model.filter))
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Tags" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in &model.rows {
                                (transfer_row_view(row))
                            }

                            @if model.rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        data-empty-state="true"
                                        class="px-6 py-8 text-center text-gray-500"
                                    {
                                        "No transfers found"
                                    }
                                }
                            }
                        }
                    }
                }

                footer
                    id="transfer-summary"
                    class="flex justify-between items-center text-sm text-gray-600 dark:text-gray-400"
                {
                    span
                    {
                        "Showing " (model.summary.shown) " of " (model.summary.total) " transfers"
                    }

                    span { "Total: " (model.total_display) }
                }
            }
        }
    };

    base("Transfers", &content)
}
