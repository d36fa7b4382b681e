//! Defines the route handler for the page that displays transactions as a table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    pagination::{PaginationConfig, create_pagination_indicators, pagination_nav},
    transaction::{
        TransactionFilter, TransactionKind, TransactionWithCategory,
        core::{count_transactions_matching, query_transactions},
    },
};

/// The query parameters for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Search term matched against descriptions and category names.
    #[serde(default)]
    pub q: Option<String>,
    /// "income" or "expense"; anything else shows all transactions.
    #[serde(default)]
    pub kind: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u64>,
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render an overview of the user's transactions with search and filter
/// controls.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());
    let kind_filter = match query.kind.as_deref() {
        Some("income") => Some(TransactionKind::Income),
        Some("expense") => Some(TransactionKind::Expense),
        _ => None,
    };
    let filter = TransactionFilter {
        search,
        kind: kind_filter,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let page_size = state.pagination_config.default_page_size;
    let match_count = count_transactions_matching(filter, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;
    let page_count = match_count.div_ceil(page_size).max(1);
    let page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .clamp(1, page_count);

    let transactions = query_transactions(filter, page, page_size, &connection)
        .inspect_err(|error| tracing::error!("could not query transactions: {error}"))?;

    Ok(transactions_view(
        &transactions,
        search,
        kind_filter,
        page,
        page_count,
        state.pagination_config.max_pages,
    )
    .into_response())
}

/// Build the page URL for the given search, kind filter and page number.
fn transactions_url(search: Option<&str>, kind: Option<TransactionKind>, page: u64) -> String {
    let mut url = format!("{}?page={page}", endpoints::TRANSACTIONS_VIEW);

    if let Some(term) = search {
        // Keep it simple: the search box only produces text, so spaces are the
        // only characters needing escaping in practice.
        url.push_str("&q=");
        url.push_str(&term.replace(' ', "+"));
    }

    if let Some(kind) = kind {
        url.push_str("&kind=");
        url.push_str(kind.as_str());
    }

    url
}

fn transactions_view(
    transactions: &[TransactionWithCategory],
    search: Option<&str>,
    kind_filter: Option<TransactionKind>,
    page: u64,
    page_count: u64,
    max_pages: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let indicators = create_pagination_indicators(page, page_count, max_pages);

    let filter_button = |label: &str, target: Option<TransactionKind>| -> Markup {
        let style = if target == kind_filter {
            "px-3 py-1.5 text-sm font-medium text-white bg-blue-600 rounded"
        } else {
            "px-3 py-1.5 text-sm font-medium text-gray-900 bg-white border \
            border-gray-200 rounded hover:bg-gray-100 dark:bg-gray-800 \
            dark:text-gray-400 dark:border-gray-600 dark:hover:bg-gray-700"
        };

        html!( a href=(transactions_url(search, target, 1)) class=(style) { (label) } )
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h2 class="text-xl font-bold" { "Transaction History" }
                    span class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Manage your financial activities"
                    }
                }

                div class="flex flex-col sm:flex-row gap-4 mb-4"
                {
                    form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="flex-1 flex gap-2"
                    {
                        input
                            type="search"
                            name="q"
                            value=[search]
                            placeholder="Search transactions..."
                            class=(FORM_TEXT_INPUT_STYLE);

                        @if let Some(kind) = kind_filter {
                            input type="hidden" name="kind" value=(kind);
                        }

                        button
                            type="submit"
                            class="px-3 py-1.5 text-sm font-medium text-white bg-blue-600 rounded"
                        {
                            "Search"
                        }
                    }

                    div class="flex gap-2"
                    {
                        (filter_button("All", None))
                        (filter_button("Income", Some(TransactionKind::Income)))
                        (filter_button("Expenses", Some(TransactionKind::Expense)))
                    }
                }

                @if transactions.is_empty() {
                    div class="text-center py-8 text-gray-600 dark:text-gray-400"
                    {
                        @if search.is_some() || kind_filter.is_some() {
                            p { "No transactions match your search" }
                            p class="text-sm" { "Try adjusting your filters" }
                        } @else {
                            p { "No transactions yet" }
                            p class="text-sm"
                            {
                                "Add your first transaction with the smart entry on the "
                                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "dashboard" }
                                "."
                            }
                        }
                    }
                } @else {
                    div class="relative overflow-x-auto shadow-md rounded-lg"
                    {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for row in transactions {
                                    (transaction_row(row))
                                }
                            }
                        }
                    }

                    @if page_count > 1 {
                        (pagination_nav(&indicators, |page| transactions_url(search, kind_filter, page)))
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

fn transaction_row(row: &TransactionWithCategory) -> Markup {
    let transaction = &row.transaction;
    let (sign, amount_style) = match transaction.kind {
        TransactionKind::Income => ("+", "text-green-600 dark:text-green-400 font-semibold"),
        TransactionKind::Expense => ("-", "text-red-600 dark:text-red-400 font-semibold"),
    };
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                span class=(amount_style) { (sign) (format_currency(transaction.amount)) }
            }

            td class=(TABLE_CELL_STYLE) { (transaction.date) }

            td class=(TABLE_CELL_STYLE)
            {
                (transaction.description)

                @if transaction.auto_parsed {
                    span
                        class="ms-2 px-1.5 py-0.5 text-xs font-semibold text-purple-800
                            bg-purple-100 rounded dark:bg-purple-900 dark:text-purple-300"
                        title=(confidence_tooltip(transaction.confidence))
                    {
                        "AI"
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                @match &row.category {
                    Some(category) => {
                        span class=(CATEGORY_BADGE_STYLE)
                        {
                            (category.icon) " " (category.name)
                        }
                    }
                    None => {
                        span class="text-gray-400" { "—" }
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-3"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        hx-confirm="Delete this transaction?"
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

fn confidence_tooltip(confidence: Option<f64>) -> String {
    match confidence {
        Some(confidence) => format!("Parsed from text ({:.0}% confidence)", confidence * 100.0),
        None => "Parsed from text".to_owned(),
    }
}
