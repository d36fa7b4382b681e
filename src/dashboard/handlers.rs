//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    dashboard::{
        aggregation::{calculate_totals, daily_flows, expenses_by_category},
        cards::summary_cards_view,
        charts::{
            DashboardChart, category_pie_chart, charts_script, charts_view, daily_flow_chart,
        },
    },
    html::{
        CATEGORY_BADGE_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, format_currency, link,
    },
    interpreter::smart_entry_form,
    navigation::NavBar,
    transaction::{
        TransactionFilter, TransactionKind, TransactionWithCategory, core::query_transactions,
    },
};

/// How many of the latest transactions feed the dashboard summaries.
const SUMMARY_TRANSACTION_LIMIT: u64 = 50;

/// How many transactions to show in the recent activity list.
const RECENT_LIST_LIMIT: usize = 10;

/// How many days the income/expense trend chart covers.
const TREND_CHART_DAYS: usize = 7;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the user's data and the smart entry
/// form.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    // Summaries cover the latest transactions, like the transaction list.
    let transactions = query_transactions(
        TransactionFilter::default(),
        1,
        SUMMARY_TRANSACTION_LIMIT,
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get recent transactions: {error}"))?;

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    Ok(dashboard_view(nav_bar, &transactions).into_response())
}

/// Renders the dashboard page when no transaction data exists.
///
/// The smart entry form is still shown so the first transaction can be added.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                (smart_entry_form())

                div class="flex flex-col items-center py-8"
                {
                    h2 class="text-xl font-bold" { "Nothing here yet..." }

                    p
                    {
                        "Charts will show up here once you add some transactions. \
                        Try typing something like \"Coffee at Starbucks $6.50\" above."
                    }
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with cards, charts, the smart entry form
/// and the recent transactions list.
fn dashboard_view(nav_bar: NavBar, transactions: &[TransactionWithCategory]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let totals = calculate_totals(transactions);
    let slices = expenses_by_category(transactions);
    let flows = daily_flows(transactions, TREND_CHART_DAYS);

    let charts = [
        DashboardChart {
            id: "category-chart",
            options: category_pie_chart(&slices).to_string(),
        },
        DashboardChart {
            id: "flow-chart",
            options: daily_flow_chart(&flows).to_string(),
        },
    ];

    let head_elements = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                (summary_cards_view(&totals))

                (charts_view(&charts))

                (smart_entry_form())

                (recent_transactions_view(transactions))
            }
        }
    );

    base("Dashboard", &head_elements, &content)
}

/// A compact list of the most recent transactions with a link to the full
/// transactions page.
fn recent_transactions_view(transactions: &[TransactionWithCategory]) -> Markup {
    html!(
        section class="w-full mx-auto mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }
                (link(endpoints::TRANSACTIONS_VIEW, "View all →"))
            }

            div class="flex flex-col gap-2"
            {
                @for row in transactions.iter().take(RECENT_LIST_LIMIT) {
                    (recent_transaction_item(row))
                }
            }
        }
    )
}

fn recent_transaction_item(row: &TransactionWithCategory) -> Markup {
    let transaction = &row.transaction;
    let (sign, amount_style) = match transaction.kind {
        TransactionKind::Income => ("+", "font-semibold text-green-600 dark:text-green-400"),
        TransactionKind::Expense => ("-", "font-semibold text-red-600 dark:text-red-400"),
    };

    html!(
        div
            class="flex items-center justify-between p-3 bg-white dark:bg-gray-800
                border border-gray-200 dark:border-gray-700 rounded-lg"
            data-recent-transaction="true"
        {
            div class="flex items-center gap-3"
            {
                span class="text-2xl"
                {
                    @match &row.category {
                        Some(category) => { (category.icon) }
                        None => { "📄" }
                    }
                }

                div
                {
                    p class="font-medium" { (transaction.description) }

                    div class="flex items-center gap-2 text-sm text-gray-600 dark:text-gray-400"
                    {
                        @if let Some(category) = &row.category {
                            span class=(CATEGORY_BADGE_STYLE) { (category.name) }
                        }

                        @if transaction.auto_parsed {
                            span
                                class="px-1.5 py-0.5 text-xs font-semibold text-purple-800
                                    bg-purple-100 rounded dark:bg-purple-900 dark:text-purple-300"
                            {
                                "AI"
                            }
                        }
                    }
                }
            }

            div class="text-right"
            {
                p class=(amount_style) { (sign) (format_currency(transaction.amount)) }
                p class="text-sm text-gray-600 dark:text-gray-400" { (transaction.date) }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        category::get_category_by_name,
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[tokio::test]
    async fn empty_dashboard_shows_entry_form_and_empty_state() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state)).await.unwrap();
        let html = parse_html(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Nothing here yet..."));
        assert!(text.contains("Smart Transaction Entry"));
    }

    #[tokio::test]
    async fn dashboard_shows_cards_charts_and_recent_transactions() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let food = get_category_by_name("Food & Dining", &connection).unwrap();
            create_transaction(
                Transaction::build(3500.0, date!(2024 - 06 - 09), "Salary")
                    .kind(TransactionKind::Income),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(6.5, date!(2024 - 06 - 10), "Coffee at Starbucks")
                    .category_id(Some(food.id))
                    .auto_parsed(0.9),
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state)).await.unwrap();
        let html = parse_html(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Total Income"));
        assert!(text.contains("$3,500.00"));
        assert!(text.contains("Total Expenses"));
        assert!(text.contains("$6.50"));
        assert!(text.contains("Net Savings"));
        assert!(text.contains("Saving money"));

        // Chart containers and their init script.
        let chart_selector = Selector::parse("#category-chart").unwrap();
        assert!(html.select(&chart_selector).next().is_some());
        let flow_selector = Selector::parse("#flow-chart").unwrap();
        assert!(html.select(&flow_selector).next().is_some());
        let script_text = html
            .select(&Selector::parse("script").unwrap())
            .map(|script| script.text().collect::<String>())
            .collect::<String>();
        assert!(script_text.contains("echarts.init"));

        // Recent transactions list.
        let recent_selector = Selector::parse("[data-recent-transaction='true']").unwrap();
        let recent: Vec<_> = html.select(&recent_selector).collect();
        assert_eq!(recent.len(), 2);
    }
}
