//! Defines the page for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    category::{Category, get_all_categories},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        link,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionId, TransactionKind, core::get_transaction},
};

/// The state needed to display the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transaction: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(edit_transaction_view(&transaction, &categories).into_response())
}

fn edit_transaction_view(transaction: &Transaction, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                h2 class="text-xl font-bold mb-4" { "Edit Transaction" }

                form
                    hx-put=(edit_url)
                    hx-target-error="#alert-container"
                    class="flex flex-col gap-4"
                {
                    div
                    {
                        label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                        input
                            type="text"
                            name="description"
                            id="description"
                            value=(transaction.description)
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            value=(transaction.amount)
                            min="0"
                            step="0.01"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                        input
                            type="date"
                            name="date"
                            id="date"
                            value=(transaction.date)
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="kind" class=(FORM_LABEL_STYLE) { "Type" }
                        select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option
                                value="expense"
                                selected[transaction.kind == TransactionKind::Expense]
                            {
                                "Expense"
                            }
                            option
                                value="income"
                                selected[transaction.kind == TransactionKind::Income]
                            {
                                "Income"
                            }
                        }
                    }

                    div
                    {
                        label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }
                        select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" selected[transaction.category_id.is_none()]
                            {
                                "None"
                            }

                            @for category in categories {
                                option
                                    value=(category.id)
                                    selected[transaction.category_id == Some(category.id)]
                                {
                                    (category.icon) " " (category.name)
                                }
                            }
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }

                    p class="text-center"
                    {
                        (link(endpoints::TRANSACTIONS_VIEW, "Back to transactions"))
                    }
                }
            }
        }
    );

    base("Edit Transaction", &[], &content)
}
