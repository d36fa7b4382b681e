//! Defines the endpoint that interprets free-text transaction descriptions.
//!
//! The endpoint returns an HTML preview of the parsed transaction with a
//! confirm form. Nothing is persisted here: confirming posts the (possibly
//! user-edited) fields to the transaction create endpoint, and cancelling
//! simply clears the preview.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    category::get_all_categories,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, format_currency, loading_spinner,
    },
    interpreter::{ParsedTransaction, core::interpret},
    timezone::local_today,
    transaction::TransactionKind,
};

/// The state needed to interpret transaction text.
#[derive(Debug, Clone)]
pub struct ParseState {
    /// The database connection for reading the category reference set.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ParseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for the smart entry input.
#[derive(Debug, Deserialize)]
pub struct ParseForm {
    /// The free-text transaction description.
    pub input: String,
}

/// A route handler that interprets `input` and returns a preview partial.
///
/// The interpreter itself cannot fail; the only error paths here are the
/// category lookup and timezone resolution.
pub async fn parse_transaction_endpoint(
    State(state): State<ParseState>,
    Form(form): Form<ParseForm>,
) -> Response {
    let reference_date = match local_today(&state.local_timezone) {
        Ok(date) => date,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let categories = match get_all_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("could not get categories: {error}");
            return error.into_alert_response();
        }
    };

    let parsed = interpret(&form.input, &categories, reference_date);

    tracing::debug!(
        "Interpreted {:?} as {} {} ({}, confidence {:.2})",
        form.input,
        parsed.kind,
        format_currency(parsed.amount),
        parsed.category.name(),
        parsed.confidence,
    );

    parse_preview(&parsed).into_response()
}

/// The smart entry form shown on the dashboard.
///
/// Posting the input swaps the parsed preview into `#parse-preview`.
pub fn smart_entry_form() -> Markup {
    html!(
        section class="w-full mx-auto mb-8"
        {
            div class="bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg p-4 shadow-md"
            {
                h3 class="text-xl font-semibold mb-1" { "Smart Transaction Entry" }

                p class="text-sm text-gray-600 dark:text-gray-400 mb-3"
                {
                    "Try: \"Coffee at Starbucks $6.50\", \"Netflix subscription $15.99\", \
                    or \"Got paid $3500 salary\""
                }

                form
                    hx-post=(endpoints::PARSE_API)
                    hx-target="#parse-preview"
                    hx-target-error="#alert-container"
                    hx-swap="innerHTML"
                    class="flex gap-2"
                {
                    input
                        type="text"
                        name="input"
                        placeholder="e.g., 'Coffee at Starbucks $6.50' or 'Amazon purchase $89.99'"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required
                        autocomplete="off";

                    button
                        type="submit"
                        class=(BUTTON_PRIMARY_STYLE)
                        id="indicator"
                    {
                        span class="htmx-indicator" { (loading_spinner()) }
                        "Parse"
                    }
                }

                div id="parse-preview" {}
            }
        }
    )
}

/// The parsed transaction preview with an editable confirm form.
fn parse_preview(parsed: &ParsedTransaction) -> Markup {
    let amount_style = match parsed.kind {
        TransactionKind::Income => "text-green-600 dark:text-green-400 font-semibold",
        TransactionKind::Expense => "text-red-600 dark:text-red-400 font-semibold",
    };
    let confidence_percent = format!("{:.0}%", parsed.confidence * 100.0);

    html!(
        div class="mt-4 p-4 bg-gray-50 dark:bg-gray-700 rounded-lg border border-gray-200 dark:border-gray-600"
        {
            h4 class="font-semibold mb-2" { "Parsed Transaction" }

            div class="grid grid-cols-2 gap-4 text-sm mb-3"
            {
                div
                {
                    span class="text-gray-600 dark:text-gray-400" { "Amount: " }
                    span class=(amount_style) { (format_currency(parsed.amount)) }
                }

                div
                {
                    span class="text-gray-600 dark:text-gray-400" { "Type: " }
                    span class="font-semibold capitalize" { (parsed.kind) }
                }

                div
                {
                    span class="text-gray-600 dark:text-gray-400" { "Category: " }
                    span class=(CATEGORY_BADGE_STYLE)
                    {
                        (parsed.category.icon()) " " (parsed.category.name())
                    }
                }

                div
                {
                    span class="text-gray-600 dark:text-gray-400" { "Confidence: " }
                    span { (confidence_percent) }
                }
            }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="flex flex-col gap-3"
            {
                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        type="text"
                        name="description"
                        id="description"
                        value=(parsed.description)
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div class="grid grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            value=(parsed.amount)
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
                            value=(parsed.date)
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }
                }

                input type="hidden" name="kind" value=(parsed.kind);
                input type="hidden" name="category_name" value=(parsed.category.name());
                input type="hidden" name="confidence" value=(parsed.confidence);

                div class="flex gap-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Confirm & Save" }

                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="document.getElementById('parse-preview').innerHTML = ''"
                    {
                        "Cancel"
                    }
                }
            }
        }
    )
}
