//! Defines the endpoint for applying edits to a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    category::CategoryId,
    transaction::{
        TransactionId, TransactionKind,
        core::{TransactionUpdate, update_transaction},
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for editing a transaction.
#[derive(Debug, Deserialize)]
pub struct EditTransactionForm {
    /// The new amount in dollars.
    pub amount: f64,
    /// The new transaction date.
    pub date: Date,
    /// The new description.
    pub description: String,
    /// The new kind.
    pub kind: TransactionKind,
    /// The new category, empty to clear it.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// A route handler for updating a transaction, redirects to the transactions
/// view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<EditTransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update = TransactionUpdate {
        amount: form.amount.abs(),
        date: form.date,
        description: form.description,
        kind: form.kind,
        category_id: form.category_id,
    };

    if let Err(error) = update_transaction(transaction_id, update, &connection) {
        tracing::error!("could not update transaction {transaction_id}: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction, get_transaction},
    };

    use super::{EditTransactionForm, EditTransactionState, edit_transaction_endpoint};

    fn get_test_state() -> EditTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn edits_are_applied_and_redirect_to_transactions() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(10.0, date!(2024 - 06 - 10), "Before"),
                &connection,
            )
            .unwrap();
        }

        let form = EditTransactionForm {
            amount: 12.5,
            date: date!(2024 - 06 - 09),
            description: "After".to_owned(),
            kind: TransactionKind::Income,
            category_id: None,
        };

        let response = edit_transaction_endpoint(State(state.clone()), Path(1), Form(form))
            .await
            .into_response();

        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(location, "/transactions");

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.date, date!(2024 - 06 - 09));
        assert_eq!(transaction.description, "After");
        assert_eq!(transaction.kind, TransactionKind::Income);
    }

    #[tokio::test]
    async fn editing_missing_transaction_returns_not_found() {
        let state = get_test_state();

        let form = EditTransactionForm {
            amount: 1.0,
            date: date!(2024 - 06 - 10),
            description: String::new(),
            kind: TransactionKind::Expense,
            category_id: None,
        };

        let response = edit_transaction_endpoint(State(state), Path(999), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
