//! Defines the endpoint for confirming and saving a parsed transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
    category::get_category_by_name,
    transaction::{Transaction, TransactionKind, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction, typically submitted from the
/// parse preview's confirm form.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    pub description: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The display name of the category to assign. A name with no matching
    /// category (an interpreter placeholder) stores the transaction
    /// uncategorized.
    #[serde(default)]
    pub category_name: Option<String>,
    /// The interpreter's confidence. Present when the form came from the
    /// parse preview; marks the transaction as auto-parsed.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A route handler for creating a new transaction, redirects to the dashboard
/// on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let category_id = match form.category_name.as_deref() {
        Some(name) => match get_category_by_name(name, &connection) {
            Ok(category) => Some(category.id),
            // A placeholder category from the interpreter; store uncategorized.
            Err(Error::NotFound) => None,
            Err(error) => {
                tracing::error!("could not look up category {name:?}: {error}");
                return error.into_alert_response();
            }
        },
        None => None,
    };

    let mut builder = Transaction::build(form.amount.abs(), form.date, &form.description)
        .kind(form.kind)
        .category_id(category_id);

    if let Some(confidence) = form.confidence {
        builder = builder.auto_parsed(confidence.clamp(0.0, 1.0));
    }

    if let Err(error) = create_transaction(builder, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, extract::State, http::Response, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::get_category_by_name,
        db::initialize,
        transaction::{
            TransactionKind, create_endpoint::{CreateTransactionState, TransactionForm},
            create_transaction_endpoint, get_transaction,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_confirmed_transaction() {
        let state = get_test_state();

        let form = TransactionForm {
            amount: 6.5,
            date: date!(2024 - 06 - 10),
            description: "Coffee at Starbucks".to_string(),
            kind: TransactionKind::Expense,
            category_name: Some("Food & Dining".to_owned()),
            confidence: Some(0.9),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_redirects_to_dashboard(response);

        // We know the first transaction will have ID 1.
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        let food = get_category_by_name("Food & Dining", &connection).unwrap();
        assert_eq!(transaction.amount, 6.5);
        assert_eq!(transaction.description, "Coffee at Starbucks");
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category_id, Some(food.id));
        assert!(transaction.auto_parsed);
        assert_eq!(transaction.confidence, Some(0.9));
    }

    #[tokio::test]
    async fn placeholder_category_stores_uncategorized() {
        let state = get_test_state();

        let form = TransactionForm {
            amount: 5.0,
            date: date!(2024 - 06 - 10),
            description: "Mystery".to_string(),
            kind: TransactionKind::Expense,
            category_name: Some("Not A Real Category".to_owned()),
            confidence: Some(0.8),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_redirects_to_dashboard(response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.category_id, None);
    }

    #[tokio::test]
    async fn manual_form_without_confidence_is_not_auto_parsed() {
        let state = get_test_state();

        let form = TransactionForm {
            amount: 12.0,
            date: date!(2024 - 06 - 10),
            description: "Lunch".to_string(),
            kind: TransactionKind::Expense,
            category_name: None,
            confidence: None,
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_redirects_to_dashboard(response);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert!(!transaction.auto_parsed);
        assert_eq!(transaction.confidence, None);
    }

    #[tokio::test]
    async fn negative_amount_is_stored_as_magnitude() {
        let state = get_test_state();

        let form = TransactionForm {
            amount: -42.0,
            date: date!(2024 - 06 - 10),
            description: "Typo".to_string(),
            kind: TransactionKind::Expense,
            category_name: None,
            confidence: None,
        };

        create_transaction_endpoint(State(state.clone()), Form(form)).await;

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 42.0);
    }

    #[track_caller]
    fn assert_redirects_to_dashboard(response: Response<Body>) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/dashboard",
            "got redirect to {location:?}, want redirect to /dashboard"
        );
    }
}
