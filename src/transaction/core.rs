//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction represents money earned or money spent.
///
/// Amounts are stored as non-negative numbers; the direction of the money
/// flow is carried by this enum instead of the amount's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, dividends, ...).
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// The lowercase string stored in the database and used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction. Non-negative;
    /// the direction is carried by `kind`.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// Whether this transaction was created from the text interpreter's
    /// output rather than typed in field by field.
    pub auto_parsed: bool,
    /// The interpreter's confidence for auto-parsed transactions.
    pub confidence: Option<f64>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            kind: TransactionKind::Expense,
            category_id: None,
            auto_parsed: false,
            confidence: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Defaults to an uncategorized, manually entered expense.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction (non-negative).
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The category of the transaction, e.g. "Groceries", "Bills".
    pub category_id: Option<CategoryId>,
    /// Whether the transaction came from the text interpreter.
    pub auto_parsed: bool,
    /// The interpreter's confidence, for auto-parsed transactions.
    pub confidence: Option<f64>,
}

impl TransactionBuilder {
    /// Set whether the transaction is income or an expense.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Mark the transaction as created from the text interpreter's output,
    /// recording the interpreter's confidence.
    pub fn auto_parsed(mut self, confidence: f64) -> Self {
        self.auto_parsed = true;
        self.confidence = Some(confidence);
        self
    }
}

/// A transaction joined with its category's display fields, for the
/// transactions table and the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionWithCategory {
    /// The transaction itself.
    pub transaction: Transaction,
    /// The category, if the transaction has one.
    pub category: Option<Category>,
}

/// The fields that can be changed when editing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// The new amount.
    pub amount: f64,
    /// The new date.
    pub date: Date,
    /// The new description.
    pub description: String,
    /// The new kind.
    pub kind: TransactionKind,
    /// The new category, or `None` to clear it.
    pub category_id: Option<CategoryId>,
}

/// Filters for querying the transaction table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter<'a> {
    /// Case-insensitive substring match against the description and the
    /// category name.
    pub search: Option<&'a str>,
    /// Only return transactions of this kind.
    pub kind: Option<TransactionKind>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the specified category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, date, description, kind, category_id, auto_parsed, confidence)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, amount, date, description, kind, category_id, auto_parsed, confidence",
        )?
        .query_row(
            (
                builder.amount,
                builder.date,
                builder.description,
                builder.kind,
                builder.category_id,
                builder.auto_parsed,
                builder.confidence,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(builder.category_id),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, date, description, kind, category_id, auto_parsed, confidence
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Apply `update` to the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::InvalidCategory] if the new category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET amount = ?1, date = ?2, description = ?3, kind = ?4, category_id = ?5
             WHERE id = ?6",
            (
                update.amount,
                update.date,
                update.description,
                update.kind,
                update.category_id,
                id,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(update.category_id),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete a transaction by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// The number of transactions matching `filter`, for pagination.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions_matching(
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let search_pattern = filter.search.map(like_pattern);

    connection
        .prepare(
            "SELECT COUNT(t.id)
             FROM \"transaction\" t
             LEFT JOIN category c ON t.category_id = c.id
             WHERE (:search IS NULL
                    OR LOWER(t.description) LIKE :search
                    OR LOWER(IFNULL(c.name, '')) LIKE :search)
               AND (:kind IS NULL OR t.kind = :kind)",
        )?
        .query_row(
            rusqlite::named_params! {
                ":search": search_pattern,
                ":kind": filter.kind.map(|kind| kind.as_str()),
            },
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Query transactions matching `filter`, newest first, with their category
/// display fields joined in.
///
/// `page` is 1-based.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn query_transactions(
    filter: TransactionFilter,
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    let search_pattern = filter.search.map(like_pattern);
    let offset = page.saturating_sub(1) * page_size;

    connection
        .prepare(
            "SELECT t.id, t.amount, t.date, t.description, t.kind, t.category_id,
                    t.auto_parsed, t.confidence, c.name, c.color, c.icon
             FROM \"transaction\" t
             LEFT JOIN category c ON t.category_id = c.id
             WHERE (:search IS NULL
                    OR LOWER(t.description) LIKE :search
                    OR LOWER(IFNULL(c.name, '')) LIKE :search)
               AND (:kind IS NULL OR t.kind = :kind)
             ORDER BY t.date DESC, t.id DESC
             LIMIT :limit OFFSET :offset",
        )?
        .query_map(
            rusqlite::named_params! {
                ":search": search_pattern,
                ":kind": filter.kind.map(|kind| kind.as_str()),
                ":limit": page_size as i64,
                ":offset": offset as i64,
            },
            map_transaction_with_category_row,
        )?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount >= 0),
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                category_id INTEGER,
                auto_parsed INTEGER NOT NULL DEFAULT 0,
                confidence REAL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the dashboard and transactions pages.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_kind ON \"transaction\"(date, kind);",
        (),
    )?;

    Ok(())
}

fn like_pattern(search: &str) -> String {
    format!("%{}%", search.to_lowercase())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let kind = row.get(4)?;
    let category_id = row.get(5)?;
    let auto_parsed = row.get(6)?;
    let confidence = row.get(7)?;

    Ok(Transaction {
        id,
        amount,
        date,
        description,
        kind,
        category_id,
        auto_parsed,
        confidence,
    })
}

fn map_transaction_with_category_row(
    row: &Row,
) -> Result<TransactionWithCategory, rusqlite::Error> {
    let transaction = map_transaction_row(row)?;
    let name: Option<String> = row.get(8)?;

    let category = match (transaction.category_id, name) {
        (Some(id), Some(name)) => Some(Category {
            id,
            name: CategoryName::new_unchecked(&name),
            color: row.get(9)?,
            icon: row.get(10)?,
        }),
        _ => None,
    };

    Ok(TransactionWithCategory {
        transaction,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::get_category_by_name,
        db::initialize,
        transaction::{
            Transaction, TransactionFilter, TransactionKind, count_transactions,
            count_transactions_matching, create_transaction, delete_transaction, get_transaction,
            query_transactions, update_transaction,
        },
    };

    use super::TransactionUpdate;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result =
            create_transaction(Transaction::build(amount, date!(2025 - 10 - 05), ""), &conn);

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionKind::Expense);
                assert!(!transaction.auto_parsed);
                assert_eq!(transaction.confidence, None);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_with_category_and_confidence() {
        let conn = get_test_connection();
        let groceries = get_category_by_name("Groceries", &conn).unwrap();

        let transaction = create_transaction(
            Transaction::build(45.20, date!(2025 - 10 - 05), "Whole Foods run")
                .kind(TransactionKind::Expense)
                .category_id(Some(groceries.id))
                .auto_parsed(0.9),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.category_id, Some(groceries.id));
        assert!(transaction.auto_parsed);
        assert_eq!(transaction.confidence, Some(0.9));
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();
        let category_id = Some(9999);
        let today = date!(2025 - 10 - 04);

        let result = create_transaction(
            Transaction::build(123.45, today, "").category_id(category_id),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(category_id)));
    }

    #[test]
    fn get_transaction_round_trips_kind() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(3500.0, date!(2025 - 10 - 05), "Salary")
                .kind(TransactionKind::Income),
            &conn,
        )
        .unwrap();

        let got = get_transaction(created.id, &conn).unwrap();

        assert_eq!(got, created);
        assert_eq!(got.kind, TransactionKind::Income);
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        let got = get_transaction(123, &conn);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn update_transaction_changes_fields() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(10.0, date!(2025 - 10 - 05), "Typo descriptoin"),
            &conn,
        )
        .unwrap();

        update_transaction(
            created.id,
            TransactionUpdate {
                amount: 12.0,
                date: date!(2025 - 10 - 04),
                description: "Fixed description".to_owned(),
                kind: TransactionKind::Income,
                category_id: None,
            },
            &conn,
        )
        .expect("Could not update transaction");

        let got = get_transaction(created.id, &conn).unwrap();
        assert_eq!(got.amount, 12.0);
        assert_eq!(got.date, date!(2025 - 10 - 04));
        assert_eq!(got.description, "Fixed description");
        assert_eq!(got.kind, TransactionKind::Income);
    }

    #[test]
    fn update_missing_transaction_returns_error() {
        let conn = get_test_connection();

        let result = update_transaction(
            999,
            TransactionUpdate {
                amount: 1.0,
                date: date!(2025 - 10 - 05),
                description: String::new(),
                kind: TransactionKind::Expense,
                category_id: None,
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_transaction_removes_row() {
        let conn = get_test_connection();
        let created =
            create_transaction(Transaction::build(10.0, date!(2025 - 10 - 05), ""), &conn)
                .unwrap();

        delete_transaction(created.id, &conn).expect("Could not delete transaction");

        assert_eq!(get_transaction(created.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_returns_error() {
        let conn = get_test_connection();

        let result = delete_transaction(999, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(Transaction::build(i as f64, today, ""), &conn)
                .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }

    #[test]
    fn query_returns_newest_first() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(1.0, date!(2025 - 10 - 01), "oldest"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(2.0, date!(2025 - 10 - 05), "newest"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(3.0, date!(2025 - 10 - 03), "middle"),
            &conn,
        )
        .unwrap();

        let rows = query_transactions(TransactionFilter::default(), 1, 10, &conn).unwrap();

        let descriptions: Vec<&str> = rows
            .iter()
            .map(|row| row.transaction.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn query_search_matches_description_case_insensitively() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        create_transaction(Transaction::build(1.0, today, "Coffee at Starbucks"), &conn).unwrap();
        create_transaction(Transaction::build(2.0, today, "Grocery run"), &conn).unwrap();

        let filter = TransactionFilter {
            search: Some("STARBUCKS"),
            kind: None,
        };
        let rows = query_transactions(filter, 1, 10, &conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.description, "Coffee at Starbucks");
        assert_eq!(count_transactions_matching(filter, &conn), Ok(1));
    }

    #[test]
    fn query_search_matches_category_name() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let groceries = get_category_by_name("Groceries", &conn).unwrap();
        create_transaction(
            Transaction::build(1.0, today, "Weekly shop").category_id(Some(groceries.id)),
            &conn,
        )
        .unwrap();
        create_transaction(Transaction::build(2.0, today, "Mystery"), &conn).unwrap();

        let rows = query_transactions(
            TransactionFilter {
                search: Some("groceries"),
                kind: None,
            },
            1,
            10,
            &conn,
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.description, "Weekly shop");
        let category = rows[0].category.as_ref().expect("Missing joined category");
        assert_eq!(category.name.as_ref(), "Groceries");
    }

    #[test]
    fn query_filters_by_kind() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        create_transaction(
            Transaction::build(3500.0, today, "Salary").kind(TransactionKind::Income),
            &conn,
        )
        .unwrap();
        create_transaction(Transaction::build(6.5, today, "Coffee"), &conn).unwrap();

        let income_only = query_transactions(
            TransactionFilter {
                search: None,
                kind: Some(TransactionKind::Income),
            },
            1,
            10,
            &conn,
        )
        .unwrap();

        assert_eq!(income_only.len(), 1);
        assert_eq!(income_only[0].transaction.kind, TransactionKind::Income);
    }

    #[test]
    fn query_paginates() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        for i in 1..=5 {
            create_transaction(Transaction::build(i as f64, today, ""), &conn).unwrap();
        }

        let page_one = query_transactions(TransactionFilter::default(), 1, 2, &conn).unwrap();
        let page_three = query_transactions(TransactionFilter::default(), 3, 2, &conn).unwrap();

        assert_eq!(page_one.len(), 2);
        assert_eq!(page_three.len(), 1);
    }

    #[test]
    fn deleting_category_keeps_transaction_uncategorized() {
        let conn = get_test_connection();
        let groceries = get_category_by_name("Groceries", &conn).unwrap();
        let created = create_transaction(
            Transaction::build(1.0, date!(2025 - 10 - 05), "Weekly shop")
                .category_id(Some(groceries.id)),
            &conn,
        )
        .unwrap();

        conn.execute("DELETE FROM category WHERE id = ?1", [groceries.id])
            .unwrap();

        let got = get_transaction(created.id, &conn).unwrap();
        assert_eq!(got.category_id, None);
    }
}
