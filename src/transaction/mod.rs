//! Transaction storage and management.
//!
//! Defines the persisted transaction model, its database queries, the
//! endpoints for confirming, editing and deleting transactions, and the
//! transactions page with search and filter controls.

pub mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod transactions_page;

pub use self::core::{
    Transaction, TransactionFilter, TransactionId, TransactionKind, TransactionWithCategory,
    count_transactions, count_transactions_matching, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, query_transactions,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use transactions_page::get_transactions_page;
