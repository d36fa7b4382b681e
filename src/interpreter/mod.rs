//! The transaction text interpreter.
//!
//! Turns a free-text description like "Coffee at Starbucks $6.50" into a
//! structured, best-effort [ParsedTransaction] with a heuristic confidence
//! score. The interpreter is a pure function of its inputs: it performs no
//! I/O, holds no state between calls, and never fails — missing signals
//! degrade to defaults (amount 0, expense, "Other", today). The result is
//! always shown to the user for confirmation before anything is persisted.
//!
//! Internally the interpreter is an ordered pipeline of independent
//! extraction passes (amount, date, type, category) that each inspect the
//! raw text and contribute one field to the output record. The keyword and
//! date-phrase tables live in [rules] as ordered data so that the
//! first-match-wins tie-break is explicit.

mod core;
mod models;
mod parse_endpoint;
mod rules;

pub use self::core::interpret;
pub use models::{ParsedTransaction, ResolvedCategory};
pub use parse_endpoint::{ParseForm, parse_transaction_endpoint, smart_entry_form};
