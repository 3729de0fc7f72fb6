//! Contains the SQLite backed store.

pub mod transaction;

pub use transaction::{SQLiteTransactionStore, create_transaction_table};
