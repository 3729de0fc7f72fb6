//! Contains the transaction store trait and its implementations.

mod transaction;

pub mod sqlite;

pub use sqlite::SQLiteTransactionStore;
pub use transaction::{AmountSign, TransactionStore};
