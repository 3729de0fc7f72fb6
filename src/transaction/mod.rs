//! Transactions in the ledger.
//!
//! This module contains:
//! - The `Transaction` model, `TransactionBuilder` and `TransactionChanges`
//! - The route handlers for listing, creating, updating, deleting and
//!   summarizing transactions

mod core;
mod create_endpoint;
mod date_range_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod response;
mod summary_endpoint;

pub use core::{Transaction, TransactionBuilder, TransactionChanges};
pub use create_endpoint::create_transaction_endpoint;
pub use date_range_endpoint::{DateRangeState, get_transactions_by_date_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::{get_transactions_endpoint, get_user_transactions_endpoint};
pub use response::TransactionResponse;
pub use summary_endpoint::get_summary_endpoint;
