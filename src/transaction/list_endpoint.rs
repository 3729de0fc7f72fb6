use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    stores::{SQLiteTransactionStore, TransactionStore},
    transaction::Transaction,
};

/// A route handler that lists every transaction in the ledger.
///
/// An empty ledger is an empty array, not an error.
pub async fn get_transactions_endpoint(
    State(store): State<SQLiteTransactionStore>,
) -> Result<Json<Vec<Transaction>>, Error> {
    store
        .get_all()
        .map(Json)
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))
}

/// A route handler that lists the transactions owned by a user.
///
/// Responds with 404 if the user has no transactions.
pub async fn get_user_transactions_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let transactions = store.get_by_user(&user_id).inspect_err(|error| {
        tracing::error!("Could not list transactions for user {user_id}: {error}")
    })?;

    if transactions.is_empty() {
        return Err(Error::NoTransactions);
    }

    Ok(Json(transactions))
}
