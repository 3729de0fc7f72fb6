use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error,
    stores::{SQLiteTransactionStore, TransactionStore},
    transaction::TransactionResponse,
    validation::{UpdateTransactionRequest, parse_transaction_id, validate_transaction_changes},
};

/// A route handler for replacing the title, amount and category of a transaction.
///
/// Responds with 400 if the ID is not an integer or the payload is invalid,
/// and 404 if there is no transaction with the ID.
pub async fn edit_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionResponse>, Error> {
    let transaction_id = parse_transaction_id(&raw_id)?;
    let Json(request) = payload.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    let changes = validate_transaction_changes(request)?;

    let transaction = store
        .update(transaction_id, changes)
        .inspect_err(|error| match error {
            Error::NotFound => tracing::debug!("Transaction {transaction_id} does not exist"),
            error => tracing::error!("Could not update transaction {transaction_id}: {error}"),
        })?;

    tracing::info!("Updated transaction {transaction_id}");

    Ok(Json(TransactionResponse::new(
        "Transaction updated successfully",
        transaction,
    )))
}
