use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    stores::{SQLiteTransactionStore, TransactionStore},
    transaction::TransactionResponse,
    validation::parse_transaction_id,
};

/// A route handler for deleting a transaction.
///
/// Responds with the transaction as it was before it was removed, 400 if the
/// ID is not an integer, or 404 if the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<TransactionResponse>, Error> {
    let transaction_id = parse_transaction_id(&raw_id)?;

    let transaction = store
        .delete(transaction_id)
        .inspect_err(|error| match error {
            Error::NotFound => tracing::debug!("Transaction {transaction_id} does not exist"),
            error => tracing::error!("Could not delete transaction {transaction_id}: {error}"),
        })?;

    tracing::info!("Deleted transaction {transaction_id}");

    Ok(Json(TransactionResponse::new(
        "Transaction deleted successfully",
        transaction,
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        money::Amount,
        stores::{SQLiteTransactionStore, TransactionStore},
        transaction::{Transaction, delete_endpoint::delete_transaction_endpoint},
    };

    fn get_store() -> SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn can_delete_transaction() {
        let store = get_store();
        let transaction = store
            .create(Transaction::build(
                "u1",
                "Coffee",
                Amount::from_cents(-450),
                "Food & Drinks",
            ))
            .unwrap();

        let Json(body) =
            delete_transaction_endpoint(State(store.clone()), Path(transaction.id.to_string()))
                .await
                .unwrap();

        assert_eq!(body.message, "Transaction deleted successfully");
        assert_eq!(body.transaction, transaction);
        assert_eq!(store.get(transaction.id), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = get_store();
        let transaction = store
            .create(Transaction::build(
                "u1",
                "Coffee",
                Amount::from_cents(-450),
                "Food & Drinks",
            ))
            .unwrap();
        let id = transaction.id.to_string();

        delete_transaction_endpoint(State(store.clone()), Path(id.clone()))
            .await
            .unwrap();
        let result = delete_transaction_endpoint(State(store), Path(id)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected() {
        let store = get_store();

        let result = delete_transaction_endpoint(State(store), Path("12abc".to_owned())).await;

        assert!(matches!(result, Err(Error::InvalidTransactionId(_))));
    }
}
