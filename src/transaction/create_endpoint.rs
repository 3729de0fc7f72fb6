use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    Error,
    stores::{SQLiteTransactionStore, TransactionStore},
    transaction::TransactionResponse,
    validation::{CreateTransactionRequest, validate_new_transaction},
};

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored transaction, or 400 if the payload is
/// missing a field or has an invalid value. Nothing is written when
/// validation fails.
pub async fn create_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(request) = payload.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    let builder = validate_new_transaction(request)?;

    let transaction = store.create(builder).inspect_err(|error| {
        tracing::error!("Could not create transaction: {error}");
    })?;

    tracing::info!(
        "Created transaction {} for user {}",
        transaction.id,
        transaction.user_id
    );

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::new(
            "Transaction created successfully",
            transaction,
        )),
    ))
}
