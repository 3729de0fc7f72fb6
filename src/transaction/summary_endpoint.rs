use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    aggregation::{Summary, summarize},
    stores::SQLiteTransactionStore,
};

/// A route handler for the balance, income and expenses of a user.
///
/// A user with no transactions gets a summary of zeros.
pub async fn get_summary_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Summary>, Error> {
    summarize(&store, &user_id)
        .map(Json)
        .inspect_err(|error| tracing::error!("Could not summarize user {user_id}: {error}"))
}
