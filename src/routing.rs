//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState,
    admission::admission_guard,
    endpoints,
    error::ErrorBody,
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_summary_endpoint, get_transactions_by_date_endpoint, get_transactions_endpoint,
        get_user_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every request passes the admission check before it reaches a handler or
/// has its body buffered for logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        // GET treats the path parameter as a user ID, PUT and DELETE as a transaction ID.
        .route(
            endpoints::TRANSACTION,
            get(get_user_transactions_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::TRANSACTIONS_BY_DATE,
            get(get_transactions_by_date_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admission_guard,
        ))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, ErrorBody::new("Not found")).into_response()
}
