//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::money::AmountError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request was missing a field or a field had an invalid value.
    ///
    /// The string describes what was wrong and is safe to show to the client.
    #[error("{0}")]
    Validation(String),

    /// The transaction ID in the request path is not an integer.
    #[error("invalid transaction id \"{0}\"")]
    InvalidTransactionId(String),

    /// No transaction matches the given ID.
    ///
    /// This is a normal outcome for update and delete requests that race a
    /// deletion or use a stale ID.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// A listing query matched no transactions.
    ///
    /// Callers use this to tell "no ledger activity" apart from a malformed
    /// query.
    #[error("no transactions found")]
    NoTransactions,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured timezone is not a valid, canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A response body could not be buffered.
    #[error("could not read body: {0}")]
    BodyReadError(String),

    /// The caller has used up their request budget for the current window.
    #[error("too many requests")]
    AdmissionDenied,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<AmountError> for Error {
    fn from(value: AmountError) -> Self {
        Error::Validation(value.to_string())
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// A description of what went wrong.
    pub error: String,
}

impl ErrorBody {
    pub(crate) fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: message.into(),
        })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(message)).into_response()
            }
            Error::InvalidTransactionId(_) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("Invalid transaction id")).into_response()
            }
            Error::NotFound => {
                (StatusCode::NOT_FOUND, ErrorBody::new("Transaction not found")).into_response()
            }
            Error::NoTransactions => {
                (StatusCode::NOT_FOUND, ErrorBody::new("No transactions found")).into_response()
            }
            Error::AdmissionDenied => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody::new("Too many requests, please try again later."),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Something went wrong"),
                )
                    .into_response()
            }
        }
    }
}
