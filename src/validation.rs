//! Checks the shape of incoming transaction payloads before they reach the store.
//!
//! Everything here is pure: no I/O, no clock.

use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    money::Amount,
    transaction::{Transaction, TransactionBuilder, TransactionChanges},
};

/// The maximum number of characters in a text field.
pub const MAX_TEXT_LENGTH: usize = 255;

/// The body of a request to create a transaction, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransactionRequest {
    /// The owner of the new transaction.
    pub user_id: Option<String>,
    /// A short description of the transaction.
    pub title: Option<String>,
    /// The signed amount, as a JSON number or decimal string.
    pub amount: Option<Decimal>,
    /// The category label.
    pub category: Option<String>,
    /// When the transaction happened, defaults to the time of insertion.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// The body of a request to update a transaction, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// The new title.
    pub title: Option<String>,
    /// The new signed amount, as a JSON number or decimal string.
    pub amount: Option<Decimal>,
    /// The new category label.
    pub category: Option<String>,
}

/// Validate a request to create a transaction.
///
/// # Errors
/// Returns [Error::Validation] if any of `user_id`, `title`, `amount` or
/// `category` is missing or invalid.
pub fn validate_new_transaction(
    request: CreateTransactionRequest,
) -> Result<TransactionBuilder, Error> {
    let user_id = required_text("user_id", request.user_id)?;
    let title = required_text("title", request.title)?;
    let amount = required_amount(request.amount)?;
    let category = required_text("category", request.category)?;

    Ok(Transaction::build(&user_id, &title, amount, &category).created_at(request.created_at))
}

/// Validate a request to update a transaction.
///
/// # Errors
/// Returns [Error::Validation] if any of `title`, `amount` or `category` is
/// missing or invalid.
pub fn validate_transaction_changes(
    request: UpdateTransactionRequest,
) -> Result<TransactionChanges, Error> {
    Ok(TransactionChanges {
        title: required_text("title", request.title)?,
        amount: required_amount(request.amount)?,
        category: required_text("category", request.category)?,
    })
}

/// Check that a text field is non-empty and at most [MAX_TEXT_LENGTH]
/// characters long, returning the trimmed text.
///
/// # Errors
/// Returns [Error::Validation] naming `field` if the check fails.
pub fn validate_text(field: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::Validation(format!("{field} cannot be empty")));
    }

    if value.graphemes(true).count() > MAX_TEXT_LENGTH {
        return Err(Error::Validation(format!(
            "{field} cannot be longer than {MAX_TEXT_LENGTH} characters"
        )));
    }

    Ok(value.to_owned())
}

fn required_text(field: &str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) => validate_text(field, &value),
        None => Err(missing_fields()),
    }
}

fn required_amount(value: Option<Decimal>) -> Result<Amount, Error> {
    let value = value.ok_or_else(missing_fields)?;

    Ok(Amount::new(value)?)
}

fn missing_fields() -> Error {
    Error::Validation("All fields are required".to_owned())
}

/// Parse a transaction ID from a request path segment.
///
/// # Errors
/// Returns [Error::InvalidTransactionId] if `raw` is not an integer.
pub fn parse_transaction_id(raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidTransactionId(raw.to_owned()))
}
