//! The JSON body returned by the endpoints that change a transaction.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// A confirmation message together with the affected transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// A human readable description of what happened.
    pub message: String,
    /// The transaction after the change, or its prior state for deletions.
    pub transaction: Transaction,
}

impl TransactionResponse {
    pub(crate) fn new(message: &str, transaction: Transaction) -> Self {
        Self {
            message: message.to_owned(),
            transaction,
        }
    }
}
